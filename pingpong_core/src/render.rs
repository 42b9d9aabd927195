//! Drawing interface implemented by the host.

use crate::game::Game;
use crate::shape::Shape;
use crate::types::Position;

/// Drawing surface. Coordinates are arena pixels; rectangles are placed by
/// their top-left corner and circles by their center.
pub trait Renderer {
    fn clear_frame(&mut self);

    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
}

/// Draw a shape at a position
pub fn draw_shape<R: Renderer + ?Sized>(renderer: &mut R, shape: &Shape, at: Position) {
    match shape {
        Shape::Rectangle(rect) => {
            renderer.draw_rectangle(at.x, at.y, rect.width(), rect.height(), rect.color())
        }
        Shape::Circle(circle) => renderer.draw_circle(at.x, at.y, circle.radius(), circle.color()),
    }
}

impl Game {
    /// Draw every entity. The frame is not cleared here.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        draw_shape(
            renderer,
            &self.paddle_one.shape(),
            self.paddle_one.body().position(),
        );
        if let Some(paddle) = &self.paddle_two {
            draw_shape(renderer, &paddle.shape(), paddle.body().position());
        }
        draw_shape(renderer, &self.ball.shape(), self.ball.body().position());
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DrawCommand {
    Clear,
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
}

/// Renderer that keeps the draw calls of the current frame, for hosts that
/// paint elsewhere (a browser canvas) and for tests
#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Renderer for DisplayList {
    fn clear_frame(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.commands.push(DrawCommand::Rectangle {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color: color.to_string(),
        });
    }
}
