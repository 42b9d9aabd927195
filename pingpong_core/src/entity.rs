//! Paddles and the ball: a shape plus the physical object that moves it.

use crate::error::SimError;
use crate::impulse::Impulse;
use crate::physics::{HorizontalModel, PhysicalObject, Physics};
use crate::shape::{Circle, Rectangle, Shape};
use crate::types::*;

/// Player paddle, moved left and right by key presses
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    side: Side,
    rect: Rectangle,
    body: PhysicalObject,
}

impl Paddle {
    pub fn new(
        side: Side,
        rect: Rectangle,
        corner: Position,
        weight: f64,
        model: HorizontalModel,
    ) -> Result<Self, SimError> {
        Ok(Paddle {
            side,
            rect,
            body: PhysicalObject::new(corner, weight, model)?,
        })
    }

    /// Build the paddle for a side from the match configuration
    pub fn from_config(side: Side, config: &Config) -> Result<Self, SimError> {
        let (corner, color) = match side {
            Side::One => (config.paddle_one_start, &config.paddle_one_color),
            Side::Two => (config.paddle_two_start, &config.paddle_two_color),
        };
        let rect = Rectangle::new(config.paddle_width, config.paddle_height, color.as_str())?;

        Self::new(side, rect, corner, config.paddle_weight, config.paddle_model)
    }

    /// Push the paddle with a horizontal impulse
    pub fn push(&mut self, sense: Sense, magnitude: f64, duration: f64) -> Result<(), SimError> {
        let impulse = Impulse::horizontal(sense, magnitude, duration)?;
        self.body.apply(impulse)
    }

    pub fn move_left(&mut self, config: &Config) -> Result<(), SimError> {
        self.push(Sense::Left, config.push_magnitude, config.push_duration)
    }

    pub fn move_right(&mut self, config: &Config) -> Result<(), SimError> {
        self.push(Sense::Right, config.push_magnitude, config.push_duration)
    }

    /// Key released: the paddle stops dead
    pub fn stop(&mut self) {
        self.body.stop();
    }

    pub fn update(&mut self, arena: &Arena) -> Crossing {
        Physics::update_paddle(&mut self.body, &self.rect, arena)
    }

    /// Is `x` within the paddle's horizontal extent (inclusive)?
    pub fn covers(&self, x: f64) -> bool {
        let left = self.body.position().x;
        x >= left && x <= left + self.rect.width()
    }

    /// Last horizontal push, handed over to the ball on a hit
    pub fn last_push(&self) -> Option<Impulse> {
        self.body.last_along(Direction::Horizontal).copied()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    pub fn shape(&self) -> Shape {
        self.rect.clone().into()
    }

    pub fn body(&self) -> &PhysicalObject {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PhysicalObject {
        &mut self.body
    }
}

/// What happened when the ball went out
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reset {
    /// Player the point goes to, if it could be attributed
    pub scorer: Option<Side>,
    pub side_out: bool,
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    circle: Circle,
    body: PhysicalObject,
}

impl Ball {
    pub fn new(
        circle: Circle,
        center: Position,
        weight: f64,
        model: HorizontalModel,
    ) -> Result<Self, SimError> {
        Ok(Ball {
            circle,
            body: PhysicalObject::new(center, weight, model)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SimError> {
        let circle = Circle::new(config.ball_radius, config.ball_color.as_str())?;
        Self::new(circle, config.ball_start, config.ball_weight, config.ball_model)
    }

    /// Send the ball vertically, forgetting who touched it before.
    ///
    /// The optional nudge sets the lateral velocity; when it does not beat
    /// friction the ball keeps its previous lateral velocity.
    pub fn strike(&mut self, vertical: Impulse, nudge: Option<Impulse>) -> Result<(), SimError> {
        self.body.clear_history();
        self.body.apply(vertical)?;

        if let Some(nudge) = nudge {
            if let Err(err) = self.body.apply(nudge) {
                log::debug!("Ball nudge skipped : {err}");
            }
        }

        Ok(())
    }

    /// Advance one tick. Returns the crossing when the ball would leave the arena.
    pub fn update(&mut self, arena: &Arena) -> Crossing {
        Physics::update_ball(&mut self.body, &self.circle, arena)
    }

    /// Stop the ball after it went out and put it back for the next serve.
    ///
    /// Down means player one gets the point and the ball waits near the top;
    /// Up means player two gets it and the ball waits near the bottom.
    pub fn reset(&mut self, side_out: bool, config: &Config) -> Reset {
        self.body.stop();

        let offset = if side_out {
            config.side_out_offset
        } else {
            config.end_out_offset
        };
        let x = config.arena.width / 2.0;

        // Unattributed: only x is recentred
        let (scorer, y) = match Physics::attribution_sense(&self.body) {
            Some(Sense::Down) => (Some(Side::One), config.top_respawn_y - offset),
            Some(Sense::Up) => (Some(Side::Two), config.bottom_respawn_y + offset),
            _ => (None, self.body.position().y),
        };

        self.body.set_position(Position::new(x, y));

        Reset { scorer, side_out }
    }

    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    pub fn shape(&self) -> Shape {
        self.circle.clone().into()
    }

    pub fn body(&self) -> &PhysicalObject {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PhysicalObject {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_paddle_from_config() {
        let config = config();
        let paddle = Paddle::from_config(Side::Two, &config).unwrap();

        assert_eq!(paddle.side(), Side::Two);
        assert_eq!(paddle.body().position(), config.paddle_two_start);
        assert_eq!(paddle.rect().color(), "#0000FF");
    }

    #[test]
    fn test_square_paddle_rejected() {
        let config = Config {
            paddle_height: 80.0,
            ..config()
        };
        assert!(matches!(
            Paddle::from_config(Side::One, &config),
            Err(SimError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_paddle_move_and_stop() {
        let config = config();
        let mut paddle = Paddle::from_config(Side::One, &config).unwrap();

        paddle.move_left(&config).unwrap();
        let (vx, _) = paddle.body().velocity();
        assert!(vx < 0.0);
        assert!((vx + 1.68).abs() < 1e-9);

        paddle.update(&config.arena);
        assert!((paddle.body().position().x - (260.0 - 1.68)).abs() < 1e-9);

        paddle.stop();
        paddle.stop();
        assert_eq!(paddle.body().velocity(), (0.0, 0.0));
        assert_eq!(paddle.last_push().map(|i| i.sense()), Some(Sense::Left));
    }

    #[test]
    fn test_paddle_covers() {
        let paddle = Paddle::from_config(Side::One, &config()).unwrap();

        assert!(paddle.covers(260.0));
        assert!(paddle.covers(340.0));
        assert!(!paddle.covers(340.1));
        assert!(!paddle.covers(259.9));
    }

    #[test]
    fn test_reset_down_end_out() {
        let config = config();
        let mut ball = Ball::from_config(&config).unwrap();
        let serve = Impulse::vertical(Sense::Down, 60.0, 2.0).unwrap();
        ball.strike(serve, None).unwrap();

        let reset = ball.reset(false, &config);

        assert_eq!(reset.scorer, Some(Side::One));
        assert_eq!(ball.body().position(), Position::new(300.0, 100.0 - 40.0));
        assert_eq!(ball.body().velocity(), (0.0, 0.0));
    }

    #[test]
    fn test_reset_up_side_out() {
        let config = config();
        let mut ball = Ball::from_config(&config).unwrap();
        let hit = Impulse::vertical(Sense::Up, 60.0, 2.0).unwrap();
        let nudge = Impulse::horizontal(Sense::Right, 55.0, 7.0).unwrap();
        ball.strike(hit, Some(nudge)).unwrap();
        assert!(ball.body().velocity().0 > 0.0);

        let reset = ball.reset(true, &config);

        assert_eq!(reset.scorer, Some(Side::Two));
        assert!(reset.side_out);
        assert_eq!(ball.body().position(), Position::new(300.0, 600.0 + 10.0));
    }

    #[test]
    fn test_reset_without_history() {
        let config = config();
        let mut ball = Ball::from_config(&config).unwrap();
        ball.body_mut().set_position(Position::new(120.0, 500.0));

        let reset = ball.reset(false, &config);

        assert_eq!(reset.scorer, None);
        assert_eq!(ball.body().position(), Position::new(300.0, 500.0));
    }

    #[test]
    fn test_weak_nudge_keeps_vertical() {
        let config = config();
        let mut ball = Ball::from_config(&config).unwrap();
        let hit = Impulse::vertical(Sense::Up, 60.0, 2.0).unwrap();
        let nudge = Impulse::horizontal(Sense::Right, 10.0, 7.0).unwrap();

        ball.strike(hit, Some(nudge)).unwrap();

        assert_eq!(ball.body().velocity().0, 0.0);
        assert!(ball.body().velocity().1 < 0.0);
        assert_eq!(ball.body().history().len(), 1);
    }

    #[test]
    fn test_strike_clears_history() {
        let config = config();
        let mut ball = Ball::from_config(&config).unwrap();
        let down = Impulse::vertical(Sense::Down, 60.0, 2.0).unwrap();
        let up = Impulse::vertical(Sense::Up, 60.0, 2.0).unwrap();

        ball.strike(down, None).unwrap();
        ball.strike(up, None).unwrap();

        assert_eq!(ball.body().history().len(), 1);
        assert_eq!(ball.body().last_impulse().map(|i| i.sense()), Some(Sense::Up));
    }
}
