//! Impulse/friction physics and the arena's boundary and collision rules.

use std::collections::VecDeque;

use crate::error::SimError;
use crate::impulse::Impulse;
use crate::shape::{Circle, Extent, Rectangle};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a horizontal impulse becomes a velocity.
///
/// The browser iterations of the game disagree here: the paddle subtracts
/// friction from the applied force, the ball only uses friction to decide
/// whether it moves at all. Both are kept and chosen per object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HorizontalModel {
    /// `v = (F - friction) * t / m`, must end up positive
    #[default]
    FrictionSubtracted,
    /// `v = F * t / m`, only allowed when `F - friction > 0`
    FrictionGated,
}

/// A weighted body with a position and a velocity
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalObject {
    position: Position,
    weight: f64,
    velocity_x: f64,
    velocity_y: f64,
    last_impulse: Option<Impulse>,
    history: VecDeque<Impulse>,
    model: HorizontalModel,
}

impl PhysicalObject {
    pub fn new(position: Position, weight: f64, model: HorizontalModel) -> Result<Self, SimError> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(SimError::InvalidWeight(weight));
        }

        Ok(PhysicalObject {
            position,
            weight,
            velocity_x: 0.0,
            velocity_y: 0.0,
            last_impulse: None,
            history: VecDeque::with_capacity(IMPULSE_HISTORY_LEN),
            model,
        })
    }

    /// Friction opposing a horizontal push on this object
    pub fn friction(&self) -> f64 {
        self.weight * GRAVITY * FRICTION_COEFFICIENT
    }

    /// Turn an impulse into a velocity on its axis.
    ///
    /// On error nothing is changed: neither the velocity nor the history.
    pub fn apply(&mut self, impulse: Impulse) -> Result<(), SimError> {
        let sign = impulse.sense().sign();

        match impulse.direction() {
            Direction::Horizontal => {
                let friction = self.friction();
                let resultant = impulse.magnitude() - friction;
                let speed = match self.model {
                    HorizontalModel::FrictionSubtracted => {
                        resultant * impulse.duration() / self.weight
                    }
                    HorizontalModel::FrictionGated => {
                        if resultant > 0.0 {
                            impulse.magnitude() * impulse.duration() / self.weight
                        } else {
                            0.0
                        }
                    }
                };

                if speed.is_nan() || speed <= 0.0 {
                    return Err(SimError::InsufficientForce {
                        applied: impulse.magnitude(),
                        friction,
                    });
                }

                self.velocity_x = speed * sign;
            }
            Direction::Vertical => {
                let speed = impulse.magnitude() * impulse.duration() / self.weight;
                if speed.is_nan() || speed <= 0.0 {
                    return Err(SimError::InvalidImpulse {
                        magnitude: impulse.magnitude(),
                        duration: impulse.duration(),
                    });
                }

                self.velocity_y = speed * sign;
            }
        }

        self.record(impulse);
        Ok(())
    }

    fn record(&mut self, impulse: Impulse) {
        if self.history.len() == IMPULSE_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(impulse);
        self.last_impulse = Some(impulse);
    }

    /// Zero both velocity components
    pub fn stop(&mut self) {
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Applied impulses, most recent last
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Impulse> + ExactSizeIterator {
        self.history.iter()
    }

    pub fn last_impulse(&self) -> Option<&Impulse> {
        self.last_impulse.as_ref()
    }

    /// Most recent impulse in the history along the given direction
    pub fn last_along(&self, direction: Direction) -> Option<&Impulse> {
        self.history
            .iter()
            .rev()
            .find(|impulse| impulse.direction() == direction)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn advance(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.velocity_x, self.velocity_y)
    }

    pub fn set_velocity(&mut self, velocity_x: f64, velocity_y: f64) {
        self.velocity_x = velocity_x;
        self.velocity_y = velocity_y;
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn model(&self) -> HorizontalModel {
        self.model
    }
}

/// Arena rules: boundaries, collisions and point attribution
pub struct Physics;

impl Physics {
    /// Would moving by (vx, vy) take the shape past an arena edge?
    pub fn boundary_crossing(
        arena: &Arena,
        position: Position,
        extent: Extent,
        velocity: (f64, f64),
    ) -> Crossing {
        let (vx, vy) = velocity;
        let next_x = position.x + vx;
        let next_y = position.y + vy;

        match extent {
            Extent::Rectangle { width, height } => Crossing {
                axis_x: next_x < 0.0 || next_x > arena.width - width,
                // Bounded by the arena width, not its height, exactly like the
                // browser game. Paddles never move vertically so it stays latent.
                axis_y: next_y < 0.0 || next_y > arena.width - height,
            },
            Extent::Circle { radius } => Crossing {
                axis_x: next_x < radius || next_x > arena.width - radius,
                axis_y: next_y < radius || next_y > arena.height - radius,
            },
        }
    }

    /// Overlap test between the ball and a paddle.
    ///
    /// Only the face the ball should arrive on is tested vertically, so a ball
    /// clipping the side edge of a paddle still counts as a face hit.
    pub fn detect_collision(
        center: Position,
        circle: &Circle,
        corner: Position,
        rect: &Rectangle,
        is_player_one: bool,
    ) -> bool {
        let radius = circle.radius();
        let top = corner.y;
        let bottom = corner.y + rect.height();

        let vertical = if is_player_one {
            center.y + radius >= top && center.y - radius < bottom
        } else {
            center.y - radius <= bottom && center.y + radius > top
        };

        let horizontal =
            center.x + radius >= corner.x && center.x - radius <= corner.x + rect.width();

        vertical && horizontal
    }

    /// Paddle integration: bounce back twice the velocity when the next step leaves the arena
    pub fn update_paddle(body: &mut PhysicalObject, rect: &Rectangle, arena: &Arena) -> Crossing {
        let (vx, vy) = body.velocity();
        let crossing = Self::boundary_crossing(arena, body.position(), rect.extent(), (vx, vy));

        if crossing.axis_x {
            body.advance(-vx * 2.0, 0.0);
        } else {
            body.advance(vx, 0.0);
        }

        crossing
    }

    /// Ball integration: returns the crossing instead of moving when the ball leaves the arena
    pub fn update_ball(body: &mut PhysicalObject, circle: &Circle, arena: &Arena) -> Crossing {
        let (vx, vy) = body.velocity();
        let crossing = Self::boundary_crossing(arena, body.position(), circle.extent(), (vx, vy));

        if !crossing.any() {
            body.advance(vx, vy);
        }

        crossing
    }

    /// Sense that decides who gets the point when the ball goes out.
    ///
    /// A trailing lateral nudge does not count: the most recent vertical
    /// impulse tells which player sent the ball.
    pub fn attribution_sense(body: &PhysicalObject) -> Option<Sense> {
        let last = body.history().next_back()?;

        if last.is_vertical() {
            Some(last.sense())
        } else {
            body.last_along(Direction::Vertical).map(Impulse::sense)
        }
    }
}
