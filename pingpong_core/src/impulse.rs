//! Impulses: a force applied along one axis for some time.

use crate::error::SimError;
use crate::types::{Direction, Sense};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable directed force with a duration
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Impulse {
    direction: Direction,
    sense: Sense,
    magnitude: f64,
    duration: f64,
}

impl Impulse {
    /// Build an impulse, rejecting a sense that does not belong to the direction.
    ///
    /// Magnitude and duration are taken as given.
    pub fn new(
        direction: Direction,
        sense: Sense,
        magnitude: f64,
        duration: f64,
    ) -> Result<Self, SimError> {
        if sense.direction() != direction {
            return Err(SimError::InvalidDirectionOrSense { direction, sense });
        }

        Ok(Impulse {
            direction,
            sense,
            magnitude,
            duration,
        })
    }

    /// Horizontal impulse; the sense must be Left or Right
    pub fn horizontal(sense: Sense, magnitude: f64, duration: f64) -> Result<Self, SimError> {
        Self::new(Direction::Horizontal, sense, magnitude, duration)
    }

    /// Vertical impulse; the sense must be Up or Down
    pub fn vertical(sense: Sense, magnitude: f64, duration: f64) -> Result<Self, SimError> {
        Self::new(Direction::Vertical, sense, magnitude, duration)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Applied force
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Time the force is applied for
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_vertical(&self) -> bool {
        self.direction == Direction::Vertical
    }
}
