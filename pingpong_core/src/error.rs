//! Errors raised by the simulation.

use crate::types::{Direction, Sense};

/// Everything that can go wrong while building or moving simulation objects
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// The sense is not legal for the direction
    #[error("sense {sense:?} is not valid for direction {direction:?}")]
    InvalidDirectionOrSense { direction: Direction, sense: Sense },

    /// A horizontal push did not overcome friction
    #[error("the force to move the object ({applied}) should be greater than the friction force ({friction})")]
    InsufficientForce { applied: f64, friction: f64 },

    /// A vertical impulse that would not move anything
    #[error("impulse of {magnitude} over {duration} does not move the object")]
    InvalidImpulse { magnitude: f64, duration: f64 },

    /// Zero, negative or degenerate shape dimensions
    #[error("invalid geometry : {0}")]
    InvalidGeometry(String),

    /// A physical object needs a positive weight
    #[error("weight must be positive, got {0}")]
    InvalidWeight(f64),

    /// Configuration values that cannot describe a match
    #[error("invalid configuration : {0}")]
    InvalidConfig(String),
}
