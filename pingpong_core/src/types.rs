//! Core types and constants for the pingpong simulation.

use crate::error::SimError;
use crate::physics::HorizontalModel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Earth's gravity, used for the normal force
pub const GRAVITY: f64 = 9.8;

/// Friction coefficient between an object and the table
pub const FRICTION_COEFFICIENT: f64 = 0.2;

/// Number of impulses a physical object remembers
pub const IMPULSE_HISTORY_LEN: usize = 16;

/// Tick counter type
pub type Tick = u32;

/// Axis an impulse acts along
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Polarity of an impulse within its axis
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sense {
    Left,
    Right,
    Up,
    Down,
}

impl Sense {
    /// The only direction this sense is legal for
    pub fn direction(self) -> Direction {
        match self {
            Sense::Left | Sense::Right => Direction::Horizontal,
            Sense::Up | Sense::Down => Direction::Vertical,
        }
    }

    /// Sign applied to a velocity magnitude (screen coordinates, y grows down)
    pub fn sign(self) -> f64 {
        match self {
            Sense::Left | Sense::Up => -1.0,
            Sense::Right | Sense::Down => 1.0,
        }
    }
}

/// Player/paddle side. Player one holds the near (bottom) paddle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Vertical sense this side serves and returns the ball with
    pub fn serve_sense(self) -> Sense {
        match self {
            Side::One => Sense::Up,
            Side::Two => Sense::Down,
        }
    }
}

/// Position on the arena, in pixels. Origin is the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Playing field dimensions
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Arena { width, height }
    }
}

/// Match score, session scoped
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub player_one: u32,
    pub player_two: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::One => self.player_one,
            Side::Two => self.player_two,
        }
    }

    pub(crate) fn award(&mut self, side: Side) {
        match side {
            Side::One => self.player_one += 1,
            Side::Two => self.player_two += 1,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Playing field size
    pub arena: Arena,
    /// Tick frequency (Hz)
    pub tick_hz: u16,
    /// Paddle rectangle width
    pub paddle_width: f64,
    /// Paddle rectangle height (must differ from width)
    pub paddle_height: f64,
    /// Paddle weight
    pub paddle_weight: f64,
    /// Player one paddle top-left corner
    pub paddle_one_start: Position,
    /// Player two paddle top-left corner
    pub paddle_two_start: Position,
    pub paddle_one_color: String,
    pub paddle_two_color: String,
    /// Force of one left/right key press
    pub push_magnitude: f64,
    /// Duration of one left/right key press
    pub push_duration: f64,
    /// Velocity formula for paddles
    pub paddle_model: HorizontalModel,
    /// Ball radius
    pub ball_radius: f64,
    /// Ball weight
    pub ball_weight: f64,
    /// Ball center at match start
    pub ball_start: Position,
    pub ball_color: String,
    /// Velocity formula for the ball's lateral nudge
    pub ball_model: HorizontalModel,
    /// Force of the vertical impulse on a paddle hit
    pub hit_magnitude: f64,
    /// Duration of the vertical impulse on a paddle hit
    pub hit_duration: f64,
    /// Force of the serve impulse
    pub serve_magnitude: f64,
    /// Duration of the serve impulse
    pub serve_duration: f64,
    /// Respawn row when player one scores
    pub top_respawn_y: f64,
    /// Respawn row when player two scores
    pub bottom_respawn_y: f64,
    /// Respawn offset after a side-out (x axis crossing)
    pub side_out_offset: f64,
    /// Respawn offset after an end-out (y axis crossing)
    pub end_out_offset: f64,
    /// Whether a second paddle takes part
    pub two_players: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arena: Arena::new(600.0, 700.0),
            tick_hz: 100,
            paddle_width: 80.0,
            paddle_height: 10.0,
            paddle_weight: 25.0,
            paddle_one_start: Position::new(260.0, 660.0),
            paddle_two_start: Position::new(260.0, 30.0),
            paddle_one_color: "#FF0000".to_string(),
            paddle_two_color: "#0000FF".to_string(),
            push_magnitude: 55.0,
            push_duration: 7.0,
            paddle_model: HorizontalModel::FrictionSubtracted,
            ball_radius: 10.0,
            ball_weight: 25.0,
            ball_start: Position::new(300.0, 640.0),
            ball_color: "#FFFFFF".to_string(),
            ball_model: HorizontalModel::FrictionGated,
            hit_magnitude: 60.0,
            hit_duration: 2.0,
            serve_magnitude: 60.0,
            serve_duration: 2.0,
            top_respawn_y: 100.0,
            bottom_respawn_y: 600.0,
            side_out_offset: 10.0,
            end_out_offset: 40.0,
            two_players: true,
        }
    }
}

impl Config {
    /// Check the values that the shapes and physical objects do not validate themselves
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "arena must be non-empty, got {}x{}",
                self.arena.width, self.arena.height
            )));
        }
        if self.tick_hz == 0 {
            return Err(SimError::InvalidConfig("tick_hz must be positive".into()));
        }
        Ok(())
    }
}

/// Per-axis boundary violation flags
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Crossing {
    pub axis_x: bool,
    pub axis_y: bool,
}

impl Crossing {
    pub fn any(&self) -> bool {
        self.axis_x || self.axis_y
    }
}

/// View data for rendering and inspection
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct View {
    pub tick: Tick,
    pub running: bool,
    pub paddle_one: Position,
    pub paddle_two: Option<Position>,
    pub ball: Position,
    pub ball_velocity: (f64, f64),
    pub score: Score,
}

/// Things that happened during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Event {
    /// A paddle sent the ball back
    PaddleHit { side: Side },
    /// A player served
    Served { side: Side },
    /// A point was attributed
    Scored { scorer: Side, score: Score },
}
