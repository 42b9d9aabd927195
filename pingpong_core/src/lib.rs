//! Pingpong core - impulse-driven Pong simulation
//!
//! Paddles and the ball are moved by impulses resisted by friction. A
//! [`Game`] holds the match state and advances it one tick at a time; a
//! [`Runner`] paces ticks from host frames through an injected
//! [`Scheduler`] and paints through a [`Renderer`].

pub mod entity;
pub mod error;
pub mod game;
pub mod impulse;
pub mod input;
pub mod physics;
pub mod render;
pub mod schedule;
pub mod shape;
pub mod types;

// WASM bridge module - only compiled when wasm feature is enabled
#[cfg(feature = "wasm")]
pub mod wasm;

pub use entity::{Ball, Paddle};
pub use error::SimError;
pub use game::Game;
pub use impulse::Impulse;
pub use input::{Action, InputEvent, InputQueue, InputSender, Key, KeyMap};
pub use physics::{HorizontalModel, PhysicalObject, Physics};
pub use render::{DisplayList, DrawCommand, Renderer};
pub use schedule::{FrameGate, ManualScheduler, Runner, Scheduler, TickHandle};
pub use shape::{Circle, Rectangle, Shape};
pub use types::*;
