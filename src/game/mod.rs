//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Both terminal drivers and the tests run sessions through [`GameEngine`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, StepOutcome};
pub use state::{CollisionType, EventLog, GameEvent, GameState, Position, Snake};
