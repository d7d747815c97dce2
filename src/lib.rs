//! Grid Snake - a seedable Snake step engine with terminal front-ends
//!
//! This library provides:
//! - Core game logic with injected randomness (game module)
//! - Real-time and turn-based terminal drivers (modes module)
//! - TUI rendering and key mapping (render, input modules)
//! - A small expression calculator (calc module)

pub mod calc;
pub mod game;
pub mod input;
pub mod logger;
pub mod metrics;
pub mod modes;
pub mod render;
