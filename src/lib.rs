//! Grid Snake - a single-player snake game on a fixed-size grid
//!
//! This library provides:
//! - Core game state machine (game module)
//! - Key mapping (input module)
//! - TUI rendering (render module)
//! - Session metrics shown in the header (metrics module)
//! - The interactive terminal loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
