//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The front end drives it one tick at a time and reads the state back to draw.

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use config::{FoodPlacement, GameConfig};
pub use direction::Direction;
pub use engine::{Game, TickResult};
pub use error::GameError;
pub use state::{CollisionType, GameState, Position, Snake};
