use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::direction::Direction;
use super::error::GameError;
use super::state::Position;

/// Fastest tick rate whose interval is still at least one millisecond
pub const MAX_TICK_RATE: u32 = 1000;

/// Where new food is allowed to appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPlacement {
    /// Any cell of the grid, including cells under the snake
    #[default]
    Anywhere,
    /// Only cells the snake does not occupy
    AvoidSnake,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in grid units
    pub grid_width: i32,
    /// Height of the game grid in grid units
    pub grid_height: i32,
    /// Edge length of one cell; every position is a multiple of it
    pub cell_size: i32,
    /// Starting body, head first
    pub initial_snake: Vec<Position>,
    /// Starting direction of movement
    pub initial_direction: Direction,
    /// Score awarded per food eaten
    pub food_reward: u32,
    /// Ticks per second driven by the front end
    pub tick_rate: u32,
    pub food_placement: FoodPlacement,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 720,
            grid_height: 480,
            cell_size: 10,
            initial_snake: vec![
                Position::new(100, 50),
                Position::new(90, 50),
                Position::new(80, 50),
                Position::new(70, 50),
            ],
            initial_direction: Direction::Right,
            food_reward: 10,
            tick_rate: 15,
            food_placement: FoodPlacement::Anywhere,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Duration of one tick in milliseconds
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / u64::from(self.tick_rate.clamp(1, MAX_TICK_RATE))
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<(), GameError> {
        if self.cell_size <= 0 {
            return invalid(format!("cell_size must be positive, got {}", self.cell_size));
        }
        for (name, extent) in [("grid_width", self.grid_width), ("grid_height", self.grid_height)] {
            if extent <= 0 || extent % self.cell_size != 0 {
                return invalid(format!(
                    "{name} must be a positive multiple of cell_size {}, got {extent}",
                    self.cell_size
                ));
            }
        }
        // A tick shorter than one millisecond cannot be scheduled
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return invalid(format!(
                "tick_rate must be between 1 and {MAX_TICK_RATE}, got {}",
                self.tick_rate
            ));
        }

        self.validate_snake(&self.initial_snake, self.initial_direction)
    }

    /// Check a snake body against this grid: non-empty, cell-aligned, on the
    /// grid, no repeated segment, consecutive segments one cell apart, and
    /// `direction` not pointing back into the second segment.
    pub fn validate_snake(&self, body: &[Position], direction: Direction) -> Result<(), GameError> {
        if body.is_empty() {
            return invalid("snake must have at least one segment".to_string());
        }

        let mut seen = HashSet::new();
        for pos in body {
            self.validate_position("segment", *pos)?;
            if !seen.insert(*pos) {
                return invalid(format!("segment ({}, {}) appears twice", pos.x, pos.y));
            }
        }

        for pair in body.windows(2) {
            let distance = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
            if distance != self.cell_size {
                return invalid(format!(
                    "segments ({}, {}) and ({}, {}) are not adjacent",
                    pair[0].x, pair[0].y, pair[1].x, pair[1].y
                ));
            }
        }

        if let [head, neck, ..] = body {
            if head.moved_in_direction(direction, self.cell_size) == *neck {
                return invalid(format!("direction {:?} points back into the body", direction));
            }
        }

        Ok(())
    }

    /// Check that `pos` is cell-aligned and inside the grid
    pub fn validate_position(&self, what: &str, pos: Position) -> Result<(), GameError> {
        if !pos.is_cell_aligned(self.cell_size) {
            return invalid(format!("{what} ({}, {}) is not cell-aligned", pos.x, pos.y));
        }
        if pos.x < 0 || pos.x >= self.grid_width || pos.y < 0 || pos.y >= self.grid_height {
            return invalid(format!("{what} ({}, {}) is outside the grid", pos.x, pos.y));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Result<(), GameError> {
    Err(GameError::InvalidConfig(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 720);
        assert_eq!(config.grid_height, 480);
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.initial_snake.len(), 4);
        assert_eq!(config.initial_direction, Direction::Right);
        assert_eq!(config.food_reward, 10);
        assert_eq!(config.tick_rate, 15);
        assert_eq!(config.food_placement, FoodPlacement::Anywhere);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200);
        assert_eq!(config.grid_width, 300);
        assert_eq!(config.grid_height, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(GameConfig::default().tick_interval_ms(), 66);
    }

    #[test]
    fn test_tick_rate_limits() {
        let mut config = GameConfig::default();

        config.tick_rate = MAX_TICK_RATE;
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval_ms(), 1);

        config.tick_rate = 2000;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
        assert!(config.tick_interval_ms() >= 1);

        config.tick_rate = 0;
        assert!(config.validate().is_err());
        assert!(config.tick_interval_ms() >= 1);
    }

    #[test]
    fn test_rejects_misaligned_grid() {
        let config = GameConfig::new(725, 480);
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_snake_outside_grid() {
        // Default snake head sits at x = 100
        let config = GameConfig::new(100, 100);
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_broken_snake() {
        let mut config = GameConfig::default();
        config.initial_snake = vec![Position::new(100, 50), Position::new(80, 50)];
        assert!(config.validate().is_err());

        config.initial_snake = vec![Position::new(100, 50), Position::new(100, 50)];
        assert!(config.validate().is_err());

        config.initial_snake = Vec::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_direction_into_body() {
        let mut config = GameConfig::default();
        config.initial_direction = Direction::Left;
        assert!(config.validate().is_err());

        config.initial_direction = Direction::Up;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "grid_width": 400, "seed": 7, "food_placement": "avoid_snake" }}"#
        )
        .unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_width, 400);
        assert_eq!(config.grid_height, 480);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.food_placement, FoodPlacement::AvoidSnake);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = GameConfig::from_json_file(&dir.path().join("nope.json"));
        assert!(result.is_err());
    }
}
