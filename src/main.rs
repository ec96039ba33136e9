use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{FoodPlacement, GameConfig};
use grid_snake::modes::HumanMode;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake game on a fixed-size grid")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in grid units
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in grid units
    #[arg(long)]
    height: Option<i32>,

    /// Edge length of one cell
    #[arg(long)]
    cell_size: Option<i32>,

    /// Ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Never spawn food under the snake
    #[arg(long)]
    avoid_snake_food: bool,

    /// How long the final score stays on screen
    #[arg(long, default_value = "2000")]
    game_over_delay_ms: u64,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.avoid_snake_food {
            config.food_placement = FoodPlacement::AvoidSnake;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.game_config()?;
    info!(
        "starting {}x{} grid, cell {}, {} ticks/s",
        config.grid_width, config.grid_height, config.cell_size, config.tick_rate
    );

    let mut human_mode = HumanMode::new(config, Duration::from_millis(cli.game_over_delay_ms))?;
    let score = human_mode.run().await?;

    info!("session ended with score {}", score);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["grid_snake"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config, GameConfig::default());
        assert_eq!(cli.game_over_delay_ms, 2000);
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::parse_from([
            "grid_snake",
            "--width",
            "400",
            "--height",
            "300",
            "--tick-rate",
            "10",
            "--seed",
            "9",
            "--avoid-snake-food",
        ]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_width, 400);
        assert_eq!(config.grid_height, 300);
        assert_eq!(config.tick_rate, 10);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.food_placement, FoodPlacement::AvoidSnake);
    }

    #[test]
    fn test_rejects_bad_flags() {
        let cli = Cli::parse_from(["grid_snake", "--cell-size", "7"]);
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "grid_width": 300, "tick_rate": 5 }"#).unwrap();

        let cli = Cli::parse_from([
            "grid_snake",
            "--config",
            path.to_str().unwrap(),
            "--tick-rate",
            "20",
        ]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_width, 300);
        assert_eq!(config.tick_rate, 20);
    }
}
