use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use super::{
    config::{FoodPlacement, GameConfig},
    direction::Direction,
    error::GameError,
    state::{CollisionType, GameState, Position, Snake},
};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Snake body after the tick, head first
    pub snake: Snake,
    /// Food position after the tick (already respawned if it was eaten)
    pub food: Position,
    pub score: u32,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// True only on the tick that ended the game
    pub terminated: bool,
    /// What the snake hit, if this tick ended the game
    pub collision: Option<CollisionType>,
}

/// The game state machine.
///
/// Owns the configuration, the food RNG and all mutable game data. The front
/// end records steering with [`Game::set_direction_intent`] and drives the
/// simulation one step at a time with [`Game::advance`].
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    intent: Option<Direction>,
    ticks: u64,
}

impl Game {
    /// Start a new session: initial snake from the config and one fresh food
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut rng = Self::make_rng(&config);
        let snake = Snake::from_segments(config.initial_snake.clone(), config.initial_direction);
        let food = spawn_food(&config, &snake, &mut rng);
        let state = GameState::new(
            snake,
            food,
            config.grid_width,
            config.grid_height,
            config.cell_size,
        );

        Ok(Self {
            config,
            rng,
            state,
            intent: None,
            ticks: 0,
        })
    }

    /// Resume from an explicit state, e.g. a prepared scenario. The state's
    /// grid geometry is taken from the config; the snake and food must fit
    /// that grid under the same rules as `GameConfig::initial_snake`.
    pub fn from_state(config: GameConfig, mut state: GameState) -> Result<Self, GameError> {
        config.validate()?;
        config.validate_snake(&state.snake.body, state.snake.direction)?;
        config.validate_position("food", state.food)?;

        state.grid_width = config.grid_width;
        state.grid_height = config.grid_height;
        state.cell_size = config.cell_size;

        Ok(Self {
            rng: Self::make_rng(&config),
            config,
            state,
            intent: None,
            ticks: 0,
        })
    }

    fn make_rng(config: &GameConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Record the most recently requested direction. Later calls before the
    /// next tick overwrite earlier ones.
    pub fn set_direction_intent(&mut self, direction: Direction) {
        self.intent = Some(direction);
    }

    /// Execute one tick of the game.
    ///
    /// Returns [`GameError::AlreadyTerminated`] without touching any state
    /// once the game has ended.
    pub fn advance(&mut self) -> Result<TickResult, GameError> {
        if self.state.terminated {
            return Err(GameError::AlreadyTerminated);
        }

        // Reversal guard is checked against the direction at tick time
        if let Some(intent) = self.intent.take() {
            let current = self.state.snake.direction;
            let resolved = current.resolve(intent);
            if resolved != current {
                debug!("direction {:?} -> {:?}", current, resolved);
            }
            self.state.snake.direction = resolved;
        }

        let step = self.config.cell_size;
        let next_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.snake.direction, step);

        // Grow by keeping the tail when the food is eaten
        let ate_food = next_head == self.state.food;
        let new_head = self.state.snake.move_snake(step, ate_food);

        if ate_food {
            self.state.score += self.config.food_reward;
            debug!(
                "food eaten at ({}, {}), score {}",
                new_head.x, new_head.y, self.state.score
            );
            self.state.food = spawn_food(&self.config, &self.state.snake, &mut self.rng);
            debug!("food respawned at ({}, {})", self.state.food.x, self.state.food.y);
        }

        let collision = self.check_collision(new_head);
        if let Some(collision) = collision {
            debug!(
                "{:?} collision at ({}, {}), final score {}",
                collision, new_head.x, new_head.y, self.state.score
            );
            self.state.terminated = true;
        }

        self.ticks += 1;
        trace!(
            "tick {}: head ({}, {}), length {}",
            self.ticks,
            new_head.x,
            new_head.y,
            self.state.snake.len()
        );

        Ok(TickResult {
            snake: self.state.snake.clone(),
            food: self.state.food,
            score: self.state.score,
            ate_food,
            terminated: self.state.terminated,
            collision,
        })
    }

    /// Walls first, then the snake's own body
    fn check_collision(&self, head: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Roll a food position using the configured placement policy
    pub fn spawn_food(&mut self) -> Position {
        spawn_food(&self.config, &self.state.snake, &mut self.rng)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current effective direction (the intent is not applied until the next tick)
    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    /// Number of ticks advanced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn spawn_food<R: Rng + ?Sized>(config: &GameConfig, snake: &Snake, rng: &mut R) -> Position {
    let columns = config.grid_width / config.cell_size;
    let rows = config.grid_height / config.cell_size;
    let cell_at = |index: i32| {
        Position::new(
            (index % columns) * config.cell_size,
            (index / columns) * config.cell_size,
        )
    };

    if config.food_placement == FoodPlacement::AvoidSnake {
        let occupied: HashSet<Position> = snake
            .body
            .iter()
            .copied()
            .filter(|pos| {
                pos.x >= 0 && pos.x < config.grid_width && pos.y >= 0 && pos.y < config.grid_height
            })
            .collect();
        let free = (columns * rows) as usize - occupied.len();

        if free > 0 {
            let nth = rng.gen_range(0..free);
            let pos = (0..columns * rows)
                .map(cell_at)
                .filter(|pos| !occupied.contains(pos))
                .nth(nth);
            if let Some(pos) = pos {
                return pos;
            }
        }
        warn!("no free cell left for food, placing it anywhere");
    }

    cell_at(rng.gen_range(0..columns * rows))
}
