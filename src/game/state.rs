use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid, in grid units (not cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `step` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }

    /// Whether both coordinates are exact multiples of `cell_size`
    pub fn is_cell_aligned(&self, cell_size: i32) -> bool {
        self.x % cell_size == 0 && self.y % cell_size == 0
    }

    /// Column/row index of the cell holding this position
    pub fn cell(&self, cell_size: i32) -> (i32, i32) {
        (self.x.div_euclid(cell_size), self.y.div_euclid(cell_size))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Whether any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move snake `step` units in its current direction, growing if
    /// `should_grow` is true. Returns the new head.
    pub fn move_snake(&mut self, step: i32, should_grow: bool) -> Position {
        let new_head = self.head().moved_in_direction(self.direction, step);
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }

        new_head
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a snake built by the game)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: i32,
    pub grid_height: i32,
    pub cell_size: i32,
    pub score: u32,
    pub terminated: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: i32,
        grid_height: i32,
        cell_size: i32,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            cell_size,
            score: 0,
            terminated: false,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.grid_width && pos.y >= 0 && pos.y < self.grid_height
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.grid_width / self.cell_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.grid_height / self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(50, 50);
        assert_eq!(pos.moved_by(10, 0), Position::new(60, 50));
        assert_eq!(pos.moved_by(-10, 0), Position::new(40, 50));
        assert_eq!(pos.moved_in_direction(Direction::Down, 10), Position::new(50, 60));
        assert_eq!(pos.moved_in_direction(Direction::Up, 10), Position::new(50, 40));
    }

    #[test]
    fn test_cell_alignment() {
        assert!(Position::new(70, 50).is_cell_aligned(10));
        assert!(Position::new(0, 0).is_cell_aligned(10));
        assert!(!Position::new(75, 50).is_cell_aligned(10));
        assert_eq!(Position::new(70, 50).cell(10), (7, 5));
        assert_eq!(Position::new(-10, 0).cell(10), (-1, 0));
    }

    #[test]
    fn test_snake_from_segments() {
        let snake = Snake::from_segments(
            vec![
                Position::new(100, 50),
                Position::new(90, 50),
                Position::new(80, 50),
                Position::new(70, 50),
            ],
            Direction::Right,
        );
        assert_eq!(snake.len(), 4);
        assert!(!snake.is_empty());
        assert_eq!(snake.head(), Position::new(100, 50));
        assert_eq!(snake.body_segments()[0], Position::new(90, 50));
        assert_eq!(snake.tail(), Position::new(70, 50));
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::from_segments(
            vec![
                Position::new(50, 50),
                Position::new(40, 50),
                Position::new(30, 50),
            ],
            Direction::Right,
        );

        // Move without growing
        let head = snake.move_snake(10, false);
        assert_eq!(head, Position::new(60, 50));
        assert_eq!(snake.len(), 3);

        // Move with growing
        snake.move_snake(10, true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(70, 50));
        assert_eq!(snake.tail(), Position::new(40, 50));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::from_segments(
            vec![
                Position::new(50, 50),
                Position::new(40, 50),
                Position::new(30, 50),
            ],
            Direction::Right,
        );
        assert!(!snake.collides_with_body(Position::new(50, 50))); // head
        assert!(snake.collides_with_body(Position::new(40, 50))); // body
        assert!(!snake.collides_with_body(Position::new(100, 100))); // empty
        assert!(snake.occupies(Position::new(50, 50)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::from_segments(
                vec![
                    Position::new(50, 50),
                    Position::new(40, 50),
                    Position::new(30, 50),
                ],
                Direction::Right,
            ),
            Position::new(100, 100),
            200,
            150,
            10,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(190, 140)));
        assert!(!state.is_in_bounds(Position::new(-10, 0)));
        assert!(!state.is_in_bounds(Position::new(200, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 150)));
        assert_eq!(state.columns(), 20);
        assert_eq!(state.rows(), 15);
    }
}
