use thiserror::Error;

/// Errors reported by the game core.
///
/// Wall and self collisions are not errors: they end the game and are
/// reported through [`TickResult`](super::TickResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// `advance()` was called after the game had already ended
    #[error("the game has already terminated")]
    AlreadyTerminated,

    /// The configuration cannot describe a playable game
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}
