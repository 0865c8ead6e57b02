use thiserror::Error;

/// Calls that make no sense in the game's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game in progress, reset the game first")]
    NotStarted,
    #[error("the game is over")]
    GameOver,
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },
}
