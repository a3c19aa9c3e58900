//! Error taxonomy shared by every EvoArena crate

/// Errors raised by game, strategy, match, tournament and evolution code.
///
/// Nothing in the library retries on these; they are returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArenaError {
    #[error("Invalid move: {action}. Valid actions: {valid:?}")]
    InvalidMove { action: String, valid: Vec<String> },

    #[error("Unknown strategy: {name}. Available: {available:?}")]
    UnknownStrategy { name: String, available: Vec<String> },

    #[error("Unknown game: {name}. Available: {available:?}")]
    UnknownGame { name: String, available: Vec<String> },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No strategies available")]
    NoStrategiesAvailable,

    #[error("Invalid game specification: {0}")]
    InvalidGameSpec(String),

    #[error("Duplicate strategy registration: {0}")]
    DuplicateStrategy(String),

    #[error("No move from {seat}: {reason}")]
    MoveInput { seat: String, reason: String },
}

impl ArenaError {
    /// Shorthand for `InvalidParameter` with a formatted message
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ArenaError::InvalidParameter(message.into())
    }

    /// An external move source could not produce a move
    pub fn move_input(seat: impl Into<String>, reason: impl Into<String>) -> Self {
        ArenaError::MoveInput {
            seat: seat.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, ArenaError>;
