//! Error types raised by repository implementations.

use chimera_core::GameId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("game {0} does not exist")]
    GameNotFound(GameId),

    #[error("join code {0} is already in use")]
    DuplicateJoinCode(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
