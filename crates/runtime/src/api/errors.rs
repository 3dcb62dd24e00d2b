//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule violations from `chimera-core`, storage failures, and the
//! service-level preconditions so callers can classify every failure through
//! [`GameError`].
use chimera_core::{
    CreationError, EntityId, ErrorKind, GameError, GameId, LifecycleError, PendingAction,
};
use thiserror::Error;

pub use crate::generation::GenerationError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("no game uses join code {0}")]
    JoinCodeNotFound(String),

    #[error("game is not in progress")]
    GameNotInProgress,

    #[error("actions are locked; resolving current round")]
    ActionsLocked,

    #[error("player not in game")]
    PlayerNotInGame,

    #[error("no active hybrid")]
    NoActiveHybrid,

    #[error("hybrid has no selected ability")]
    HybridHasNoSelectedAbility,

    #[error("ability must come from creature {selected}, not {requested}")]
    AbilityMismatch {
        selected: EntityId,
        requested: EntityId,
    },

    #[error("{0} cannot be submitted as a round action")]
    InvalidAction(PendingAction),

    #[error("game already has two players")]
    GameFull,

    #[error("player already joined this game")]
    AlreadyJoined,

    #[error("players cannot leave after the game has started")]
    CannotLeaveAfterStart,

    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("timeout worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl GameError for ServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::GameNotFound(_) | Self::JoinCodeNotFound(_) | Self::PlayerNotInGame => {
                ErrorKind::NotFound
            }
            Self::GameNotInProgress
            | Self::ActionsLocked
            | Self::NoActiveHybrid
            | Self::GameFull
            | Self::AlreadyJoined
            | Self::CannotLeaveAfterStart => ErrorKind::StateConflict,
            Self::HybridHasNoSelectedAbility
            | Self::AbilityMismatch { .. }
            | Self::InvalidAction(_) => ErrorKind::Validation,
            Self::Creation(err) => err.kind(),
            Self::Lifecycle(err) => err.kind(),
            Self::Repository(_) | Self::Generation(_) | Self::WorkerJoin(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GameNotFound(_) => "game_not_found",
            Self::JoinCodeNotFound(_) => "join_code_not_found",
            Self::GameNotInProgress => "game_not_in_progress",
            Self::ActionsLocked => "actions_locked",
            Self::PlayerNotInGame => "player_not_in_game",
            Self::NoActiveHybrid => "no_active_hybrid",
            Self::HybridHasNoSelectedAbility => "hybrid_has_no_selected_ability",
            Self::AbilityMismatch { .. } => "ability_mismatch",
            Self::InvalidAction(_) => "invalid_action",
            Self::GameFull => "game_full",
            Self::AlreadyJoined => "already_joined",
            Self::CannotLeaveAfterStart => "cannot_leave_after_start",
            Self::Creation(err) => err.error_code(),
            Self::Lifecycle(err) => err.error_code(),
            Self::Repository(_) => "repository_error",
            Self::Generation(_) => "generation_failed",
            Self::WorkerJoin(_) => "worker_join_failed",
        }
    }
}
