//! Combat rules and match data model for Chimera duels.
//!
//! `chimera-core` defines the canonical rules (hybrid assembly, effective
//! stats, the round resolver, match lifecycle transitions) as pure,
//! synchronous APIs. It performs no I/O; `chimera-runtime` loads games,
//! serializes access per game, calls into [`engine`], and persists the result.
pub mod ability;
pub mod combat;
pub mod config;
pub mod creation;
pub mod engine;
pub mod error;
pub mod rng;
pub mod state;
pub mod stats;

pub use ability::{Ability, InstantEffect, SkillEffect, StrikeKind};
pub use config::GameConfig;
pub use creation::{CreationError, HybridSpec, create_hybrids, derived_name};
pub use engine::{LifecycleError, RoundReport, resolve_round};
pub use error::{ErrorKind, GameError};
pub use rng::RoundRng;
pub use state::{
    CombatStats, Entity, EntityId, Game, GameId, GameStatus, Hybrid, PendingAction, Phase, Player,
    RoundModifiers,
};
