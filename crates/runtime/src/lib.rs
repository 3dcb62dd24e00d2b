//! Runtime services for Chimera duels.
//!
//! This crate wraps the pure rules in `chimera-core` with storage, per-game
//! locking, background timeout handling, and the start-of-match generation
//! collaborators. Consumers build a [`Runtime`] and drive matches through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle and error types downstream clients use
//! - [`services`] holds the submission, timeout, hybrid and match services
//! - [`workers`] runs the periodic timeout sweep
//! - [`generation`] and [`repository`] provide the collaborator and storage seams
pub mod api;
pub mod config;
pub mod generation;
pub mod locks;
pub mod repository;
pub mod runtime;
pub mod services;
pub mod workers;

pub use api::{Result, RuntimeHandle, ServiceError};
pub use config::ServiceConfig;
pub use generation::{
    DerivedNamer, GenerationError, GenerationService, HybridImager, HybridNamer, NameSource,
    PlaceholderImager,
};
pub use locks::GameLocks;
pub use repository::{
    EntityRepository, GameRepository, InMemoryEntityRepo, InMemoryGameRepo, InMemoryStatsRepo,
    PlayerStats, Repositories, RepositoryError, StatsRepository,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use services::{SubmitOutcome, SweepReport, TimeoutOutcome};
pub use workers::{TimeoutMetrics, TimeoutMetricsSnapshot, TimeoutWorker};
