//! Repository layer for match data
//!
//! Repositories handle data that CHANGES while matches run:
//! - Game aggregates (lobby, rounds, results)
//! - Leaderboard counters
//!
//! The creature catalog is read-only after boot but is still reached through
//! a repository so the services never depend on how it was loaded.

mod error;
mod memory;
mod traits;

use std::sync::Arc;

pub use error::{RepositoryError, Result};
pub use memory::{Claim, InMemoryEntityRepo, InMemoryGameRepo, InMemoryStatsRepo};
pub use traits::{EntityRepository, GameRepository, PlayerStats, StatsRepository};

/// Shared handles to every repository a service may touch.
#[derive(Clone)]
pub struct Repositories {
    pub games: Arc<dyn GameRepository>,
    pub entities: Arc<dyn EntityRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Repositories {
    pub fn new(
        games: Arc<dyn GameRepository>,
        entities: Arc<dyn EntityRepository>,
        stats: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            games,
            entities,
            stats,
        }
    }

    /// Fresh in-memory stores around a fixed catalog.
    pub fn in_memory(catalog: Vec<chimera_core::Entity>) -> Self {
        Self::new(
            Arc::new(InMemoryGameRepo::new()),
            Arc::new(InMemoryEntityRepo::new(catalog)),
            Arc::new(InMemoryStatsRepo::new()),
        )
    }
}
