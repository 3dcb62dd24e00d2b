//! Repository contracts consumed by the services.
//!
//! Every method is synchronous and must be safe to call from several tasks at
//! once. Services serialize read-modify-write cycles per game through
//! [`GameLocks`](crate::GameLocks); the repository itself only has to make
//! each individual call atomic.

use chimera_core::{Entity, EntityId, Game, GameId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Result;

/// Storage for match aggregates.
pub trait GameRepository: Send + Sync {
    /// Stores a new game and returns it with its assigned id.
    fn create_game(&self, game: Game) -> Result<Game>;

    /// Load a game by id
    fn get_game(&self, id: GameId) -> Result<Option<Game>>;

    /// Replace the stored aggregate, nested players and hybrids included.
    ///
    /// Fails with `GameNotFound` when the id was never created.
    fn update_game(&self, game: &Game) -> Result<()>;

    /// Look up a game by its join code (case-insensitive).
    fn find_by_join_code(&self, join_code: &str) -> Result<Option<Game>>;

    /// Atomically claims up to `limit` games whose planning deadline elapsed
    /// before `now`.
    ///
    /// A game is claimable when nobody holds it or its claim is at least
    /// `reclaim_after` old. Returns exactly the ids this call stamped with
    /// `worker_id`.
    fn claim_timed_out_game_ids(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        reclaim_after: Duration,
        worker_id: &str,
    ) -> Result<Vec<GameId>>;

    /// Drops the claim on `id` if `worker_id` still holds it.
    fn release_claim(&self, id: GameId, worker_id: &str) -> Result<()>;
}

/// Read-only creature catalog.
pub trait EntityRepository: Send + Sync {
    /// Entities matching `ids`, in request order. Unknown ids are skipped.
    fn entities_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Entity>>;

    fn all_entities(&self) -> Result<Vec<Entity>>;
}

/// Lifetime counters for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub email: String,
    pub display_name: String,
    pub games_played: u32,
    pub wins: u32,
    pub resignations: u32,
}

/// Leaderboard counters.
///
/// Updates are not idempotent; callers gate them on `Game::stats_counted`.
pub trait StatsRepository: Send + Sync {
    /// Credits a finished game to both seats.
    ///
    /// Every seated player gets one game played. The seat whose display name
    /// matches `game.winner` and that still has hybrids standing gets a win.
    /// `resigned_email`, when given, gets a resignation.
    fn update_stats_on_game_end(&self, game: &Game, resigned_email: Option<&str>) -> Result<()>;

    fn stats(&self, email: &str) -> Result<Option<PlayerStats>>;

    /// Best players first: most wins, then most games played, then email.
    fn top_players(&self, limit: usize) -> Result<Vec<PlayerStats>>;
}
