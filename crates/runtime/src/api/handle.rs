//! Cloneable façade over the game services.
//!
//! [`RuntimeHandle`] is what request handlers and bots hold. Every method
//! reloads the game from storage; no game state lives in the handle.
use chimera_core::{Entity, Game, GameId, HybridSpec, PendingAction, Player};
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use super::errors::Result;
use crate::repository::{PlayerStats, Repositories};
use crate::services::{
    HybridService, MatchService, SubmissionCoordinator, SubmitOutcome, SweepReport,
    TimeoutCoordinator,
};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    repos: Repositories,
    submissions: SubmissionCoordinator,
    timeouts: TimeoutCoordinator,
    hybrids: HybridService,
    matches: MatchService,
}

impl RuntimeHandle {
    pub(crate) fn new(
        repos: Repositories,
        submissions: SubmissionCoordinator,
        timeouts: TimeoutCoordinator,
        hybrids: HybridService,
        matches: MatchService,
    ) -> Self {
        Self {
            repos,
            submissions,
            timeouts,
            hybrids,
            matches,
        }
    }

    /// Open a waiting room hosted by `host`
    pub fn create_game(&self, name: &str, host: Player) -> Result<Game> {
        self.matches.create_game(name, host)
    }

    pub async fn join_game(&self, join_code: &str, player: Player) -> Result<Game> {
        self.matches.join_game(join_code, player).await
    }

    pub async fn leave_game(&self, game_id: GameId, email: &str) -> Result<Game> {
        self.matches.leave_game(game_id, email).await
    }

    /// Assemble both hybrids for `email` before the match starts
    pub async fn create_hybrids(
        &self,
        game_id: GameId,
        email: &str,
        specs: [HybridSpec; 2],
    ) -> Result<Game> {
        self.hybrids.create_hybrids(game_id, email, specs).await
    }

    /// Start the match; the returned task finishes when the start job settled
    pub async fn start_game(&self, game_id: GameId) -> Result<JoinHandle<()>> {
        self.matches.start_game(game_id).await
    }

    /// Submit a round action for `email`
    ///
    /// `entity_id` selects the ability creature; `0` uses the hybrid's selection.
    pub async fn submit_action(
        &self,
        game_id: GameId,
        email: &str,
        action: PendingAction,
        entity_id: u32,
    ) -> Result<SubmitOutcome> {
        self.submissions
            .submit(game_id, email, action, entity_id)
            .await
    }

    /// Read a game, applying any overdue timeout first
    pub async fn get_game(&self, game_id: GameId) -> Result<Game> {
        self.matches.get_game(game_id).await
    }

    /// Resign on behalf of `email`
    pub async fn end_game(&self, game_id: GameId, email: &str) -> Result<Game> {
        self.matches.end_game(game_id, email).await
    }

    /// Run one timeout sweep as of `now`, outside the worker's schedule
    pub async fn sweep_timeouts(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        self.timeouts.sweep(now).await
    }

    pub fn catalog(&self) -> Result<Vec<Entity>> {
        Ok(self.repos.entities.all_entities()?)
    }

    pub fn player_stats(&self, email: &str) -> Result<Option<PlayerStats>> {
        Ok(self.repos.stats.stats(email)?)
    }

    pub fn leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>> {
        Ok(self.repos.stats.top_players(limit)?)
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }
}
