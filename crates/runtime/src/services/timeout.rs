//! Timeout handling for rounds whose action deadline elapsed.

use std::sync::Arc;

use chimera_core::engine::{ABANDONED_SUMMARY, DOUBLE_TIMEOUT_SUMMARY, expire_for_inactivity};
use chimera_core::{EntityId, Game, GameId, PendingAction};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::settle_stats;
use super::submission::SubmissionCoordinator;
use crate::api::{Result, ServiceError};
use crate::config::ServiceConfig;
use crate::locks::GameLocks;
use crate::repository::Repositories;

/// What timeout handling did to one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// Not in planning, or the deadline has not passed.
    NotDue,
    /// Fewer than two players remain; finished with no winner.
    Abandoned,
    /// Neither player submitted; finished with no winner.
    DoubleTimeout,
    /// `email` was silent and got an automatic rest.
    AutoRested { email: String, resolved: bool },
    /// Both actions are in; nothing to do.
    AwaitingResolution,
}

impl TimeoutOutcome {
    /// True when handling mutated the game.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Self::Abandoned | Self::DoubleTimeout | Self::AutoRested { .. }
        )
    }
}

/// Result of one claim-and-handle pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Games this worker claimed, ascending.
    pub claimed: Vec<GameId>,
    /// Claimed games handled and released.
    pub handled: usize,
    /// Claimed games whose handling failed; their claims are left to go stale.
    pub failed: usize,
}

/// Finishes or advances games whose planning deadline elapsed.
#[derive(Clone)]
pub struct TimeoutCoordinator {
    repos: Repositories,
    locks: GameLocks,
    submissions: SubmissionCoordinator,
    config: Arc<ServiceConfig>,
}

impl TimeoutCoordinator {
    pub fn new(
        repos: Repositories,
        locks: GameLocks,
        submissions: SubmissionCoordinator,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self {
            repos,
            locks,
            submissions,
            config,
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.config.worker_id
    }

    /// Claims timed-out games and handles each one.
    ///
    /// A failure on one game is logged and does not stop the pass; the game
    /// stays claimed until the claim goes stale and another pass retries it.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let claimed = self.repos.games.claim_timed_out_game_ids(
            now,
            self.config.claim_limit,
            self.config.reclaim_after_delta(),
            &self.config.worker_id,
        )?;
        if !claimed.is_empty() {
            debug!(worker_id = %self.config.worker_id, count = claimed.len(), "claimed timed-out games");
        }

        let mut report = SweepReport {
            claimed: claimed.clone(),
            ..SweepReport::default()
        };
        for id in claimed {
            match self.handle_timed_out(id, now).await {
                Ok(outcome) => {
                    debug!(game_id = %id, ?outcome, "timeout handled");
                    if let Err(e) = self.repos.games.release_claim(id, &self.config.worker_id) {
                        warn!(game_id = %id, error = %e, "failed to release claim");
                    }
                    report.handled += 1;
                }
                Err(e) => {
                    error!(game_id = %id, error = %e, "failed to handle timed-out game");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// Loads `id` under its lock and applies timeout handling as of `now`.
    pub async fn handle_timed_out(&self, id: GameId, now: DateTime<Utc>) -> Result<TimeoutOutcome> {
        let _guard = self.locks.acquire(id).await;

        let mut game = self
            .repos
            .games
            .get_game(id)?
            .ok_or(ServiceError::GameNotFound(id))?;
        let outcome = self.apply(&mut game, now)?;
        if outcome.changed() {
            self.repos.games.update_game(&game)?;
            settle_stats(&self.repos, &mut game, None);
        }
        Ok(outcome)
    }

    /// Applies timeout handling to a loaded game. The caller holds the lock,
    /// persists the game when the outcome reports a change, and then settles
    /// stats.
    pub(crate) fn apply(&self, game: &mut Game, now: DateTime<Utc>) -> Result<TimeoutOutcome> {
        if !(game.is_in_progress() && game.is_planning() && game.deadline_elapsed(now)) {
            return Ok(TimeoutOutcome::NotDue);
        }

        if game.players.len() != 2 {
            info!(game_id = %game.id, "game lost a player; ending for inactivity");
            expire_for_inactivity(game, ABANDONED_SUMMARY);
            return Ok(TimeoutOutcome::Abandoned);
        }

        let silent: Vec<String> = game
            .players
            .iter()
            .filter(|p| !p.has_submitted_action)
            .map(|p| p.email.clone())
            .collect();

        match silent.as_slice() {
            [] => Ok(TimeoutOutcome::AwaitingResolution),
            [email] => {
                info!(game_id = %game.id, player = %email, "auto-submitting rest for silent player");
                let resolved = self.submissions.apply(
                    game,
                    email,
                    PendingAction::Rest,
                    EntityId::NONE,
                    now,
                )?;
                Ok(TimeoutOutcome::AutoRested {
                    email: email.clone(),
                    resolved,
                })
            }
            _ => {
                info!(game_id = %game.id, "both players timed out; finishing game");
                expire_for_inactivity(game, DOUBLE_TIMEOUT_SUMMARY);
                Ok(TimeoutOutcome::DoubleTimeout)
            }
        }
    }
}
