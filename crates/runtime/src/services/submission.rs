//! Action submission: two independent writers merged into one resolution.

use std::sync::{Arc, Mutex, PoisonError};

use chimera_core::{EntityId, Game, GameId, PendingAction, resolve_round};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::settle_stats;
use crate::api::{Result, ServiceError};
use crate::config::ServiceConfig;
use crate::locks::GameLocks;
use crate::repository::Repositories;

/// Result of an accepted submission.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    /// Game as stored after the submission.
    pub game: Game,
    /// True when this submission completed the round and triggered resolution.
    pub resolved: bool,
}

/// Records round actions and resolves the round once both seats submitted.
///
/// Resolution runs inside the same locked cycle as the second submission, so
/// it happens exactly once per round whatever the arrival order.
#[derive(Clone)]
pub struct SubmissionCoordinator {
    repos: Repositories,
    locks: GameLocks,
    rng: Arc<Mutex<StdRng>>,
    action_timeout: chrono::Duration,
}

impl SubmissionCoordinator {
    pub fn new(repos: Repositories, locks: GameLocks, config: &ServiceConfig) -> Self {
        Self {
            repos,
            locks,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            action_timeout: config.action_timeout_delta(),
        }
    }

    /// Replaces the random source used for tie-breaks and stun rolls.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    /// Submits `action` for `email`.
    ///
    /// `entity_id` only matters for [`PendingAction::Ability`]; `0` means the
    /// hybrid's selected creature.
    pub async fn submit(
        &self,
        game_id: GameId,
        email: &str,
        action: PendingAction,
        entity_id: u32,
    ) -> Result<SubmitOutcome> {
        let _guard = self.locks.acquire(game_id).await;

        let mut game = self
            .repos
            .games
            .get_game(game_id)?
            .ok_or(ServiceError::GameNotFound(game_id))?;
        let resolved = self.apply(&mut game, email, action, EntityId(entity_id), Utc::now())?;
        self.repos.games.update_game(&game)?;
        settle_stats(&self.repos, &mut game, None);

        Ok(SubmitOutcome { game, resolved })
    }

    /// Applies a submission to a loaded game.
    ///
    /// The caller holds the game's lock, persists the result, and settles
    /// stats once a finished game is stored. Returns whether the round was
    /// resolved.
    pub(crate) fn apply(
        &self,
        game: &mut Game,
        email: &str,
        action: PendingAction,
        entity: EntityId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !game.is_in_progress() {
            return Err(ServiceError::GameNotInProgress);
        }
        if !game.is_planning() {
            return Err(ServiceError::ActionsLocked);
        }
        if game.players.len() != 2 {
            return Err(ServiceError::PlayerNotInGame);
        }
        let seat = game
            .player_index(email)
            .ok_or(ServiceError::PlayerNotInGame)?;
        let player = &game.players[seat];
        if player.has_submitted_action {
            return Err(ServiceError::ActionsLocked);
        }
        if matches!(action, PendingAction::None | PendingAction::Skip) {
            return Err(ServiceError::InvalidAction(action));
        }

        let hybrid = player.active_hybrid().ok_or(ServiceError::NoActiveHybrid)?;
        let pending_entity = if action == PendingAction::Ability {
            let selected = hybrid
                .selected_ability
                .ok_or(ServiceError::HybridHasNoSelectedAbility)?;
            if !entity.is_none() && entity != selected {
                return Err(ServiceError::AbilityMismatch {
                    selected,
                    requested: entity,
                });
            }
            Some(selected)
        } else {
            None
        };

        game.players[seat].submit(action, pending_entity);
        debug!(game_id = %game.id, player = email, %action, "action submitted");

        if !game.both_submitted() {
            return Ok(false);
        }

        let report = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            resolve_round(game, &mut *rng)
        };
        let Some(report) = report else {
            warn!(game_id = %game.id, "round not resolvable; a seat has no active hybrid");
            return Ok(false);
        };

        info!(
            game_id = %game.id,
            round = report.round,
            finished = report.finished,
            winner = report.winner.as_deref().unwrap_or("-"),
            "round resolved"
        );
        if !report.finished {
            game.action_deadline = Some(now + self.action_timeout);
        }
        Ok(true)
    }
}
