//! In-memory GameRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use chimera_core::{Game, GameId, GameStatus, Phase};
use chrono::{DateTime, Duration, Utc};

use crate::repository::{GameRepository, RepositoryError, Result};

/// Worker stamp placed on a game by a timeout sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub worker_id: String,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
struct GameRecord {
    game: Game,
    claim: Option<Claim>,
}

impl GameRecord {
    fn is_claimable(&self, now: DateTime<Utc>, reclaim_after: Duration) -> bool {
        let game = &self.game;
        let timed_out = game.status == GameStatus::InProgress
            && game.phase == Some(Phase::Planning)
            && game.deadline_elapsed(now);
        let free = self
            .claim
            .as_ref()
            .is_none_or(|claim| claim.claimed_at + reclaim_after <= now);
        timed_out && free
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    records: HashMap<GameId, GameRecord>,
}

/// In-memory implementation of GameRepository.
///
/// All claim bookkeeping happens under a single write lock, so concurrent
/// sweeps never hand the same game to two workers.
pub struct InMemoryGameRepo {
    inner: RwLock<Inner>,
}

impl InMemoryGameRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Current claim on `id`, if any.
    pub fn claim(&self, id: GameId) -> Result<Option<Claim>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner.records.get(&id).and_then(|record| record.claim.clone()))
    }
}

impl Default for InMemoryGameRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRepository for InMemoryGameRepo {
    fn create_game(&self, mut game: Game) -> Result<Game> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let code_taken = inner
            .records
            .values()
            .any(|record| record.game.join_code.eq_ignore_ascii_case(&game.join_code));
        if !game.join_code.is_empty() && code_taken {
            return Err(RepositoryError::DuplicateJoinCode(game.join_code));
        }

        inner.next_id += 1;
        game.id = GameId(inner.next_id);
        inner.records.insert(
            game.id,
            GameRecord {
                game: game.clone(),
                claim: None,
            },
        );
        Ok(game)
    }

    fn get_game(&self, id: GameId) -> Result<Option<Game>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner.records.get(&id).map(|record| record.game.clone()))
    }

    fn update_game(&self, game: &Game) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let record = inner
            .records
            .get_mut(&game.id)
            .ok_or(RepositoryError::GameNotFound(game.id))?;
        record.game = game.clone();
        Ok(())
    }

    fn find_by_join_code(&self, join_code: &str) -> Result<Option<Game>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner
            .records
            .values()
            .find(|record| record.game.join_code.eq_ignore_ascii_case(join_code))
            .map(|record| record.game.clone()))
    }

    fn claim_timed_out_game_ids(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        reclaim_after: Duration,
        worker_id: &str,
    ) -> Result<Vec<GameId>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let mut ids: Vec<GameId> = inner
            .records
            .iter()
            .filter(|(_, record)| record.is_claimable(now, reclaim_after))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids.truncate(limit);

        for id in &ids {
            if let Some(record) = inner.records.get_mut(id) {
                record.claim = Some(Claim {
                    worker_id: worker_id.to_owned(),
                    claimed_at: now,
                });
            }
        }
        Ok(ids)
    }

    fn release_claim(&self, id: GameId, worker_id: &str) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(record) = inner.records.get_mut(&id) {
            let held = record
                .claim
                .as_ref()
                .is_some_and(|claim| claim.worker_id == worker_id);
            if held {
                record.claim = None;
            }
        }
        Ok(())
    }
}
