//! Per-game serialization of read-modify-write cycles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chimera_core::GameId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async mutex per game id.
///
/// Every service that loads, mutates and stores a game holds the game's guard
/// for the whole cycle, so the submission path and the timeout path can never
/// interleave on the same aggregate. Clones share the registry.
#[derive(Clone, Default)]
pub struct GameLocks {
    inner: Arc<Mutex<HashMap<GameId, Arc<AsyncMutex<()>>>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn acquire(&self, id: GameId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops registry entries nobody holds or waits on.
    pub fn prune(&self) -> usize {
        let mut locks = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
