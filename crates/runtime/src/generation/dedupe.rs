//! Request deduplication for generation jobs.
//!
//! The first caller for a key runs the job; callers arriving while it is in
//! flight wait on the same cell and receive its result. Successful results
//! stay cached for the lifetime of the [`Deduplicator`]. A failed job leaves
//! the cell empty so the next caller runs the job again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

/// Content-addressed cache key for a set of creature names.
///
/// Names are lower-cased, spaces become `_`, the list is sorted and joined
/// with `_`, so `["Wolf", "Brown Bear"]` and `["brown bear", "wolf"]` share
/// the key `brown_bear_wolf`.
pub fn cache_key<S: AsRef<str>>(names: &[S]) -> String {
    let mut parts: Vec<String> = names
        .iter()
        .map(|name| name.as_ref().trim().to_lowercase().replace(' ', "_"))
        .collect();
    parts.sort();
    parts.join("_")
}

/// Whether a result was produced by this call or taken from the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// This call ran the job.
    Generated,
    /// Another call ran (or is running) the job.
    Shared,
}

pub struct Deduplicator<T> {
    cells: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T: Clone> Deduplicator<T> {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, running `job` at most once per key
    /// at any moment.
    pub async fn run<E, F, Fut>(&self, key: &str, job: F) -> Result<(T, Origin), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(key.to_owned()).or_default())
        };

        let mut ran = false;
        let value = cell
            .get_or_try_init(|| {
                ran = true;
                job()
            })
            .await?;
        let origin = if ran {
            Origin::Generated
        } else {
            Origin::Shared
        };
        Ok((value.clone(), origin))
    }

    /// Cached value for `key`, if a job already completed.
    pub fn cached(&self, key: &str) -> Option<T> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.get(key).and_then(|cell| cell.get().cloned())
    }
}

impl<T: Clone> Default for Deduplicator<T> {
    fn default() -> Self {
        Self::new()
    }
}
