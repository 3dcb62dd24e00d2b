//! Service configuration: game tunables plus coordinator timing.
use std::env;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chimera_content::ServerSettings;
use chimera_core::GameConfig;

/// Configuration shared by the services and the timeout worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub game: GameConfig,
    /// Time each player has to submit a round action.
    pub action_timeout: Duration,
    /// How often the timeout worker sweeps for expired rounds.
    pub poll_interval: Duration,
    /// Maximum games claimed per sweep.
    pub claim_limit: usize,
    /// Age after which another worker's claim counts as abandoned.
    pub reclaim_after: Duration,
    pub worker_id: String,
}

impl ServiceConfig {
    pub fn from_settings(settings: &ServerSettings) -> Self {
        let timing = &settings.timing;
        Self {
            game: settings.game.clone(),
            action_timeout: Duration::from_secs(timing.action_timeout_secs),
            poll_interval: Duration::from_secs(timing.poll_interval_secs),
            claim_limit: timing.claim_limit,
            reclaim_after: Duration::from_secs(timing.reclaim_after_secs),
            worker_id: timing
                .worker_id
                .clone()
                .unwrap_or_else(default_worker_id),
        }
    }

    /// Applies process environment overrides on top of `self`.
    ///
    /// Environment variables:
    /// - `CHIMERA_ACTION_TIMEOUT_SECS` - Round action timeout (default: 60)
    /// - `CHIMERA_POLL_INTERVAL_SECS` - Timeout sweep interval (default: 5)
    /// - `CHIMERA_CLAIM_LIMIT` - Games claimed per sweep (default: 20)
    /// - `CHIMERA_RECLAIM_SECS` - Stale claim age (default: 120)
    /// - `CHIMERA_WORKER_ID` - Claim owner name (default: `<pid>-<nanos>`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = read_env::<u64>("CHIMERA_ACTION_TIMEOUT_SECS") {
            self.action_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("CHIMERA_POLL_INTERVAL_SECS") {
            self.poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(limit) = read_env::<usize>("CHIMERA_CLAIM_LIMIT") {
            self.claim_limit = limit.max(1);
        }
        if let Some(secs) = read_env::<u64>("CHIMERA_RECLAIM_SECS") {
            self.reclaim_after = Duration::from_secs(secs);
        }
        if let Ok(worker_id) = env::var("CHIMERA_WORKER_ID") {
            if !worker_id.trim().is_empty() {
                self.worker_id = worker_id;
            }
        }
        self
    }

    /// Defaults overridden by the environment only.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn with_worker_id(mut self, worker_id: impl Into<String>) -> Self {
        self.worker_id = worker_id.into();
        self
    }

    pub(crate) fn action_timeout_delta(&self) -> chrono::Duration {
        to_chrono(self.action_timeout)
    }

    pub(crate) fn reclaim_after_delta(&self) -> chrono::Duration {
        to_chrono(self.reclaim_after)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_settings(&ServerSettings::default())
    }
}

/// Claim owner name unique enough to tell two processes apart.
pub fn default_worker_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("{}-{}", std::process::id(), nanos)
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(365))
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
