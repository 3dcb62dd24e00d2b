//! Periodic sweep for rounds whose action deadline passed.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use super::TimeoutMetrics;
use crate::locks::GameLocks;
use crate::services::TimeoutCoordinator;

/// `time::interval` rejects a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Background worker that drives [`TimeoutCoordinator::sweep`] on a fixed
/// interval, independent of request traffic.
pub struct TimeoutWorker {
    coordinator: TimeoutCoordinator,
    locks: GameLocks,
    poll_interval: Duration,
    metrics: Arc<TimeoutMetrics>,
}

impl TimeoutWorker {
    pub fn new(
        coordinator: TimeoutCoordinator,
        locks: GameLocks,
        poll_interval: Duration,
        metrics: Arc<TimeoutMetrics>,
    ) -> Self {
        Self {
            coordinator,
            locks,
            poll_interval,
            metrics,
        }
    }

    /// Runs until the task is aborted.
    pub async fn run(self) {
        info!(
            "TimeoutWorker started (worker: {}, interval: {:?})",
            self.coordinator.worker_id(),
            self.poll_interval
        );

        let mut ticker = time::interval(self.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.coordinator.sweep(Utc::now()).await {
                Ok(report) => {
                    self.metrics.record_sweep(&report);
                    if !report.claimed.is_empty() {
                        debug!(
                            "Timeout sweep: claimed {}, handled {}, failed {}",
                            report.claimed.len(),
                            report.handled,
                            report.failed
                        );
                    }
                }
                Err(e) => {
                    self.metrics.record_failed_sweep();
                    error!("Timeout sweep failed: {}", e);
                }
            }

            let pruned = self.locks.prune();
            if pruned > 0 {
                debug!("Pruned {} idle game locks", pruned);
            }
        }
    }
}
