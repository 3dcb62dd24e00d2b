//! Timeout sweep metrics and statistics.
//!
//! Tracks how many sweeps ran and what they claimed, handled, or failed.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::services::SweepReport;

/// Sweep metrics tracked by TimeoutWorker.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct TimeoutMetrics {
    /// Completed sweeps, including ones that claimed nothing
    sweeps: AtomicU64,

    /// Sweeps that failed before claiming (storage errors)
    failed_sweeps: AtomicU64,

    /// Games claimed across all sweeps
    claimed: AtomicU64,

    /// Claimed games handled and released
    handled: AtomicU64,

    /// Claimed games whose handling failed
    failed: AtomicU64,
}

impl TimeoutMetrics {
    /// Creates a new empty metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sweep(&self, report: &SweepReport) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.claimed
            .fetch_add(report.claimed.len() as u64, Ordering::Relaxed);
        self.handled
            .fetch_add(report.handled as u64, Ordering::Relaxed);
        self.failed.fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    pub fn record_failed_sweep(&self) {
        self.failed_sweeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> TimeoutMetricsSnapshot {
        TimeoutMetricsSnapshot {
            sweeps: self.sweeps.load(Ordering::Relaxed),
            failed_sweeps: self.failed_sweeps.load(Ordering::Relaxed),
            claimed: self.claimed.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of timeout metrics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutMetricsSnapshot {
    pub sweeps: u64,
    pub failed_sweeps: u64,
    pub claimed: u64,
    pub handled: u64,
    pub failed: u64,
}
