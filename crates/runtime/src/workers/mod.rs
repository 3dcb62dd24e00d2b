//! Worker tasks that back the runtime orchestration.
//!
//! The timeout worker resolves or finishes rounds whose players went silent.

mod metrics;
mod timeout;

pub use metrics::{TimeoutMetrics, TimeoutMetricsSnapshot};
pub use timeout::TimeoutWorker;
