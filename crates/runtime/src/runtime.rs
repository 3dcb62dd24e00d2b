//! High-level runtime orchestrator.
//!
//! The runtime wires repositories, locks and services together, owns the
//! timeout worker, and exposes a builder-based API for embedding.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{Result, RuntimeHandle, ServiceError};
use crate::config::ServiceConfig;
use crate::generation::{
    DerivedNamer, GenerationService, HybridImager, HybridNamer, PlaceholderImager,
};
use crate::locks::GameLocks;
use crate::repository::Repositories;
use crate::services::{HybridService, MatchService, SubmissionCoordinator, TimeoutCoordinator};
use crate::workers::{TimeoutMetrics, TimeoutWorker};

/// Main runtime that hosts the game services
///
/// Design: Runtime owns the timeout worker; [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    metrics: Arc<TimeoutMetrics>,
    timeout_worker_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn metrics(&self) -> Arc<TimeoutMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Stop the timeout worker
    pub async fn shutdown(self) -> Result<()> {
        if let Some(worker) = self.timeout_worker_handle {
            worker.abort();
            match worker.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(ServiceError::WorkerJoin(e)),
            }
        }
        info!("Runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: ServiceConfig,
    repos: Option<Repositories>,
    namer: Option<Arc<dyn HybridNamer>>,
    imager: Option<Arc<dyn HybridImager>>,
    rng: Option<StdRng>,
    enable_timeout_worker: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            repos: None,
            namer: None,
            imager: None,
            rng: None,
            enable_timeout_worker: true,
        }
    }

    /// Override service configuration
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Storage to use; defaults to empty in-memory stores
    pub fn repositories(mut self, repos: Repositories) -> Self {
        self.repos = Some(repos);
        self
    }

    pub fn namer(mut self, namer: Arc<dyn HybridNamer>) -> Self {
        self.namer = Some(namer);
        self
    }

    pub fn imager(mut self, imager: Arc<dyn HybridImager>) -> Self {
        self.imager = Some(imager);
        self
    }

    /// Seed round randomness for reproducible matches
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    /// Spawn the periodic timeout worker (default: true)
    pub fn enable_timeout_worker(mut self, enable: bool) -> Self {
        self.enable_timeout_worker = enable;
        self
    }

    /// Wire the services and spawn workers. Must run inside a Tokio runtime.
    pub fn build(self) -> Runtime {
        let config = Arc::new(self.config);
        let repos = self
            .repos
            .unwrap_or_else(|| Repositories::in_memory(Vec::new()));
        let locks = GameLocks::new();

        let generation = GenerationService::new(
            self.namer.unwrap_or_else(|| Arc::new(DerivedNamer)),
            self.imager
                .unwrap_or_else(|| Arc::new(PlaceholderImager::default())),
        );

        let mut submissions = SubmissionCoordinator::new(repos.clone(), locks.clone(), &config);
        if let Some(rng) = self.rng {
            submissions = submissions.with_rng(rng);
        }
        let timeouts = TimeoutCoordinator::new(
            repos.clone(),
            locks.clone(),
            submissions.clone(),
            Arc::clone(&config),
        );
        let hybrids = HybridService::new(repos.clone(), locks.clone(), Arc::clone(&config));
        let matches = MatchService::new(
            repos.clone(),
            locks.clone(),
            Arc::new(generation),
            timeouts.clone(),
            Arc::clone(&config),
        );

        let metrics = Arc::new(TimeoutMetrics::new());
        let timeout_worker_handle = if self.enable_timeout_worker {
            let worker = TimeoutWorker::new(
                timeouts.clone(),
                locks,
                config.poll_interval,
                Arc::clone(&metrics),
            );
            Some(tokio::spawn(async move {
                worker.run().await;
            }))
        } else {
            None
        };

        Runtime {
            handle: RuntimeHandle::new(repos, submissions, timeouts, hybrids, matches),
            metrics,
            timeout_worker_handle,
        }
    }
}
