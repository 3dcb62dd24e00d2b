//! Chimera server binary.
//!
//! Composition root that assembles:
//! 1. Settings and the creature catalog via `chimera-content`
//! 2. The runtime (services, in-memory storage, timeout worker)
//! 3. A self-play duel between two bots that drives the whole stack
//!
//! # Environment
//!
//! - `CHIMERA_CONFIG` - Settings file (default: `data/server.toml`)
//! - `CHIMERA_ENTITIES` - Creature catalog, overriding the settings file
//! - `CHIMERA_DUEL_SEED` - Fixes the bots' and resolver's randomness
//! - `RUST_LOG` - Log filter (default: `info`)
//!
//! The `CHIMERA_*` timing overrides are documented on `ServiceConfig`.

mod content;
mod duel;

use anyhow::Result;
use chimera_runtime::{Repositories, Runtime, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    setup_logging();

    // 1. Settings and catalog
    let loaded = content::load_from_env()?;
    let config = ServiceConfig::from_settings(&loaded.settings).with_env_overrides();
    info!(
        creatures = loaded.catalog.len(),
        worker_id = %config.worker_id,
        action_timeout = ?config.action_timeout,
        "content loaded"
    );

    // 2. Runtime
    let seed = duel::seed_from_env();
    let mut builder = Runtime::builder()
        .config(config.clone())
        .repositories(Repositories::in_memory(loaded.catalog));
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let runtime = builder.build();
    info!("Runtime built successfully");

    // 3. Self-play
    let result = duel::DuelDriver::new(runtime.handle(), &config, seed)
        .run()
        .await;

    runtime.shutdown().await?;
    let game = result?;
    info!(
        game_id = %game.id,
        rounds = game.round_count,
        winner = game.winner.as_deref().unwrap_or("none"),
        "duel finished: {}",
        game.message
    );
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
