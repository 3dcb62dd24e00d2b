//! Server settings loader.

use std::path::{Path, PathBuf};

use chimera_core::GameConfig;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Contents of `server.toml`.
///
/// ```toml
/// entities = "data/entities.ron"
///
/// [game]
/// starting_vigor = 3
///
/// [timing]
/// action_timeout_secs = 60
/// poll_interval_secs = 5
/// claim_limit = 20
/// reclaim_after_secs = 120
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub game: GameConfig,
    pub timing: TimingSettings,
    /// Creature catalog path; relative paths resolve against the working directory.
    pub entities: Option<PathBuf>,
}

/// Coordinator timing as written in the settings file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub action_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub claim_limit: usize,
    pub reclaim_after_secs: u64,
    pub worker_id: Option<String>,
}

impl TimingSettings {
    pub const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
    pub const DEFAULT_CLAIM_LIMIT: usize = 20;
    pub const DEFAULT_RECLAIM_AFTER_SECS: u64 = 120;
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            action_timeout_secs: Self::DEFAULT_ACTION_TIMEOUT_SECS,
            poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
            claim_limit: Self::DEFAULT_CLAIM_LIMIT,
            reclaim_after_secs: Self::DEFAULT_RECLAIM_AFTER_SECS,
            worker_id: None,
        }
    }
}

/// Loader for server settings from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<ServerSettings> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ServerSettings> {
        let settings: ServerSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if settings.timing.action_timeout_secs == 0 {
            anyhow::bail!("timing.action_timeout_secs must be positive");
        }
        if settings.timing.poll_interval_secs == 0 {
            anyhow::bail!("timing.poll_interval_secs must be positive");
        }
        if settings.game.starting_vigor <= 0 {
            anyhow::bail!("game.starting_vigor must be positive");
        }
        Ok(settings)
    }
}
