//! Settings and catalog resolution for the binary.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chimera_content::{ConfigLoader, ContentFactory, ServerSettings};
use chimera_core::Entity;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "data/server.toml";

pub struct LoadedContent {
    pub settings: ServerSettings,
    pub catalog: Vec<Entity>,
}

/// Loads settings from `CHIMERA_CONFIG` and the catalog from
/// `CHIMERA_ENTITIES`, the settings file, or the data directory, in that order.
pub fn load_from_env() -> Result<LoadedContent> {
    let config_path = env::var_os("CHIMERA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let entities_override = env::var_os("CHIMERA_ENTITIES").map(PathBuf::from);
    load(&config_path, entities_override.as_deref())
}

fn load(config_path: &Path, entities_override: Option<&Path>) -> Result<LoadedContent> {
    let settings = if config_path.exists() {
        info!(path = %config_path.display(), "loading settings");
        ConfigLoader::load(config_path)?
    } else {
        debug!(path = %config_path.display(), "settings file absent; using defaults");
        ServerSettings::default()
    };

    let data_dir = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let entities_path = entities_override.or(settings.entities.as_deref());

    let catalog = ContentFactory::new(data_dir)
        .load_entities(entities_path)
        .context("failed to load creature catalog")?;
    Ok(LoadedContent { settings, catalog })
}
