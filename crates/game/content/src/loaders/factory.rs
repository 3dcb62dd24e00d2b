//! Content factory for loading everything a server needs from one directory.

use std::path::{Path, PathBuf};

use chimera_core::Entity;

use crate::loaders::{ConfigLoader, EntityLoader, LoadResult, ServerSettings};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── server.toml     (optional)
/// └── entities.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const SETTINGS_FILE: &'static str = "server.toml";
    pub const ENTITIES_FILE: &'static str = "entities.ron";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load `server.toml`, falling back to defaults when the file is absent.
    pub fn load_settings(&self) -> LoadResult<ServerSettings> {
        let path = self.data_dir.join(Self::SETTINGS_FILE);
        if !path.exists() {
            return Ok(ServerSettings::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the creature catalog from `override_path` or `entities.ron`.
    pub fn load_entities(&self, override_path: Option<&Path>) -> LoadResult<Vec<Entity>> {
        let path = override_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.data_dir.join(Self::ENTITIES_FILE));
        EntityLoader::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_settings().expect("defaults"), ServerSettings::default());
        assert!(factory.load_entities(None).is_err());
    }

    #[test]
    fn loads_both_files_from_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(ContentFactory::SETTINGS_FILE),
            "[game]\nstarting_vigor = 4\n",
        )
        .expect("write settings");
        std::fs::write(
            dir.path().join(ContentFactory::ENTITIES_FILE),
            r#"[(name: "Wolf"), (name: "Bear")]"#,
        )
        .expect("write catalog");

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_settings().expect("settings").game.starting_vigor, 4);
        assert_eq!(factory.load_entities(None).expect("catalog").len(), 2);
    }
}
