//! Content loaders for reading game data from files.
//!
//! Each loader exposes `load(path)` for files and `parse(str)` for in-memory
//! sources; both run the same validation.

pub mod config;
pub mod entities;
pub mod factory;

pub use config::{ConfigLoader, ServerSettings, TimingSettings};
pub use entities::EntityLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
