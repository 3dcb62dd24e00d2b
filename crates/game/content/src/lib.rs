//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for the RON/TOML data files a Chimera server
//! reads at boot:
//! - Creature catalog (data-driven via RON)
//! - Server settings: game tunables and coordinator timing (data-driven via TOML)
//!
//! Content is validated once at load time; the runtime treats the catalog as
//! read-only afterwards.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EntityLoader, LoadResult, ServerSettings, TimingSettings,
};
