//! Hybrid name and image generation collaborators.
//!
//! Generation only happens while a match starts; the round resolver never
//! waits on it. [`GenerationService`] wraps the pluggable [`HybridNamer`] and
//! [`HybridImager`] with a content-addressed cache and request deduplication,
//! so concurrent starts that need the same creature combination trigger a
//! single job.
mod dedupe;

use std::sync::Arc;

use async_trait::async_trait;
use chimera_core::derived_name;
use thiserror::Error;
use tracing::debug;

pub use dedupe::{Deduplicator, Origin, cache_key};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator returned an empty result")]
    Empty,
}

/// Produces a display name for a creature combination.
#[async_trait]
pub trait HybridNamer: Send + Sync {
    async fn generate_name(&self, creature_names: &[String]) -> Result<String, GenerationError>;
}

/// Produces (or locates) artwork for a creature combination and returns its URL.
#[async_trait]
pub trait HybridImager: Send + Sync {
    async fn generate_image(&self, creature_names: &[String]) -> Result<String, GenerationError>;
}

/// Namer that fuses creature names without any external service.
#[derive(Clone, Copy, Debug, Default)]
pub struct DerivedNamer;

#[async_trait]
impl HybridNamer for DerivedNamer {
    async fn generate_name(&self, creature_names: &[String]) -> Result<String, GenerationError> {
        if creature_names.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(derived_name(creature_names))
    }
}

/// Imager that points every combination at a static asset path.
#[derive(Clone, Debug)]
pub struct PlaceholderImager {
    base_url: String,
}

impl PlaceholderImager {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for PlaceholderImager {
    fn default() -> Self {
        Self::new("/assets/hybrids")
    }
}

#[async_trait]
impl HybridImager for PlaceholderImager {
    async fn generate_image(&self, creature_names: &[String]) -> Result<String, GenerationError> {
        if creature_names.is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(format!(
            "{}/{}.png",
            self.base_url.trim_end_matches('/'),
            cache_key(creature_names)
        ))
    }
}

/// Where a hybrid name came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameSource {
    /// Produced by the namer during this call.
    Generated,
    /// Taken from the cache or from a job another caller started.
    Cache,
}

/// Cached, deduplicated access to the generation collaborators.
pub struct GenerationService {
    namer: Arc<dyn HybridNamer>,
    imager: Arc<dyn HybridImager>,
    names: Deduplicator<String>,
    images: Deduplicator<String>,
}

impl GenerationService {
    pub fn new(namer: Arc<dyn HybridNamer>, imager: Arc<dyn HybridImager>) -> Self {
        Self {
            namer,
            imager,
            names: Deduplicator::new(),
            images: Deduplicator::new(),
        }
    }

    /// Returns the cached name for `creature_names` or generates one.
    pub async fn generate_or_fetch_name(
        &self,
        creature_names: &[String],
    ) -> Result<(String, NameSource), GenerationError> {
        let key = cache_key(creature_names);
        let (name, origin) = self
            .names
            .run(&key, || async {
                let name = self.namer.generate_name(creature_names).await?;
                let name = name.trim().to_owned();
                if name.is_empty() {
                    return Err(GenerationError::Empty);
                }
                Ok::<_, GenerationError>(name)
            })
            .await?;

        let source = match origin {
            Origin::Generated => NameSource::Generated,
            Origin::Shared => NameSource::Cache,
        };
        debug!(key = %key, name = %name, ?source, "hybrid name resolved");
        Ok((name, source))
    }

    /// Makes sure artwork exists for `creature_names` and returns its URL.
    pub async fn ensure_hybrid_image(
        &self,
        creature_names: &[String],
    ) -> Result<String, GenerationError> {
        let key = cache_key(creature_names);
        let (url, _) = self
            .images
            .run(&key, || self.imager.generate_image(creature_names))
            .await?;
        Ok(url)
    }
}

impl Default for GenerationService {
    fn default() -> Self {
        Self::new(Arc::new(DerivedNamer), Arc::new(PlaceholderImager::default()))
    }
}
