//! Projector configuration

use crate::error::ProjectionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning knobs for projection and bulk writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Max entry ids per ledger read
    pub id_batch_size: usize,
    /// Issue ledger batches concurrently instead of one after another
    pub concurrent_batches: bool,
    /// Page size used when the caller gives none
    pub default_page_size: u32,
    /// Larger page sizes are clamped to this
    pub max_page_size: u32,
    /// Max in-flight upserts during a bulk change
    pub bulk_concurrency: usize,
}

impl ProjectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With ledger batch size (0 is treated as 1)
    #[inline]
    #[must_use]
    pub fn with_id_batch_size(mut self, size: usize) -> Self {
        self.id_batch_size = size.max(1);
        self
    }

    /// With sequential ledger batches
    #[inline]
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.concurrent_batches = false;
        self
    }

    /// With page size bounds
    #[inline]
    #[must_use]
    pub fn with_page_sizes(mut self, default: u32, max: u32) -> Self {
        self.max_page_size = max.max(1);
        self.default_page_size = default.clamp(1, self.max_page_size);
        self
    }

    /// With bulk write concurrency (0 is treated as 1)
    #[inline]
    #[must_use]
    pub fn with_bulk_concurrency(mut self, concurrency: usize) -> Self {
        self.bulk_concurrency = concurrency.max(1);
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns `ProjectionError::Config` for malformed TOML or zero limits.
    pub fn from_toml_str(text: &str) -> Result<Self, ProjectionError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ProjectionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// Returns `ProjectionError::Config` when the file is unreadable or invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProjectionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Page size actually served for a requested size
    #[inline]
    #[must_use]
    pub fn effective_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }

    fn validate(&self) -> Result<(), ProjectionError> {
        if self.id_batch_size == 0 {
            return Err(ProjectionError::Config("id_batch_size must be positive".into()));
        }
        if self.bulk_concurrency == 0 {
            return Err(ProjectionError::Config("bulk_concurrency must be positive".into()));
        }
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(ProjectionError::Config("page sizes must be positive".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ProjectionError::Config(
                "default_page_size exceeds max_page_size".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            id_batch_size: 1000,
            concurrent_batches: true,
            default_page_size: 20,
            max_page_size: 500,
            bulk_concurrency: 16,
        }
    }
}
