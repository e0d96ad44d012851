//! JSON catalog files

use crate::error::StoreError;
use ldex_model::{Entry, RegionalDex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk catalog export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Every entry, any order
    pub entries: Vec<Entry>,
    /// Regional dex directory
    #[serde(default)]
    pub regional_dexes: Vec<RegionalDex>,
}

impl CatalogFile {
    /// Parse a catalog from JSON text
    ///
    /// # Errors
    /// Returns `StoreError::Decode` for malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a catalog file
    ///
    /// # Errors
    /// Returns `StoreError::Io` when the file cannot be read and
    /// `StoreError::Decode` when it is not a catalog.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.display(),
            entries = catalog.entries.len(),
            dexes = catalog.regional_dexes.len(),
            "read catalog file"
        );
        Ok(catalog)
    }
}
