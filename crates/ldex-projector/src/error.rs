//! Error types for projection
//!
//! Data-integrity problems are not errors here: they are collected as
//! [`crate::IntegrityIssue`]s and the affected slot stays empty.

use ldex_model::{CollectionId, EntryId};
use ldex_store::StoreError;

/// Main projection error type
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// Store read or write failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Collection missing or owned by someone else
    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),

    /// Pages and page sizes are 1-based
    #[error("invalid page request: page {page}, size {page_size}")]
    InvalidPageRequest {
        /// Requested page
        page: u32,
        /// Requested page size
        page_size: u32,
    },

    /// Box number beyond the collection's grid
    #[error("box {box_number} does not exist ({total_boxes} boxes)")]
    UnknownBox {
        /// Requested box
        box_number: u32,
        /// Boxes in the grid
        total_boxes: u32,
    },

    /// Write targets an entry outside the collection's universe
    #[error("entry {entry} is not part of collection {collection}")]
    EntryNotInCollection {
        /// Targeted entry
        entry: EntryId,
        /// Collection written to
        collection: CollectionId,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProjectionError {
    /// Whether the caller asked for something that does not exist or is malformed
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::CollectionNotFound(_)
                | Self::InvalidPageRequest { .. }
                | Self::UnknownBox { .. }
                | Self::EntryNotInCollection { .. }
        )
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }
}
