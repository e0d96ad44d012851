//! Error types for store access

use ldex_model::{BoxPlacement, CollectionId, EntryId, ModelError, UserId, VariantMode};

/// Store access errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend could not be reached or failed mid-request
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Two entries claim the same precomputed slot
    #[error("placement conflict in {mode:?} view at {placement}: {first} and {second}")]
    PlacementConflict {
        /// Table the conflict is in
        mode: VariantMode,
        /// Contested slot
        placement: BoxPlacement,
        /// Entry loaded first
        first: EntryId,
        /// Entry that collided with it
        second: EntryId,
    },

    /// A precomputed slot lies off the grid
    #[error("entry {entry} has an invalid placement: {source}")]
    InvalidPlacement {
        /// Offending entry
        entry: EntryId,
        /// Underlying validation error
        source: ModelError,
    },

    /// Catalog lists the same id twice
    #[error("duplicate entry id {0}")]
    DuplicateEntry(EntryId),

    /// Every user keeps at least one collection
    #[error("cannot delete the last collection of user {0}")]
    LastCollection(UserId),

    /// No such collection for this user
    #[error("collection not found: {0}")]
    CollectionNotFound(CollectionId),

    /// Collection id already taken
    #[error("collection already exists: {0}")]
    DuplicateCollection(CollectionId),

    /// Malformed input file
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// File access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io(_))
    }

    /// Whether the error reflects bad catalog data rather than a failed request
    #[inline]
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::PlacementConflict { .. } | Self::InvalidPlacement { .. } | Self::DuplicateEntry(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_retryable() {
        assert!(StoreError::Unavailable("timeout".into()).is_retryable());
        assert!(!StoreError::DuplicateEntry(EntryId(1)).is_retryable());
    }

    #[test]
    fn conflict_display_names_both_entries() {
        let err = StoreError::PlacementConflict {
            mode: VariantMode::DefaultOnly,
            placement: BoxPlacement::new(1, 1, 1).unwrap(),
            first: EntryId(1),
            second: EntryId(2),
        };
        let text = err.to_string();
        assert!(text.contains("#1"));
        assert!(text.contains("#2"));
        assert!(err.is_data_integrity());
    }
}
