//! Error types for the model layer

use crate::grid::BoxPlacement;

/// Model validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Coordinates fall outside the 6 × 5 grid or name page 0
    #[error("invalid placement: page {}, row {}, column {}", .0.page, .0.row, .0.column)]
    InvalidPlacement(BoxPlacement),

    /// Sequence numbers are 1-based
    #[error("invalid sequence number: {0}")]
    InvalidSequence(u32),

    /// Collection names must contain non-whitespace text
    #[error("collection name is required")]
    InvalidCollectionName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_error_display() {
        let err = ModelError::InvalidPlacement(BoxPlacement {
            page: 1,
            row: 6,
            column: 2,
        });
        assert_eq!(err.to_string(), "invalid placement: page 1, row 6, column 2");
    }

    #[test]
    fn sequence_error_display() {
        assert!(ModelError::InvalidSequence(0)
            .to_string()
            .contains("invalid sequence"));
    }
}
