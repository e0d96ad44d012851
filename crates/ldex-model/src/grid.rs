//! Box grid geometry
//!
//! A box holds [`BOX_CAPACITY`] slots laid out as [`BOX_ROWS`] rows of
//! [`BOX_COLUMNS`] columns. A 1-based sequence number maps to exactly one
//! `{page, row, column}` triple and back:
//!
//! ```text
//! page   = ceil(sequence / 30)
//! row    = ceil(((sequence mod 30) or 30) / 6)
//! column = ((sequence - 1) mod 6) + 1
//! ```

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Columns per box row
pub const BOX_COLUMNS: u32 = 6;

/// Rows per box
pub const BOX_ROWS: u32 = 5;

/// Slots per box
pub const BOX_CAPACITY: u32 = BOX_COLUMNS * BOX_ROWS;

/// A slot on the box grid (all fields 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxPlacement {
    /// Box number
    pub page: u32,
    /// Row within the box, `1..=5`
    pub row: u32,
    /// Column within the row, `1..=6`
    pub column: u32,
}

impl BoxPlacement {
    /// Create a placement, checking the coordinates fit the grid
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPlacement` for page 0 or a row/column
    /// outside the box.
    pub fn new(page: u32, row: u32, column: u32) -> Result<Self, ModelError> {
        let placement = Self { page, row, column };
        placement.validate()?;
        Ok(placement)
    }

    /// Derive the placement of a 1-based sequence number
    ///
    /// # Errors
    /// Returns `ModelError::InvalidSequence` for sequence 0.
    pub fn from_sequence(sequence: u32) -> Result<Self, ModelError> {
        if sequence == 0 {
            return Err(ModelError::InvalidSequence(sequence));
        }

        let within_box = match sequence % BOX_CAPACITY {
            0 => BOX_CAPACITY,
            rest => rest,
        };

        Ok(Self {
            page: sequence.div_ceil(BOX_CAPACITY),
            row: within_box.div_ceil(BOX_COLUMNS),
            column: ((sequence - 1) % BOX_COLUMNS) + 1,
        })
    }

    /// Placement of a zero-based linear slot index
    #[must_use]
    pub fn from_slot_index(index: usize) -> Self {
        let capacity = BOX_CAPACITY as usize;
        let columns = BOX_COLUMNS as usize;
        let within_box = index % capacity;

        // Slot indices beyond u32 pages are not addressable in practice.
        #[allow(clippy::cast_possible_truncation)]
        Self {
            page: (index / capacity) as u32 + 1,
            row: (within_box / columns) as u32 + 1,
            column: (within_box % columns) as u32 + 1,
        }
    }

    /// Check the coordinates fit the grid
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPlacement` when they do not.
    pub fn validate(&self) -> Result<(), ModelError> {
        let fits = self.page >= 1
            && (1..=BOX_ROWS).contains(&self.row)
            && (1..=BOX_COLUMNS).contains(&self.column);

        if fits {
            Ok(())
        } else {
            Err(ModelError::InvalidPlacement(*self))
        }
    }

    /// Zero-based linear slot index: `(page-1)*30 + (row-1)*6 + (column-1)`
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPlacement` for coordinates off the grid.
    pub fn slot_index(&self) -> Result<usize, ModelError> {
        self.validate()?;
        let page = (self.page - 1) as usize;
        let row = (self.row - 1) as usize;
        let column = (self.column - 1) as usize;
        Ok(page * BOX_CAPACITY as usize + row * BOX_COLUMNS as usize + column)
    }

    /// 1-based sequence number this placement corresponds to
    ///
    /// # Errors
    /// Returns `ModelError::InvalidPlacement` for coordinates off the grid.
    pub fn sequence(&self) -> Result<u32, ModelError> {
        self.validate()?;
        Ok((self.page - 1) * BOX_CAPACITY + (self.row - 1) * BOX_COLUMNS + self.column)
    }
}

impl std::fmt::Display for BoxPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "box {} row {} col {}", self.page, self.row, self.column)
    }
}

/// Number of whole boxes needed for `count` entries
#[inline]
#[must_use]
pub fn total_pages(count: usize) -> u32 {
    let pages = count.div_ceil(BOX_CAPACITY as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Number of slots in a grid of `pages` boxes
#[inline]
#[must_use]
pub fn grid_len(pages: u32) -> usize {
    pages as usize * BOX_CAPACITY as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn first_box_fills_row_major() {
        let first = BoxPlacement::from_sequence(1).unwrap();
        assert_eq!(first, BoxPlacement { page: 1, row: 1, column: 1 });

        let sixth = BoxPlacement::from_sequence(6).unwrap();
        assert_eq!(sixth, BoxPlacement { page: 1, row: 1, column: 6 });

        let seventh = BoxPlacement::from_sequence(7).unwrap();
        assert_eq!(seventh, BoxPlacement { page: 1, row: 2, column: 1 });

        let last = BoxPlacement::from_sequence(30).unwrap();
        assert_eq!(last, BoxPlacement { page: 1, row: 5, column: 6 });
    }

    #[test]
    fn thirty_first_starts_second_box() {
        let placement = BoxPlacement::from_sequence(31).unwrap();
        assert_eq!(placement, BoxPlacement { page: 2, row: 1, column: 1 });
    }

    #[test]
    fn sequence_zero_is_rejected() {
        assert_eq!(
            BoxPlacement::from_sequence(0),
            Err(ModelError::InvalidSequence(0))
        );
    }

    #[test]
    fn off_grid_coordinates_are_rejected() {
        assert!(BoxPlacement::new(0, 1, 1).is_err());
        assert!(BoxPlacement::new(1, 6, 1).is_err());
        assert!(BoxPlacement::new(1, 1, 7).is_err());
        assert!(BoxPlacement::new(1, 0, 1).is_err());
        assert!(BoxPlacement::new(3, 5, 6).is_ok());

        let corrupt = BoxPlacement { page: 1, row: 9, column: 1 };
        assert!(corrupt.slot_index().is_err());
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(30), 1);
        assert_eq!(total_pages(31), 2);
        assert_eq!(total_pages(65), 3);
        assert_eq!(grid_len(3), 90);
    }

    #[test]
    fn whole_box_has_thirty_distinct_cells() {
        let cells: HashSet<(u32, u32)> = (1..=30)
            .map(|s| BoxPlacement::from_sequence(s).unwrap())
            .map(|p| (p.row, p.column))
            .collect();
        assert_eq!(cells.len(), 30);
    }

    proptest! {
        #[test]
        fn prop_sequence_round_trips(sequence in 1..100_000u32) {
            let placement = BoxPlacement::from_sequence(sequence).unwrap();
            prop_assert!(placement.validate().is_ok());
            prop_assert_eq!(placement.sequence().unwrap(), sequence);
            prop_assert_eq!(placement.slot_index().unwrap(), (sequence - 1) as usize);
            prop_assert_eq!(BoxPlacement::from_slot_index((sequence - 1) as usize), placement);
        }

        #[test]
        fn prop_page_is_monotonic(sequence in 1..100_000u32) {
            let here = BoxPlacement::from_sequence(sequence).unwrap();
            let next = BoxPlacement::from_sequence(sequence + 1).unwrap();
            prop_assert!(next.page >= here.page);
            prop_assert!(next > here);
        }
    }
}
