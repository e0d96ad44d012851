//! Load-time checks of precomputed placement tables
//!
//! Precomputed coordinates act as an override table. A catalog is only
//! accepted when every override is on the grid and no two entries share a
//! slot within the same table.

use crate::error::StoreError;
use ldex_model::{BoxPlacement, Entry, EntryId, ModelError, VariantMode};
use std::collections::{HashMap, HashSet};

/// Two entries claiming one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementConflict {
    /// Table the conflict is in
    pub mode: VariantMode,
    /// Contested slot
    pub placement: BoxPlacement,
    /// Entry seen first in catalog order
    pub first: EntryId,
    /// Entry that collided with it
    pub second: EntryId,
}

impl From<PlacementConflict> for StoreError {
    fn from(conflict: PlacementConflict) -> Self {
        Self::PlacementConflict {
            mode: conflict.mode,
            placement: conflict.placement,
            first: conflict.first,
            second: conflict.second,
        }
    }
}

/// Every off-grid override, in catalog order
#[must_use]
pub fn invalid_placements(entries: &[Entry]) -> Vec<(EntryId, ModelError)> {
    let mut invalid = Vec::new();
    for entry in entries {
        for mode in [VariantMode::DefaultOnly, VariantMode::IncludeVariants] {
            if let Some(placement) = entry.precomputed_placement(mode) {
                if let Err(err) = placement.validate() {
                    invalid.push((entry.id, err));
                }
            }
        }
    }
    invalid
}

/// Every shared slot, in catalog order
#[must_use]
pub fn placement_conflicts(entries: &[Entry]) -> Vec<PlacementConflict> {
    let mut conflicts = Vec::new();

    for mode in [VariantMode::DefaultOnly, VariantMode::IncludeVariants] {
        let mut claimed: HashMap<BoxPlacement, EntryId> = HashMap::new();
        for entry in entries {
            let Some(placement) = entry.precomputed_placement(mode) else {
                continue;
            };
            match claimed.get(&placement) {
                Some(&first) => conflicts.push(PlacementConflict {
                    mode,
                    placement,
                    first,
                    second: entry.id,
                }),
                None => {
                    claimed.insert(placement, entry.id);
                }
            }
        }
    }

    conflicts
}

/// Reject a catalog with duplicate ids, off-grid or overlapping overrides
///
/// # Errors
/// Returns the first problem found: `DuplicateEntry`, `InvalidPlacement`
/// or `PlacementConflict`.
pub fn validate_placements(entries: &[Entry]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(StoreError::DuplicateEntry(entry.id));
        }
    }

    if let Some((entry, source)) = invalid_placements(entries).into_iter().next() {
        return Err(StoreError::InvalidPlacement { entry, source });
    }

    if let Some(conflict) = placement_conflicts(entries).into_iter().next() {
        return Err(conflict.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(page: u32, row: u32, column: u32) -> BoxPlacement {
        BoxPlacement { page, row, column }
    }

    #[test]
    fn accepts_distinct_slots() {
        let entries = vec![
            Entry::new(1, 1, "Bulbasaur").with_placement(VariantMode::DefaultOnly, at(1, 1, 1)),
            Entry::new(2, 2, "Ivysaur").with_placement(VariantMode::DefaultOnly, at(1, 1, 2)),
            // Same slot, other table
            Entry::new(3, 2, "Ivysaur")
                .with_variant("Shadow")
                .with_placement(VariantMode::IncludeVariants, at(1, 1, 2)),
        ];
        assert!(validate_placements(&entries).is_ok());
    }

    #[test]
    fn reports_shared_slot() {
        let entries = vec![
            Entry::new(1, 1, "Bulbasaur").with_placement(VariantMode::DefaultOnly, at(1, 1, 1)),
            Entry::new(2, 2, "Ivysaur").with_placement(VariantMode::DefaultOnly, at(1, 1, 1)),
        ];

        let conflicts = placement_conflicts(&entries);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first, EntryId(1));
        assert_eq!(conflicts[0].second, EntryId(2));

        let err = validate_placements(&entries).unwrap_err();
        assert!(matches!(err, StoreError::PlacementConflict { .. }));
    }

    #[test]
    fn rejects_off_grid_override() {
        let entries =
            vec![Entry::new(1, 1, "Bulbasaur").with_placement(VariantMode::DefaultOnly, at(1, 6, 1))];
        let err = validate_placements(&entries).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPlacement { entry: EntryId(1), .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let entries = vec![Entry::new(7, 7, "Squirtle"), Entry::new(7, 8, "Wartortle")];
        assert!(matches!(
            validate_placements(&entries),
            Err(StoreError::DuplicateEntry(EntryId(7)))
        ));
    }
}
