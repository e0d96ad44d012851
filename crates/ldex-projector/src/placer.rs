//! Grid placement
//!
//! Maps each resolved entry to a `{page, row, column}` slot and materializes
//! a null-padded grid of `total_pages * 30` slots. The grid holds at least
//! `ceil(count / 30)` boxes and always reaches the box of the highest
//! sequence, so gaps in a regional numbering leave empty slots rather than
//! dropping entries.
//!
//! Precomputed slots win over derived ones. Anything that cannot be placed
//! (off-grid, beyond the last box, already occupied) is reported and left
//! out; the first entry in resolution order keeps a contested slot.

use crate::report::{IntegrityIssue, ProjectionReport};
use crate::resolver::{Resolution, SequencedEntry};
use ldex_model::{grid_len, total_pages, BoxPlacement, Entry, VariantMode};
use serde::Serialize;

/// Sequences past this box do not grow the grid; they are reported instead
const MAX_STRETCH_PAGES: u32 = 1_000;

/// Entry with its final slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedEntry {
    /// Catalog entry
    pub entry: Entry,
    /// Position in the universe's ordering
    pub sequence: u32,
    /// Final slot
    pub placement: BoxPlacement,
    /// Slot came from the precomputed table
    pub precomputed: bool,
}

/// Materialized grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// `total_pages * 30` slots in page, row, column order
    pub slots: Vec<Option<PlacedEntry>>,
    /// Number of boxes
    pub total_pages: u32,
}

impl Layout {
    /// Placed entries in slot order
    pub fn placed(&self) -> impl Iterator<Item = &PlacedEntry> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.placed().count()
    }
}

/// Place a resolution on the grid
///
/// `mode` selects the precomputed table to honor; `None` derives every slot
/// from its sequence.
pub fn place(
    resolution: Resolution,
    mode: Option<VariantMode>,
    report: &mut ProjectionReport,
) -> Layout {
    // Regional numbering can skip; the grid must reach the highest number
    let highest = resolution
        .entries
        .iter()
        .map(|s| total_pages(s.sequence as usize))
        .filter(|&page| page <= MAX_STRETCH_PAGES)
        .max()
        .unwrap_or(0);
    let pages = total_pages(resolution.len()).max(highest);
    let mut slots: Vec<Option<PlacedEntry>> = vec![None; grid_len(pages)];

    let table_in_use = mode.is_some_and(|mode| {
        resolution
            .entries
            .iter()
            .any(|s| s.entry.precomputed_placement(mode).is_some())
    });

    for SequencedEntry { entry, sequence } in resolution.entries {
        let stored = mode.and_then(|mode| entry.precomputed_placement(mode));

        let (placement, precomputed) = match stored {
            Some(placement) => {
                if placement.validate().is_err() {
                    report.record(IntegrityIssue::InvalidPlacement {
                        entry: entry.id,
                        placement,
                    });
                    continue;
                }
                (placement, true)
            }
            None => match BoxPlacement::from_sequence(sequence) {
                Ok(derived) => {
                    if table_in_use {
                        report.record(IntegrityIssue::MissingPlacement {
                            entry: entry.id,
                            derived,
                        });
                    }
                    (derived, false)
                }
                Err(_) => {
                    report.record(IntegrityIssue::InvalidSequence {
                        entry: entry.id,
                        sequence,
                    });
                    continue;
                }
            },
        };

        let Some(slot) = placement
            .slot_index()
            .ok()
            .and_then(|index| slots.get_mut(index))
        else {
            report.record(IntegrityIssue::OutOfRange {
                entry: entry.id,
                placement,
                total_pages: pages,
            });
            continue;
        };

        if let Some(occupant) = slot {
            report.record(IntegrityIssue::Collision {
                entry: entry.id,
                placement,
                occupant: occupant.entry.id,
            });
            continue;
        }

        *slot = Some(PlacedEntry {
            entry,
            sequence,
            placement,
            precomputed,
        });
    }

    let layout = Layout {
        slots,
        total_pages: pages,
    };
    tracing::debug!(
        total_pages = pages,
        placed = layout.occupied(),
        "grid placed"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use ldex_model::{Universe, BOX_CAPACITY};
    use proptest::prelude::*;

    fn national(n: u32) -> Vec<Entry> {
        (1..=n).map(|i| Entry::new(i, i, format!("Species {i}"))).collect()
    }

    fn layout_of(universe: &Universe, entries: Vec<Entry>) -> (Layout, ProjectionReport) {
        let mut report = ProjectionReport::default();
        let resolution = resolve(universe, entries, &mut report);
        let layout = place(resolution, universe.placement_mode(), &mut report);
        (layout, report)
    }

    #[test]
    fn thirty_entries_fill_one_box() {
        let (layout, report) = layout_of(&Universe::national(), national(30));
        assert_eq!(layout.total_pages, 1);
        assert_eq!(layout.slots.len(), 30);
        assert!(layout.slots.iter().all(Option::is_some));
        assert!(report.is_clean());
    }

    #[test]
    fn thirty_first_entry_opens_box_two() {
        let (layout, _) = layout_of(&Universe::national(), national(31));
        assert_eq!(layout.total_pages, 2);
        assert_eq!(layout.slots.len(), 60);

        let first_of_box_two = layout.slots[30].as_ref().unwrap();
        assert_eq!(first_of_box_two.entry.id.0, 31);
        assert_eq!(
            first_of_box_two.placement,
            BoxPlacement { page: 2, row: 1, column: 1 }
        );
        assert!(layout.slots[31..].iter().all(Option::is_none));
    }

    #[test]
    fn precomputed_slot_is_used_verbatim() {
        let mut entries = national(3);
        // Swap 1 and 3 through the override table
        entries[0] = entries[0]
            .clone()
            .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 1, row: 1, column: 3 });
        entries[2] = entries[2]
            .clone()
            .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 1, row: 1, column: 1 });

        let (layout, report) = layout_of(&Universe::national(), entries);
        assert_eq!(layout.slots[0].as_ref().unwrap().entry.id.0, 3);
        assert_eq!(layout.slots[2].as_ref().unwrap().entry.id.0, 1);
        assert!(layout.slots[2].as_ref().unwrap().precomputed);

        // Entry 2 had no override while others did
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(report.issues[0], IntegrityIssue::MissingPlacement { .. }));
    }

    #[test]
    fn collision_keeps_first_seen() {
        let mut entries = national(2);
        entries[1] = entries[1]
            .clone()
            .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 1, row: 1, column: 1 });

        let (layout, report) = layout_of(&Universe::national(), entries);
        assert_eq!(layout.slots[0].as_ref().unwrap().entry.id.0, 1);
        assert_eq!(layout.occupied(), 1);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, IntegrityIssue::Collision { occupant, .. } if occupant.0 == 1)));
    }

    #[test]
    fn gapped_regional_numbers_all_land() {
        let entries: Vec<Entry> = (1..=40u32)
            .filter(|n| !(5..=15).contains(n))
            .map(|n| {
                Entry::new(n, n + 100, format!("Species {n}")).with_regional_sequence("alola", n)
            })
            .collect();
        assert_eq!(entries.len(), 29);

        let (layout, report) = layout_of(&Universe::regional("alola"), entries);
        assert!(report.is_clean());
        assert_eq!(layout.total_pages, 2);
        assert_eq!(layout.occupied(), 29);
        assert!(layout.slots[4..15].iter().all(Option::is_none));
        assert_eq!(layout.slots[39].as_ref().unwrap().sequence, 40);
    }

    #[test]
    fn absurd_regional_number_does_not_stretch_grid() {
        let entries = vec![
            Entry::new(1, 1, "Species 1").with_regional_sequence("alola", 1),
            Entry::new(2, 2, "Species 2").with_regional_sequence("alola", 4_000_000),
        ];

        let (layout, report) = layout_of(&Universe::regional("alola"), entries);
        assert_eq!(layout.total_pages, 1);
        assert_eq!(layout.occupied(), 1);
        assert!(matches!(
            report.issues[..],
            [IntegrityIssue::OutOfRange { total_pages: 1, .. }]
        ));
    }

    #[test]
    fn out_of_range_slot_left_empty() {
        let mut entries = national(3);
        entries[2] = entries[2]
            .clone()
            .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 4, row: 1, column: 1 });

        let (layout, report) = layout_of(&Universe::national(), entries);
        assert_eq!(layout.slots.len(), 30);
        assert_eq!(layout.occupied(), 2);
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, IntegrityIssue::OutOfRange { total_pages: 1, .. })));
    }

    #[test]
    fn off_grid_slot_left_empty() {
        let mut entries = national(2);
        entries[0] = entries[0]
            .clone()
            .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 1, row: 8, column: 1 });

        let (layout, report) = layout_of(&Universe::national(), entries);
        assert_eq!(layout.occupied(), 1);
        assert!(matches!(report.issues[0], IntegrityIssue::InvalidPlacement { .. }));
    }

    #[test]
    fn regional_ignores_national_overrides() {
        let entries = vec![
            Entry::new(1, 25, "Pikachu")
                .with_regional_sequence("kanto", 2)
                .with_placement(VariantMode::DefaultOnly, BoxPlacement { page: 1, row: 5, column: 1 }),
            Entry::new(2, 1, "Bulbasaur").with_regional_sequence("kanto", 1),
        ];

        let (layout, report) = layout_of(&Universe::regional("kanto"), entries);
        assert_eq!(layout.slots[0].as_ref().unwrap().entry.id.0, 2);
        assert_eq!(layout.slots[1].as_ref().unwrap().entry.id.0, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn regional_zero_is_reported() {
        let entries = vec![
            Entry::new(494, 494, "Victini").with_regional_sequence("unova", 0),
            Entry::new(495, 495, "Snivy").with_regional_sequence("unova", 1),
        ];

        let (layout, report) = layout_of(&Universe::regional("unova"), entries);
        assert_eq!(layout.slots[0].as_ref().unwrap().entry.id.0, 495);
        assert!(matches!(
            report.issues[0],
            IntegrityIssue::InvalidSequence { sequence: 0, .. }
        ));
    }

    proptest! {
        #[test]
        fn prop_boxes_enumerate_every_cell(n in 1..200u32) {
            let (layout, report) = layout_of(&Universe::national(), national(n));
            prop_assert!(report.is_clean());
            prop_assert_eq!(layout.occupied(), n as usize);

            let capacity = BOX_CAPACITY as usize;
            let mut last_page = 0;
            for (index, slot) in layout.slots.iter().enumerate() {
                if let Some(placed) = slot {
                    prop_assert_eq!(placed.placement.slot_index().unwrap(), index);
                    prop_assert!(placed.placement.page >= last_page);
                    last_page = placed.placement.page;
                }
            }

            let full_boxes = n as usize / capacity;
            for page in 0..full_boxes {
                let cells = &layout.slots[page * capacity..(page + 1) * capacity];
                prop_assert!(cells.iter().all(Option::is_some));
            }
        }
    }
}
