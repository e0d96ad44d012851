//! Sequence resolution
//!
//! Orders a universe's entries and tags each with its 1-based sequence:
//! - national: position in national order
//! - regional: the stored regional number, used as-is

use crate::report::{IntegrityIssue, ProjectionReport};
use ldex_model::{Entry, EntryId, Universe};
use std::collections::{HashMap, HashSet};

/// Entry with its position in the universe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedEntry {
    /// Catalog entry
    pub entry: Entry,
    /// 1-based position; the regional number for regional universes
    pub sequence: u32,
}

/// Ordered, de-duplicated universe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Entries in display order
    pub entries: Vec<SequencedEntry>,
}

impl Resolution {
    /// Ids in resolution order
    #[must_use]
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|s| s.entry.id).collect()
    }

    /// Number of resolved entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nothing resolved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve catalog output for `universe`
///
/// The catalog is expected to return the universe in display order already;
/// ordering is re-applied so a backend that only filters still resolves
/// correctly. Repeated entries and repeated regional numbers keep the first
/// occurrence and are reported.
pub fn resolve(universe: &Universe, entries: Vec<Entry>, report: &mut ProjectionReport) -> Resolution {
    let ordered = universe.select(entries);

    let mut seen_ids = HashSet::with_capacity(ordered.len());
    let mut sequence_holders: HashMap<u32, EntryId> = HashMap::new();
    let mut resolved = Vec::with_capacity(ordered.len());

    for entry in ordered {
        if !seen_ids.insert(entry.id) {
            report.record(IntegrityIssue::DuplicateEntry { entry: entry.id });
            continue;
        }

        let sequence = match universe {
            Universe::National { .. } => next_sequence(resolved.len()),
            // `select` kept only entries holding a number for this region
            Universe::Regional { region } => entry.regional_sequence(region).unwrap_or_default(),
        };

        if let Some(&holder) = sequence_holders.get(&sequence) {
            report.record(IntegrityIssue::DuplicateSequence {
                entry: entry.id,
                sequence,
                holder,
            });
            continue;
        }
        sequence_holders.insert(sequence, entry.id);

        resolved.push(SequencedEntry { entry, sequence });
    }

    tracing::debug!(universe = %universe, resolved = resolved.len(), "universe resolved");
    Resolution { entries: resolved }
}

fn next_sequence(already_resolved: usize) -> u32 {
    u32::try_from(already_resolved + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn national(n: u32) -> Vec<Entry> {
        (1..=n).map(|i| Entry::new(i, i, format!("Species {i}"))).collect()
    }

    #[test]
    fn national_sequences_are_positions() {
        let mut report = ProjectionReport::default();
        let mut entries = national(3);
        entries.push(Entry::new(10, 2, "Species 2").with_variant("Alolan"));

        let plain = resolve(&Universe::national(), entries.clone(), &mut report);
        let seqs: Vec<(u32, u32)> = plain.entries.iter().map(|s| (s.entry.id.0, s.sequence)).collect();
        assert_eq!(seqs, vec![(1, 1), (2, 2), (3, 3)]);

        let all = resolve(&Universe::national_with_variants(), entries, &mut report);
        let seqs: Vec<(u32, u32)> = all.entries.iter().map(|s| (s.entry.id.0, s.sequence)).collect();
        assert_eq!(seqs, vec![(1, 1), (2, 2), (10, 3), (3, 4)]);
        assert!(report.is_clean());
    }

    #[test]
    fn regional_sequences_are_used_verbatim() {
        let mut report = ProjectionReport::default();
        let entries = vec![
            Entry::new(1, 152, "Chikorita").with_regional_sequence("johto", 1),
            Entry::new(2, 25, "Pikachu").with_regional_sequence("johto", 22),
            Entry::new(3, 1, "Bulbasaur"),
        ];

        let resolution = resolve(&Universe::regional("johto"), entries, &mut report);
        let seqs: Vec<u32> = resolution.entries.iter().map(|s| s.sequence).collect();
        assert_eq!(seqs, vec![1, 22]);
    }

    #[test]
    fn unknown_region_is_empty() {
        let mut report = ProjectionReport::default();
        let resolution = resolve(&Universe::regional("nowhere"), national(5), &mut report);
        assert!(resolution.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn duplicates_keep_first() {
        let mut report = ProjectionReport::default();
        let entries = vec![
            Entry::new(1, 1, "Bulbasaur").with_regional_sequence("kanto", 1),
            Entry::new(1, 1, "Bulbasaur").with_regional_sequence("kanto", 1),
            Entry::new(2, 2, "Ivysaur").with_regional_sequence("kanto", 1),
            Entry::new(3, 3, "Venusaur").with_regional_sequence("kanto", 3),
        ];

        let resolution = resolve(&Universe::regional("kanto"), entries, &mut report);
        assert_eq!(resolution.ids(), vec![EntryId(1), EntryId(3)]);
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(
            report.issues[1],
            IntegrityIssue::DuplicateSequence { entry: EntryId(2), sequence: 1, holder: EntryId(1) }
        ));
    }

    proptest! {
        #[test]
        fn prop_no_duplicate_entries_or_sequences(
            raw in proptest::collection::vec((1..60u32, 1..40u32, proptest::option::of(1..50u32), any::<bool>()), 0..120)
        ) {
            let entries: Vec<Entry> = raw
                .into_iter()
                .map(|(id, national, regional, variant)| {
                    let mut entry = Entry::new(id, national, format!("Species {national}"));
                    if variant {
                        entry = entry.with_variant("Form");
                    }
                    if let Some(number) = regional {
                        entry = entry.with_regional_sequence("test", number);
                    }
                    entry
                })
                .collect();

            for universe in [
                Universe::national(),
                Universe::national_with_variants(),
                Universe::regional("test"),
            ] {
                let mut report = ProjectionReport::default();
                let resolution = resolve(&universe, entries.clone(), &mut report);

                let ids: HashSet<EntryId> = resolution.entries.iter().map(|s| s.entry.id).collect();
                let seqs: HashSet<u32> = resolution.entries.iter().map(|s| s.sequence).collect();
                prop_assert_eq!(ids.len(), resolution.len());
                prop_assert_eq!(seqs.len(), resolution.len());
            }
        }
    }
}
