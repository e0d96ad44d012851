//! Completion statistics

use crate::facade::TrackedEntry;
use ldex_model::CatchStatus;
use serde::Serialize;

/// Progress over a collection's universe
///
/// `caught` includes entries ready to evolve. Ledger rows for entries
/// outside the universe are never counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// Entries placed on the grid
    pub total: usize,
    /// Caught or ready to evolve
    pub caught: usize,
    /// Ready to evolve only
    pub ready_to_evolve: usize,
    /// `caught / total` as a whole percentage, halves rounded up
    pub percent_complete: u32,
}

impl CollectionStats {
    /// Tally tracked entries
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a TrackedEntry>) -> Self {
        let mut stats = Self::default();
        for tracked in entries {
            stats.total += 1;
            let status = tracked.status();
            if status.is_caught() {
                stats.caught += 1;
            }
            if status == CatchStatus::ReadyToEvolve {
                stats.ready_to_evolve += 1;
            }
        }
        stats.percent_complete = percent(stats.caught, stats.total);
        stats
    }

    /// Entries still to catch
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total - self.caught
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (part * 200 + whole) / (whole * 2);
    u32::try_from(scaled).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldex_model::{BoxPlacement, CatchStatusRecord, CollectionId, Entry, EntryId, UserId};

    fn tracked(id: u32, status: CatchStatus) -> TrackedEntry {
        let mut record = CatchStatusRecord::implicit(CollectionId::new(), UserId::new(), EntryId(id));
        record.status = status;
        TrackedEntry {
            entry: Entry::new(id, id, format!("Species {id}")),
            sequence: id,
            placement: BoxPlacement::from_sequence(id).unwrap(),
            record,
        }
    }

    #[test]
    fn ready_to_evolve_counts_as_caught() {
        let entries = vec![
            tracked(1, CatchStatus::Caught),
            tracked(2, CatchStatus::ReadyToEvolve),
            tracked(3, CatchStatus::NotCaught),
        ];
        let stats = CollectionStats::tally(&entries);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.caught, 2);
        assert_eq!(stats.ready_to_evolve, 1);
        assert_eq!(stats.percent_complete, 67);
        assert_eq!(stats.remaining(), 1);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(30, 30), 100);
    }
}
