//! Data-integrity findings
//!
//! Surfaced to operators through logs and [`ProjectionReport`], never to the
//! end user: the affected entry is simply absent from its slot.

use ldex_model::{BoxPlacement, EntryId};
use serde::Serialize;

/// One data-integrity finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Catalog returned the same entry twice; later copy dropped
    DuplicateEntry {
        /// Repeated entry
        entry: EntryId,
    },
    /// Two entries share a regional number; later one dropped
    DuplicateSequence {
        /// Dropped entry
        entry: EntryId,
        /// Shared number
        sequence: u32,
        /// Entry that kept the number
        holder: EntryId,
    },
    /// Entry has no precomputed slot while others in its universe do
    MissingPlacement {
        /// Entry without a stored slot
        entry: EntryId,
        /// Slot derived from its sequence instead
        derived: BoxPlacement,
    },
    /// Precomputed slot lies off the grid
    InvalidPlacement {
        /// Offending entry
        entry: EntryId,
        /// Stored slot
        placement: BoxPlacement,
    },
    /// Sequence number cannot be placed (sequence 0)
    InvalidSequence {
        /// Offending entry
        entry: EntryId,
        /// Stored sequence
        sequence: u32,
    },
    /// Slot lies beyond the last box of the universe
    OutOfRange {
        /// Unplaced entry
        entry: EntryId,
        /// Requested slot
        placement: BoxPlacement,
        /// Boxes in the grid
        total_pages: u32,
    },
    /// Slot already taken by an earlier entry
    Collision {
        /// Unplaced entry
        entry: EntryId,
        /// Contested slot
        placement: BoxPlacement,
        /// Entry holding the slot
        occupant: EntryId,
    },
    /// Ledger returned a row for another collection or user
    ForeignRecord {
        /// Entry of the stray row
        entry: EntryId,
    },
}

impl IntegrityIssue {
    /// Entry the finding is about
    #[must_use]
    pub fn entry(&self) -> EntryId {
        match self {
            Self::DuplicateEntry { entry }
            | Self::DuplicateSequence { entry, .. }
            | Self::MissingPlacement { entry, .. }
            | Self::InvalidPlacement { entry, .. }
            | Self::InvalidSequence { entry, .. }
            | Self::OutOfRange { entry, .. }
            | Self::Collision { entry, .. }
            | Self::ForeignRecord { entry } => *entry,
        }
    }

    /// Whether the entry was left out of the grid
    #[must_use]
    pub fn drops_entry(&self) -> bool {
        !matches!(self, Self::MissingPlacement { .. } | Self::ForeignRecord { .. })
    }
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEntry { entry } => write!(f, "entry {entry} listed twice"),
            Self::DuplicateSequence {
                entry,
                sequence,
                holder,
            } => write!(f, "entry {entry} reuses sequence {sequence} held by {holder}"),
            Self::MissingPlacement { entry, derived } => {
                write!(f, "entry {entry} has no stored placement, derived {derived}")
            }
            Self::InvalidPlacement { entry, placement } => {
                write!(f, "entry {entry} has off-grid placement {placement}")
            }
            Self::InvalidSequence { entry, sequence } => {
                write!(f, "entry {entry} has unplaceable sequence {sequence}")
            }
            Self::OutOfRange {
                entry,
                placement,
                total_pages,
            } => write!(
                f,
                "entry {entry} placed at {placement} beyond {total_pages} boxes"
            ),
            Self::Collision {
                entry,
                placement,
                occupant,
            } => write!(f, "entry {entry} collides with {occupant} at {placement}"),
            Self::ForeignRecord { entry } => {
                write!(f, "ledger row for entry {entry} belongs to another collection")
            }
        }
    }
}

/// Findings collected while building one projection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionReport {
    /// Findings in discovery order
    pub issues: Vec<IntegrityIssue>,
}

impl ProjectionReport {
    /// Record and log a finding
    pub fn record(&mut self, issue: IntegrityIssue) {
        tracing::warn!(entry = %issue.entry(), "data integrity: {}", issue);
        self.issues.push(issue);
    }

    /// No findings
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of entries left out of the grid
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.issues.iter().filter(|i| i.drops_entry()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_names_occupant() {
        let issue = IntegrityIssue::Collision {
            entry: EntryId(2),
            placement: BoxPlacement::new(1, 1, 1).unwrap(),
            occupant: EntryId(1),
        };
        assert_eq!(issue.to_string(), "entry #2 collides with #1 at box 1 row 1 col 1");
        assert!(issue.drops_entry());
    }

    #[test]
    fn report_counts_dropped() {
        let mut report = ProjectionReport::default();
        report.record(IntegrityIssue::DuplicateEntry { entry: EntryId(1) });
        report.record(IntegrityIssue::MissingPlacement {
            entry: EntryId(2),
            derived: BoxPlacement::new(1, 1, 2).unwrap(),
        });
        assert!(!report.is_clean());
        assert_eq!(report.dropped(), 1);
    }
}
