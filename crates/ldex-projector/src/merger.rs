//! Catch-status merge
//!
//! Ledger reads are split into batches of at most `id_batch_size` ids so a
//! full national grid never turns into one oversized query. Batches run
//! concurrently or one after another, per [`ProjectorConfig`].
//!
//! Entries without a stored row merge as an implicit `not_caught` record;
//! nothing is written back.

use crate::config::ProjectorConfig;
use crate::facade::TrackedEntry;
use crate::placer::Layout;
use crate::report::{IntegrityIssue, ProjectionReport};
use futures::future::try_join_all;
use ldex_model::{CatchStatusRecord, CollectionId, EntryId, UserId};
use ldex_store::{CatchLedger, StoreError};
use std::collections::HashMap;

/// Stored rows keyed by entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLookup {
    rows: HashMap<EntryId, CatchStatusRecord>,
}

impl StatusLookup {
    /// Stored row for `entry`
    #[must_use]
    pub fn get(&self, entry: EntryId) -> Option<&CatchStatusRecord> {
        self.rows.get(&entry)
    }

    /// Number of stored rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No stored rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `entry`, or an implicit `not_caught` row
    #[must_use]
    pub fn record_for(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry: EntryId,
    ) -> CatchStatusRecord {
        self.rows
            .get(&entry)
            .cloned()
            .unwrap_or_else(|| CatchStatusRecord::implicit(collection_id, user_id, entry))
    }

    fn insert(&mut self, row: CatchStatusRecord) {
        match self.rows.get(&row.entry_id) {
            // Keep the most recently written row
            Some(held) if held.updated_at >= row.updated_at => {}
            _ => {
                self.rows.insert(row.entry_id, row);
            }
        }
    }
}

/// Read the stored rows for `ids` in batches
///
/// # Errors
/// Any failed batch fails the whole read; partial lookups are never
/// returned.
pub async fn fetch_statuses(
    ledger: &dyn CatchLedger,
    collection_id: CollectionId,
    user_id: UserId,
    ids: &[EntryId],
    config: &ProjectorConfig,
    report: &mut ProjectionReport,
) -> Result<StatusLookup, StoreError> {
    let mut lookup = StatusLookup::default();
    if ids.is_empty() {
        return Ok(lookup);
    }

    let batch_size = config.id_batch_size.max(1);
    let batches: Vec<Vec<CatchStatusRecord>> = if config.concurrent_batches {
        try_join_all(
            ids.chunks(batch_size)
                .map(|chunk| ledger.list_status(collection_id, user_id, chunk)),
        )
        .await?
    } else {
        let mut batches = Vec::with_capacity(ids.len().div_ceil(batch_size));
        for chunk in ids.chunks(batch_size) {
            batches.push(ledger.list_status(collection_id, user_id, chunk).await?);
        }
        batches
    };

    tracing::debug!(
        ids = ids.len(),
        batches = batches.len(),
        concurrent = config.concurrent_batches,
        "ledger batches read"
    );

    for row in batches.into_iter().flatten() {
        if row.collection_id != collection_id || row.user_id != user_id {
            report.record(IntegrityIssue::ForeignRecord {
                entry: row.entry_id,
            });
            continue;
        }
        lookup.insert(row);
    }

    Ok(lookup)
}

/// Attach a record to every occupied slot
///
/// Null slots stay null; the grid keeps its length.
#[must_use]
pub fn merge(
    layout: Layout,
    lookup: &StatusLookup,
    collection_id: CollectionId,
    user_id: UserId,
) -> Vec<Option<TrackedEntry>> {
    layout
        .slots
        .into_iter()
        .map(|slot| {
            slot.map(|placed| {
                let record = lookup.record_for(collection_id, user_id, placed.entry.id);
                TrackedEntry::new(placed, record)
            })
        })
        .collect()
}
