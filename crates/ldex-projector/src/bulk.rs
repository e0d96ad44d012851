//! Bulk status changes
//!
//! One status transition applied to many entries. Each upsert stands alone:
//! a failure for one entry never rolls back the others, and the outcome
//! reports requested versus written so a partial write is visible.

use futures::stream::{self, StreamExt};
use ldex_model::{CatchStatus, CollectionId, EntryId, StatusPatch, UserId};
use ldex_store::CatchLedger;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Transition applied by a bulk change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    /// Set `caught`
    MarkCaught,
    /// Set `ready_to_evolve`
    MarkReadyToEvolve,
    /// Back to `not_caught`
    Reset,
}

impl BulkAction {
    /// Status every targeted row ends up with
    #[must_use]
    pub fn target_status(self) -> CatchStatus {
        match self {
            Self::MarkCaught => CatchStatus::Caught,
            Self::MarkReadyToEvolve => CatchStatus::ReadyToEvolve,
            Self::Reset => CatchStatus::NotCaught,
        }
    }

    /// Patch touching the status field only
    #[must_use]
    pub fn patch(self) -> StatusPatch {
        StatusPatch::status(self.target_status())
    }
}

impl From<CatchStatus> for BulkAction {
    fn from(status: CatchStatus) -> Self {
        match status {
            CatchStatus::Caught => Self::MarkCaught,
            CatchStatus::ReadyToEvolve => Self::MarkReadyToEvolve,
            CatchStatus::NotCaught => Self::Reset,
        }
    }
}

impl std::str::FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(Self::Reset),
            other => other.parse::<CatchStatus>().map(Self::from),
        }
    }
}

/// An entry the bulk change could not write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    /// Entry left unwritten
    pub entry: EntryId,
    /// Error text
    pub reason: String,
    /// Store reported a transient error
    pub retryable: bool,
}

/// Result of a bulk change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Transition applied
    pub action: BulkAction,
    /// Distinct entries asked for
    pub requested: usize,
    /// Rows created or updated
    pub written: usize,
    /// Entries that could not be written
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Every requested entry was written
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.written == self.requested
    }
}

/// Upsert `action` for every id admitted by `universe`
///
/// Repeated ids count once. Ids outside the universe are reported as
/// failures without touching the ledger.
pub async fn apply_bulk(
    ledger: &dyn CatchLedger,
    collection_id: CollectionId,
    user_id: UserId,
    entry_ids: &[EntryId],
    universe: &HashSet<EntryId>,
    action: BulkAction,
    concurrency: usize,
) -> BulkOutcome {
    let mut seen = HashSet::with_capacity(entry_ids.len());
    let unique: Vec<EntryId> = entry_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let (targets, outside): (Vec<EntryId>, Vec<EntryId>) =
        unique.iter().copied().partition(|id| universe.contains(id));

    let mut failed: Vec<BulkFailure> = outside
        .into_iter()
        .map(|entry| BulkFailure {
            entry,
            reason: format!("entry {entry} is not part of collection {collection_id}"),
            retryable: false,
        })
        .collect();

    let patch = action.patch();
    let results: Vec<(EntryId, Result<_, _>)> = stream::iter(targets)
        .map(|entry| {
            let patch = &patch;
            async move {
                let result = ledger
                    .upsert_status(collection_id, user_id, entry, patch)
                    .await;
                (entry, result)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut written = 0;
    for (entry, result) in results {
        match result {
            Ok(_) => written += 1,
            Err(err) => failed.push(BulkFailure {
                entry,
                reason: err.to_string(),
                retryable: err.is_retryable(),
            }),
        }
    }
    failed.sort_by_key(|failure| failure.entry);

    let outcome = BulkOutcome {
        action,
        requested: unique.len(),
        written,
        failed,
    };

    if outcome.is_complete() {
        tracing::info!(
            collection = %collection_id,
            action = ?action,
            written = outcome.written,
            "bulk status change applied"
        );
    } else {
        tracing::warn!(
            collection = %collection_id,
            action = ?action,
            requested = outcome.requested,
            written = outcome.written,
            "bulk status change partially applied"
        );
    }
    outcome
}
