//! Collection projector
//!
//! Entry point for every read and write on a collection's box view. Each
//! read builds one [`Projection`] (resolve, place, merge) and serves the
//! requested view from it.

use crate::bulk::{apply_bulk, BulkAction, BulkOutcome};
use crate::config::ProjectorConfig;
use crate::error::ProjectionError;
use crate::facade::{BoxView, GridView, Page, PageRequest, Projection};
use crate::merger::{fetch_statuses, merge};
use crate::placer::place;
use crate::report::ProjectionReport;
use crate::resolver::resolve;
use crate::stats::CollectionStats;
use ldex_model::{CatchStatusRecord, Collection, CollectionId, EntryId, StatusPatch, UserId};
use ldex_store::StoreHandle;
use std::collections::HashSet;

/// Projects collections over a shared store
#[derive(Debug, Clone)]
pub struct CollectionProjector {
    store: StoreHandle,
    config: ProjectorConfig,
}

impl CollectionProjector {
    /// Create a projector over `store`
    #[inline]
    #[must_use]
    pub fn new(store: StoreHandle, config: ProjectorConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Resolve, place and merge the collection's universe
    ///
    /// A collection the user does not own projects as empty.
    ///
    /// # Errors
    /// Store failures, as one error for the whole read.
    #[tracing::instrument(skip(self), fields(collection = %collection_id))]
    pub async fn project(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
    ) -> Result<Projection, ProjectionError> {
        let Some(collection) = self.store.collections.find(user_id, collection_id).await? else {
            tracing::debug!("collection not visible, empty projection");
            return Ok(Projection::empty(collection_id, user_id));
        };

        let universe = collection.universe;
        let entries = self.store.catalog.list_entries(&universe).await?;

        let mut report = ProjectionReport::default();
        let resolution = resolve(&universe, entries, &mut report);
        let layout = place(resolution, universe.placement_mode(), &mut report);

        let placed: Vec<EntryId> = layout.placed().map(|p| p.entry.id).collect();
        let lookup = fetch_statuses(
            self.store.ledger.as_ref(),
            collection_id,
            user_id,
            &placed,
            &self.config,
            &mut report,
        )
        .await?;

        let total_pages = layout.total_pages;
        let slots = merge(layout, &lookup, collection_id, user_id);
        tracing::debug!(
            placed = placed.len(),
            recorded = lookup.len(),
            issues = report.issues.len(),
            "projection merged"
        );

        Ok(Projection {
            collection_id,
            user_id,
            universe: Some(universe),
            slots,
            total_pages,
            report,
        })
    }

    /// Paged mode
    ///
    /// # Errors
    /// `InvalidPageRequest` for page 0 or page size 0, or a store failure.
    pub async fn page(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        request: &PageRequest,
    ) -> Result<Page, ProjectionError> {
        let page_size = self.config.effective_page_size(request.page_size);
        if request.page == 0 || page_size == 0 {
            return Err(ProjectionError::InvalidPageRequest {
                page: request.page,
                page_size,
            });
        }

        self.project(collection_id, user_id)
            .await?
            .page(request.page, page_size, &request.filter)
    }

    /// Full-grid mode
    ///
    /// # Errors
    /// Store failures.
    pub async fn grid(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
    ) -> Result<GridView, ProjectionError> {
        Ok(self.project(collection_id, user_id).await?.grid())
    }

    /// One box of the grid
    ///
    /// # Errors
    /// `UnknownBox` for a box outside the grid, or a store failure.
    pub async fn box_view(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        box_number: u32,
    ) -> Result<BoxView, ProjectionError> {
        self.project(collection_id, user_id).await?.box_view(box_number)
    }

    /// Completion statistics
    ///
    /// # Errors
    /// Store failures.
    pub async fn stats(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
    ) -> Result<CollectionStats, ProjectionError> {
        let projection = self.project(collection_id, user_id).await?;
        Ok(CollectionStats::tally(projection.entries()))
    }

    /// Upsert one entry's record
    ///
    /// # Errors
    /// `CollectionNotFound` unless the user owns the collection,
    /// `EntryNotInCollection` for an entry outside its universe.
    #[tracing::instrument(skip(self, patch), fields(collection = %collection_id, entry = %entry_id))]
    pub async fn set_status(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_id: EntryId,
        patch: &StatusPatch,
    ) -> Result<CatchStatusRecord, ProjectionError> {
        let collection = self.owned(collection_id, user_id).await?;
        if !self.universe_ids(&collection).await?.contains(&entry_id) {
            return Err(ProjectionError::EntryNotInCollection {
                entry: entry_id,
                collection: collection_id,
            });
        }

        let record = self
            .store
            .ledger
            .upsert_status(collection_id, user_id, entry_id, patch)
            .await?;
        tracing::info!(status = %record.status, "catch status set");
        Ok(record)
    }

    /// Apply `action` to every listed entry
    ///
    /// # Errors
    /// `CollectionNotFound` unless the user owns the collection. Per-entry
    /// write failures are reported in the outcome instead.
    #[tracing::instrument(skip(self, entry_ids), fields(collection = %collection_id, ids = entry_ids.len()))]
    pub async fn bulk_update(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_ids: &[EntryId],
        action: BulkAction,
    ) -> Result<BulkOutcome, ProjectionError> {
        let collection = self.owned(collection_id, user_id).await?;
        let universe = self.universe_ids(&collection).await?;

        Ok(apply_bulk(
            self.store.ledger.as_ref(),
            collection_id,
            user_id,
            entry_ids,
            &universe,
            action,
            self.config.bulk_concurrency,
        )
        .await)
    }

    /// Apply `action` to every occupied slot of one box
    ///
    /// # Errors
    /// `CollectionNotFound`, `UnknownBox`, or a store failure while
    /// projecting.
    #[tracing::instrument(skip(self), fields(collection = %collection_id))]
    pub async fn bulk_update_box(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        box_number: u32,
        action: BulkAction,
    ) -> Result<BulkOutcome, ProjectionError> {
        self.owned(collection_id, user_id).await?;

        let projection = self.project(collection_id, user_id).await?;
        let view = projection.box_view(box_number)?;
        let ids: Vec<EntryId> = view.entries().map(|t| t.entry.id).collect();
        let universe: HashSet<EntryId> = projection.entries().map(|t| t.entry.id).collect();

        Ok(apply_bulk(
            self.store.ledger.as_ref(),
            collection_id,
            user_id,
            &ids,
            &universe,
            action,
            self.config.bulk_concurrency,
        )
        .await)
    }

    async fn owned(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
    ) -> Result<Collection, ProjectionError> {
        self.store
            .collections
            .find(user_id, collection_id)
            .await?
            .ok_or(ProjectionError::CollectionNotFound(collection_id))
    }

    async fn universe_ids(&self, collection: &Collection) -> Result<HashSet<EntryId>, ProjectionError> {
        let entries = self.store.catalog.list_entries(&collection.universe).await?;
        Ok(collection
            .universe
            .select(entries)
            .into_iter()
            .map(|entry| entry.id)
            .collect())
    }
}
