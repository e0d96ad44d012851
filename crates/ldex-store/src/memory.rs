//! In-memory backend
//!
//! Implements all three store contracts over process memory. Ledger rows
//! live in a [`DashMap`] keyed by (collection, entry), so the map's entry
//! lock is the only guard two concurrent upserts of one slot need; the last
//! writer wins on field values.

use crate::contracts::{CatchLedger, CollectionDirectory, EntryCatalog};
use crate::error::StoreError;
use crate::file::CatalogFile;
use crate::placement::validate_placements;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use ldex_model::{
    CatchStatusRecord, Collection, CollectionId, Entry, EntryId, RegionalDex, StatusPatch,
    Universe, UserId,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Validated catalog snapshot
#[derive(Debug, Default)]
struct Catalog {
    entries: Vec<Entry>,
    dexes: Vec<RegionalDex>,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Swapped whole on reload; readers keep their snapshot
    catalog: RwLock<Arc<Catalog>>,
    /// Ledger rows keyed by (collection, entry)
    ledger: DashMap<(CollectionId, EntryId), CatchStatusRecord>,
    /// Collections by id
    collections: DashMap<CollectionId, Collection>,
    /// Serializes create/delete so the last-collection rule holds
    lifecycle: Mutex<()>,
}

impl MemoryStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a validated catalog
    ///
    /// # Errors
    /// Returns the first data-integrity problem of the catalog (see
    /// [`validate_placements`]).
    pub fn with_catalog(entries: Vec<Entry>, dexes: Vec<RegionalDex>) -> Result<Self, StoreError> {
        let store = Self::new();
        store.replace_catalog(entries, dexes)?;
        Ok(store)
    }

    /// Store seeded from a catalog file
    ///
    /// # Errors
    /// Same as [`MemoryStore::with_catalog`].
    pub fn from_catalog_file(file: CatalogFile) -> Result<Self, StoreError> {
        Self::with_catalog(file.entries, file.regional_dexes)
    }

    /// Swap in a new catalog after validating it
    ///
    /// # Errors
    /// Leaves the current catalog in place and returns the first
    /// data-integrity problem found.
    pub fn replace_catalog(
        &self,
        entries: Vec<Entry>,
        mut dexes: Vec<RegionalDex>,
    ) -> Result<(), StoreError> {
        validate_placements(&entries)?;
        dexes.sort_by_key(|dex| dex.id);

        tracing::info!(
            entries = entries.len(),
            dexes = dexes.len(),
            "catalog loaded"
        );

        *self.catalog.write() = Arc::new(Catalog { entries, dexes });
        Ok(())
    }

    /// Number of stored ledger rows
    #[inline]
    #[must_use]
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }

    /// Stored row for (collection, entry), if any
    #[must_use]
    pub fn record(&self, collection_id: CollectionId, entry_id: EntryId) -> Option<CatchStatusRecord> {
        self.ledger
            .get(&(collection_id, entry_id))
            .map(|row| row.value().clone())
    }

    fn snapshot(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }
}

#[async_trait]
impl EntryCatalog for MemoryStore {
    async fn list_entries(&self, universe: &Universe) -> Result<Vec<Entry>, StoreError> {
        let catalog = self.snapshot();
        let members = catalog
            .entries
            .iter()
            .filter(|entry| universe.admits(entry))
            .cloned();
        Ok(universe.select(members))
    }

    async fn regional_dexes(&self) -> Result<Vec<RegionalDex>, StoreError> {
        Ok(self.snapshot().dexes.clone())
    }
}

#[async_trait]
impl CatchLedger for MemoryStore {
    async fn list_status(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_ids: &[EntryId],
    ) -> Result<Vec<CatchStatusRecord>, StoreError> {
        let records = entry_ids
            .iter()
            .filter_map(|&entry_id| self.ledger.get(&(collection_id, entry_id)))
            .filter(|row| row.user_id == user_id)
            .map(|row| row.value().clone())
            .collect();
        Ok(records)
    }

    async fn upsert_status(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_id: EntryId,
        patch: &StatusPatch,
    ) -> Result<CatchStatusRecord, StoreError> {
        let now = Utc::now();
        let mut row = self
            .ledger
            .entry((collection_id, entry_id))
            .or_insert_with(|| {
                let mut fresh = CatchStatusRecord::implicit(collection_id, user_id, entry_id);
                fresh.created_at = Some(now);
                fresh.updated_at = Some(now);
                fresh
            });

        if row.apply(patch) {
            row.updated_at = Some(now);
        }

        Ok(row.value().clone())
    }
}

#[async_trait]
impl CollectionDirectory for MemoryStore {
    async fn find(
        &self,
        user: UserId,
        id: CollectionId,
    ) -> Result<Option<Collection>, StoreError> {
        Ok(self
            .collections
            .get(&id)
            .filter(|collection| collection.is_owned_by(user))
            .map(|collection| collection.value().clone()))
    }

    async fn list(&self, user: UserId) -> Result<Vec<Collection>, StoreError> {
        let mut owned: Vec<Collection> = self
            .collections
            .iter()
            .filter(|collection| collection.is_owned_by(user))
            .map(|collection| collection.value().clone())
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn create(&self, collection: Collection) -> Result<Collection, StoreError> {
        let _guard = self.lifecycle.lock();
        if self.collections.contains_key(&collection.id) {
            return Err(StoreError::DuplicateCollection(collection.id));
        }

        tracing::info!(
            collection = %collection.id,
            owner = %collection.owner,
            universe = %collection.universe,
            "collection created"
        );
        self.collections.insert(collection.id, collection.clone());
        Ok(collection)
    }

    async fn delete(&self, user: UserId, id: CollectionId) -> Result<(), StoreError> {
        let _guard = self.lifecycle.lock();

        let owned = self
            .collections
            .get(&id)
            .is_some_and(|collection| collection.is_owned_by(user));
        if !owned {
            return Err(StoreError::CollectionNotFound(id));
        }

        let remaining = self
            .collections
            .iter()
            .filter(|collection| collection.is_owned_by(user))
            .count();
        if remaining <= 1 {
            return Err(StoreError::LastCollection(user));
        }

        self.collections.remove(&id);
        self.ledger.retain(|(collection_id, _), _| *collection_id != id);
        tracing::info!(collection = %id, owner = %user, "collection deleted");
        Ok(())
    }

    async fn count(&self, user: UserId) -> Result<usize, StoreError> {
        Ok(self
            .collections
            .iter()
            .filter(|collection| collection.is_owned_by(user))
            .count())
    }
}
