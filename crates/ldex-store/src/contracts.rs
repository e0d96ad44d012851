//! Store contracts
//!
//! Each trait is the whole interface a backend must provide; callers never
//! see tables, column names or query builders.

use crate::error::StoreError;
use async_trait::async_trait;
use ldex_model::{
    CatchStatusRecord, Collection, CollectionId, Entry, EntryId, RegionalDex, StatusPatch,
    Universe, UserId,
};
use std::sync::Arc;

/// Read side of the catalog
#[async_trait]
pub trait EntryCatalog: Send + Sync {
    /// Every entry of `universe`, in display order, unpaginated
    ///
    /// An unknown region yields an empty list.
    async fn list_entries(&self, universe: &Universe) -> Result<Vec<Entry>, StoreError>;

    /// Directory of regional dexes, in directory order
    async fn regional_dexes(&self) -> Result<Vec<RegionalDex>, StoreError>;

    /// One regional dex by name
    async fn regional_dex(&self, name: &str) -> Result<Option<RegionalDex>, StoreError> {
        Ok(self
            .regional_dexes()
            .await?
            .into_iter()
            .find(|dex| dex.name == name))
    }
}

/// Per-collection catch status rows
#[async_trait]
pub trait CatchLedger: Send + Sync {
    /// Stored rows of `collection_id` owned by `user_id` among `entry_ids`
    ///
    /// Order is unspecified; entries without a row are omitted.
    async fn list_status(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_ids: &[EntryId],
    ) -> Result<Vec<CatchStatusRecord>, StoreError>;

    /// Create or update the row keyed by (collection, entry)
    ///
    /// Fields the patch leaves as `None` keep their stored value. Applying
    /// the same patch twice leaves the row unchanged.
    async fn upsert_status(
        &self,
        collection_id: CollectionId,
        user_id: UserId,
        entry_id: EntryId,
        patch: &StatusPatch,
    ) -> Result<CatchStatusRecord, StoreError>;
}

/// User-owned collections
#[async_trait]
pub trait CollectionDirectory: Send + Sync {
    /// Collection `id` if `user` owns it
    async fn find(&self, user: UserId, id: CollectionId)
        -> Result<Option<Collection>, StoreError>;

    /// Collections of `user`, oldest first
    async fn list(&self, user: UserId) -> Result<Vec<Collection>, StoreError>;

    /// Store a new collection
    async fn create(&self, collection: Collection) -> Result<Collection, StoreError>;

    /// Remove a collection and its ledger rows
    ///
    /// Fails with `StoreError::LastCollection` when it is the user's only one.
    async fn delete(&self, user: UserId, id: CollectionId) -> Result<(), StoreError>;

    /// Number of collections `user` owns
    async fn count(&self, user: UserId) -> Result<usize, StoreError>;
}

/// The store contracts, constructed once and shared
#[derive(Clone)]
pub struct StoreHandle {
    /// Catalog reads
    pub catalog: Arc<dyn EntryCatalog>,
    /// Ledger reads and writes
    pub ledger: Arc<dyn CatchLedger>,
    /// Collection lookups
    pub collections: Arc<dyn CollectionDirectory>,
}

impl StoreHandle {
    /// Bundle independently provided contracts
    #[must_use]
    pub fn new(
        catalog: Arc<dyn EntryCatalog>,
        ledger: Arc<dyn CatchLedger>,
        collections: Arc<dyn CollectionDirectory>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            collections,
        }
    }

    /// Use one backend for all three contracts
    #[must_use]
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: EntryCatalog + CatchLedger + CollectionDirectory + 'static,
    {
        Self {
            catalog: backend.clone(),
            ledger: backend.clone(),
            collections: backend,
        }
    }

    /// Replace the ledger, keeping the other contracts
    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<dyn CatchLedger>) -> Self {
        self.ledger = ledger;
        self
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}
