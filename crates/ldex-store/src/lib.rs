//! Living Dex Store
//!
//! The narrow persistence boundary of the tracker.
//!
//! # Overview
//!
//! - **EntryCatalog**: read-only, display-ordered entries per universe
//! - **CatchLedger**: per-collection status rows, upserted by (collection, entry)
//! - **CollectionDirectory**: user-owned collections
//! - **StoreHandle**: the three contracts bundled, constructed once and
//!   passed to whoever needs them
//! - **MemoryStore**: in-process backend implementing all three
//!
//! # Example
//!
//! ```rust
//! use ldex_model::{Entry, Universe};
//! use ldex_store::{EntryCatalog, MemoryStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ldex_store::StoreError> {
//! let store = MemoryStore::with_catalog(vec![Entry::new(25, 25, "Pikachu")], Vec::new())?;
//! let entries = store.list_entries(&Universe::national()).await?;
//! assert_eq!(entries.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod contracts;
pub mod error;
pub mod file;
pub mod memory;
pub mod placement;

// Re-exports
pub use contracts::{CatchLedger, CollectionDirectory, EntryCatalog, StoreHandle};
pub use error::StoreError;
pub use file::CatalogFile;
pub use memory::MemoryStore;
pub use placement::{
    invalid_placements, placement_conflicts, validate_placements, PlacementConflict,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
