//! Living Dex Model
//!
//! Pure data types shared by every layer of the tracker.
//!
//! # Overview
//!
//! - **Entry**: one species/form record of the catalog, with optional
//!   precomputed box placements and per-region sequence numbers
//! - **BoxPlacement**: `{page, row, column}` coordinates on the fixed
//!   6 × 5 box grid, and the sequence ↔ slot arithmetic
//! - **Universe**: the national or regional entry set a collection draws from
//! - **Collection**: a user's named tracking view
//! - **CatchStatusRecord**: the per-collection, per-entry ledger row
//!
//! # Example
//!
//! ```rust
//! use ldex_model::{BoxPlacement, BOX_CAPACITY};
//!
//! let placement = BoxPlacement::from_sequence(31).unwrap();
//! assert_eq!((placement.page, placement.row, placement.column), (2, 1, 1));
//! assert_eq!(placement.slot_index().unwrap(), BOX_CAPACITY as usize);
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod collection;
pub mod error;
pub mod grid;
pub mod ledger;

// Re-exports
pub use catalog::{Entry, EntryId, RegionalDex, Universe, VariantMode};
pub use collection::{Collection, CollectionId, UserId};
pub use error::ModelError;
pub use grid::{grid_len, total_pages, BoxPlacement, BOX_CAPACITY, BOX_COLUMNS, BOX_ROWS};
pub use ledger::{CatchLocation, CatchStatus, CatchStatusRecord, StatusPatch};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the model
    pub use crate::{
        BoxPlacement, CatchLocation, CatchStatus, CatchStatusRecord, Collection, CollectionId,
        Entry, EntryId, StatusPatch, Universe, UserId, VariantMode,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
