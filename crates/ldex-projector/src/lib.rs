//! Living Dex Projector
//!
//! Turns a collection into its box view:
//! - Resolves the collection's universe into a sequenced entry list
//! - Places every entry on the 6 × 5 box grid (precomputed slot or derived
//!   from its sequence)
//! - Merges the caller's catch-status rows into the placed entries
//! - Serves the result as filtered pages, a whole grid, or one box
//! - Applies one status change to a whole box
//!
//! Paged and grid reads are views over one [`Projection`], so they never
//! disagree about a slot's status.
//!
//! # Example
//!
//! ```rust,ignore
//! use ldex_projector::{CollectionProjector, PageRequest, ProjectorConfig};
//!
//! # async fn example(store: ldex_store::StoreHandle) -> Result<(), ldex_projector::ProjectionError> {
//! let projector = CollectionProjector::new(store, ProjectorConfig::new());
//! let first_box = projector.box_view(collection_id, user_id, 1).await?;
//! println!("{} of {} boxes", first_box.box_number, first_box.total_boxes);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod bulk;
pub mod config;
pub mod error;
pub mod facade;
pub mod merger;
pub mod placer;
pub mod projector;
pub mod report;
pub mod resolver;
pub mod stats;

// Re-exports for convenience
pub use bulk::{BulkAction, BulkFailure, BulkOutcome};
pub use config::ProjectorConfig;
pub use error::ProjectionError;
pub use facade::{BoxView, EntryFilter, GridView, Page, PageRequest, Projection, TrackedEntry};
pub use merger::StatusLookup;
pub use placer::{Layout, PlacedEntry};
pub use projector::CollectionProjector;
pub use report::{IntegrityIssue, ProjectionReport};
pub use resolver::{Resolution, SequencedEntry};
pub use stats::CollectionStats;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the projector
    pub use crate::{
        BoxView, BulkAction, BulkOutcome, CollectionProjector, CollectionStats, EntryFilter,
        GridView, Page, PageRequest, Projection, ProjectorConfig, TrackedEntry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
