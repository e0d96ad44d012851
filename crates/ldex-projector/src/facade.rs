//! Read views over one merged projection
//!
//! A [`Projection`] is built once per request; [`Page`], [`GridView`] and
//! [`BoxView`] only slice it. Paged mode lists the occupied slots in slot
//! order, so concatenating every unfiltered page gives exactly the non-null
//! cells of the grid.

use crate::error::ProjectionError;
use crate::placer::PlacedEntry;
use crate::report::ProjectionReport;
use ldex_model::{
    BoxPlacement, CatchStatus, CatchStatusRecord, CollectionId, Entry, Universe, UserId,
    BOX_CAPACITY,
};
use serde::{Deserialize, Serialize};

/// One occupied slot with its merged catch status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedEntry {
    /// Catalog entry
    pub entry: Entry,
    /// Position in the universe's ordering
    pub sequence: u32,
    /// Slot on the grid
    pub placement: BoxPlacement,
    /// Stored ledger row, or an implicit `not_caught` one
    pub record: CatchStatusRecord,
}

impl TrackedEntry {
    /// Attach a ledger row to a placed entry
    #[must_use]
    pub fn new(placed: PlacedEntry, record: CatchStatusRecord) -> Self {
        Self {
            entry: placed.entry,
            sequence: placed.sequence,
            placement: placed.placement,
            record,
        }
    }

    /// Merged catch status
    #[inline]
    #[must_use]
    pub fn status(&self) -> CatchStatus {
        self.record.status
    }

    /// Whether a ledger row backs this slot
    #[inline]
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.record.is_stored()
    }
}

/// Paged-mode filter, applied before slicing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    /// Case-insensitive substring of the display name
    pub name: Option<String>,
    /// Exact status
    pub status: Option<CatchStatus>,
    /// Region the entry is caught in
    pub catch_region: Option<String>,
    /// Game the entry is obtainable in
    pub game: Option<String>,
}

impl EntryFilter {
    /// Filter admitting everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a name substring
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require an exact status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: CatchStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Require a catch region
    #[inline]
    #[must_use]
    pub fn with_catch_region(mut self, region: impl Into<String>) -> Self {
        self.catch_region = Some(region.into());
        self
    }

    /// Require availability in a game
    #[inline]
    #[must_use]
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    /// No criteria set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.catch_region.is_none()
            && self.game.is_none()
    }

    /// Whether `tracked` passes every set criterion
    #[must_use]
    pub fn matches(&self, tracked: &TrackedEntry) -> bool {
        if let Some(needle) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            let haystack = tracked.entry.display_name().to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.status.is_some_and(|status| tracked.status() != status) {
            return false;
        }
        if let Some(region) = &self.catch_region {
            let same = tracked
                .entry
                .catch_region
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(region));
            if !same {
                return false;
            }
        }
        if let Some(game) = &self.game {
            if !tracked.entry.obtainable_in(game) {
                return false;
            }
        }
        true
    }
}

/// Paged-mode request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page; `None` uses the configured default
    pub page_size: Option<u32>,
    /// Criteria applied before paging
    #[serde(default)]
    pub filter: EntryFilter,
}

impl PageRequest {
    /// Unfiltered request for `page` at the default size
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self {
            page,
            page_size: None,
            filter: EntryFilter::default(),
        }
    }

    /// Override the page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the filter
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of the filtered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Entries on this page, in slot order
    pub items: Vec<TrackedEntry>,
    /// 1-based page number
    pub page: u32,
    /// Effective page size after clamping
    pub page_size: u32,
    /// Entries passing the filter, over all pages
    pub total_items: usize,
    /// Pages needed for `total_items`
    pub total_pages: u32,
}

/// Every slot of the universe, nulls included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    /// `total_pages * 30` slots
    pub slots: Vec<Option<TrackedEntry>>,
    /// Number of boxes
    pub total_pages: u32,
}

/// The 30 slots of one box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxView {
    /// 1-based box number
    pub box_number: u32,
    /// Exactly 30 slots, row by row
    pub slots: Vec<Option<TrackedEntry>>,
    /// Number of boxes in the grid
    pub total_boxes: u32,
}

impl BoxView {
    /// Occupied slots
    pub fn entries(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.slots.iter().flatten()
    }
}

/// A collection's universe, placed and merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Projected collection
    pub collection_id: CollectionId,
    /// Caller whose ledger rows were merged
    pub user_id: UserId,
    /// `None` when the collection was not found for this user
    pub universe: Option<Universe>,
    /// Merged grid, `total_pages * 30` slots
    pub slots: Vec<Option<TrackedEntry>>,
    /// Number of boxes
    pub total_pages: u32,
    /// Integrity findings from resolving and placing
    pub report: ProjectionReport,
}

impl Projection {
    /// Projection of a collection the caller cannot see
    #[must_use]
    pub fn empty(collection_id: CollectionId, user_id: UserId) -> Self {
        Self {
            collection_id,
            user_id,
            universe: None,
            slots: Vec::new(),
            total_pages: 0,
            report: ProjectionReport::default(),
        }
    }

    /// Occupied slots in slot order
    pub fn entries(&self) -> impl Iterator<Item = &TrackedEntry> {
        self.slots.iter().flatten()
    }

    /// Slice the filtered entry list
    ///
    /// `page_size` must already be resolved against the configured bounds.
    /// A page past the end is empty, not an error.
    ///
    /// # Errors
    /// `InvalidPageRequest` when `page` or `page_size` is zero.
    pub fn page(&self, page: u32, page_size: u32, filter: &EntryFilter) -> Result<Page, ProjectionError> {
        if page == 0 || page_size == 0 {
            return Err(ProjectionError::InvalidPageRequest { page, page_size });
        }

        let matching: Vec<&TrackedEntry> =
            self.entries().filter(|tracked| filter.matches(tracked)).collect();
        let total_items = matching.len();
        let size = page_size as usize;
        let total_pages = u32::try_from(total_items.div_ceil(size)).unwrap_or(u32::MAX);

        let start = (page as usize - 1).saturating_mul(size);
        let items = matching
            .into_iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect();

        Ok(Page {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        })
    }

    /// The full null-padded grid
    #[must_use]
    pub fn grid(&self) -> GridView {
        GridView {
            slots: self.slots.clone(),
            total_pages: self.total_pages,
        }
    }

    /// One box; box 1 of an empty universe is 30 empty slots
    ///
    /// # Errors
    /// `UnknownBox` for box 0 or a box past the last one.
    pub fn box_view(&self, box_number: u32) -> Result<BoxView, ProjectionError> {
        if box_number == 0 || box_number > self.total_pages.max(1) {
            return Err(ProjectionError::UnknownBox {
                box_number,
                total_boxes: self.total_pages,
            });
        }

        let capacity = BOX_CAPACITY as usize;
        let start = (box_number as usize - 1) * capacity;
        let mut slots: Vec<Option<TrackedEntry>> = self
            .slots
            .iter()
            .skip(start)
            .take(capacity)
            .cloned()
            .collect();
        slots.resize(capacity, None);

        Ok(BoxView {
            box_number,
            slots,
            total_boxes: self.total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldex_model::{CatchStatusRecord, EntryId};

    fn tracked(id: u32, species: &str, status: CatchStatus) -> TrackedEntry {
        let placement = BoxPlacement::from_sequence(id).unwrap();
        let mut record = CatchStatusRecord::implicit(CollectionId::new(), UserId::new(), EntryId(id));
        record.status = status;
        TrackedEntry {
            entry: Entry::new(id, id, species),
            sequence: id,
            placement,
            record,
        }
    }

    fn projection(n: u32) -> Projection {
        let mut slots: Vec<Option<TrackedEntry>> = (1..=n)
            .map(|i| {
                let status = if i % 3 == 0 { CatchStatus::Caught } else { CatchStatus::NotCaught };
                Some(tracked(i, &format!("Species {i}"), status))
            })
            .collect();
        let pages = ldex_model::total_pages(n as usize);
        slots.resize(ldex_model::grid_len(pages), None);
        Projection {
            universe: Some(Universe::national()),
            slots,
            total_pages: pages,
            ..Projection::empty(CollectionId::new(), UserId::new())
        }
    }

    #[test]
    fn page_slices_after_filtering() {
        let projection = projection(65);
        let filter = EntryFilter::new().with_status(CatchStatus::Caught);

        let page = projection.page(2, 10, &filter).unwrap();
        assert_eq!(page.total_items, 21);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<u32> = page.items.iter().map(|t| t.entry.id.0).collect();
        assert_eq!(ids, (11..=20).map(|i| i * 3).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = projection(5).page(3, 10, &EntryFilter::default()).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn zero_page_is_rejected() {
        let err = projection(5).page(0, 10, &EntryFilter::default()).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidPageRequest { page: 0, .. }));
    }

    #[test]
    fn name_filter_ignores_case() {
        let mut projection = projection(3);
        projection.slots[1] = Some(tracked(2, "Pikachu", CatchStatus::NotCaught));

        let page = projection.page(1, 20, &EntryFilter::new().with_name("pIKA")).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].entry.species, "Pikachu");
    }

    #[test]
    fn last_box_is_padded() {
        let projection = projection(65);
        let third = projection.box_view(3).unwrap();
        assert_eq!(third.slots.len(), 30);
        assert_eq!(third.entries().count(), 5);
        assert_eq!(third.total_boxes, 3);
        assert!(projection.box_view(4).is_err());
        assert!(projection.box_view(0).is_err());
    }

    #[test]
    fn empty_universe_has_one_blank_box() {
        let projection = Projection::empty(CollectionId::new(), UserId::new());
        let first = projection.box_view(1).unwrap();
        assert_eq!(first.slots, vec![None; 30]);
        assert_eq!(first.total_boxes, 0);
        assert!(projection.grid().slots.is_empty());
    }
}
