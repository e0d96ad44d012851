//! Testing utilities for the Living Dex workspace
//!
//! Shared catalogs, a ready store and projector, and ledger helpers.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use ldex_model::{
    CatchStatus, Collection, CollectionId, Entry, EntryId, RegionalDex, StatusPatch, Universe,
    UserId,
};
use ldex_projector::{CollectionProjector, ProjectorConfig};
use ldex_store::{CatchLedger, CollectionDirectory, MemoryStore, StoreHandle};
use std::sync::Arc;

/// National number of the fixture's best-known entry
pub const PIKACHU: u32 = 25;

const NAMED: [(u32, &str); 9] = [
    (1, "Bulbasaur"),
    (4, "Charmander"),
    (7, "Squirtle"),
    (19, "Rattata"),
    (25, "Pikachu"),
    (26, "Raichu"),
    (37, "Vulpix"),
    (152, "Chikorita"),
    (172, "Pichu"),
];

/// Species name used for a national number
pub fn species_name(national: u32) -> String {
    NAMED
        .iter()
        .find(|(n, _)| *n == national)
        .map_or_else(|| format!("Species {national:04}"), |(_, name)| (*name).to_string())
}

/// Default-form entries `1..=n`, entry id equal to national number
///
/// Entries up to 151 are caught in kanto, the rest in johto.
pub fn national_catalog(n: u32) -> Vec<Entry> {
    (1..=n)
        .map(|national| {
            let (region, games) = if national <= 151 {
                ("kanto", vec!["red".to_string(), "blue".to_string()])
            } else {
                ("johto", vec!["gold".to_string(), "silver".to_string()])
            };
            Entry::new(national, national, species_name(national)).with_catch_info(region, games)
        })
        .collect()
}

/// `national_catalog(40)` plus Alolan forms of 19, 26 and 37 (ids 1000 + national)
pub fn variants_catalog() -> Vec<Entry> {
    let mut entries = national_catalog(40);
    for national in [19, 26, 37] {
        entries.push(
            Entry::new(1000 + national, national, species_name(national))
                .with_variant("Alolan")
                .with_catch_info("alola", vec!["sun".to_string(), "moon".to_string()]),
        );
    }
    entries
}

/// `national_catalog(200)` with kanto numbers on 1..=151 and a short johto dex
///
/// Johto: Chikorita 1, Pichu 21, Pikachu 22, Bulbasaur 226.
pub fn regional_catalog() -> Vec<Entry> {
    national_catalog(200)
        .into_iter()
        .map(|entry| {
            let national = entry.national_number;
            let entry = if national <= 151 {
                entry.with_regional_sequence("kanto", national)
            } else {
                entry
            };
            match national {
                152 => entry.with_regional_sequence("johto", 1),
                172 => entry.with_regional_sequence("johto", 21),
                25 => entry.with_regional_sequence("johto", 22),
                1 => entry.with_regional_sequence("johto", 226),
                _ => entry,
            }
        })
        .collect()
}

/// Directory entries for the regional fixture
pub fn regional_dexes() -> Vec<RegionalDex> {
    vec![
        RegionalDex {
            id: 1,
            name: "kanto".to_string(),
            display_name: "Kanto".to_string(),
            region: Some("kanto".to_string()),
            generation: Some("generation-i".to_string()),
            games: vec!["red".to_string(), "blue".to_string()],
            total_entries: Some(151),
        },
        RegionalDex {
            id: 2,
            name: "johto".to_string(),
            display_name: "Johto".to_string(),
            region: Some("johto".to_string()),
            generation: Some("generation-ii".to_string()),
            games: vec!["gold".to_string(), "silver".to_string()],
            total_entries: Some(251),
        },
    ]
}

/// Ids `from..=to`
pub fn ids(from: u32, to: u32) -> Vec<EntryId> {
    (from..=to).map(EntryId).collect()
}

/// A memory store, a projector over it and one user
#[derive(Debug, Clone)]
pub struct TestBed {
    pub store: Arc<MemoryStore>,
    pub projector: CollectionProjector,
    pub user: UserId,
}

impl TestBed {
    /// Test bed with default config
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::with_config(entries, ProjectorConfig::new())
    }

    /// Test bed with a custom config
    pub fn with_config(entries: Vec<Entry>, config: ProjectorConfig) -> Self {
        let store = Arc::new(
            MemoryStore::with_catalog(entries, regional_dexes()).expect("fixture catalog is valid"),
        );
        let projector = CollectionProjector::new(StoreHandle::from_backend(store.clone()), config);
        Self {
            store,
            projector,
            user: UserId::new(),
        }
    }

    /// Create a collection for the bed's user
    pub async fn collection(&self, universe: Universe) -> CollectionId {
        let collection = Collection::new(self.user, "Living Dex", universe).expect("valid name");
        self.store
            .create(collection)
            .await
            .expect("collection created")
            .id
    }

    /// Write `status` rows directly to the ledger
    pub async fn mark(&self, collection: CollectionId, entries: &[EntryId], status: CatchStatus) {
        let patch = StatusPatch::status(status);
        for &entry in entries {
            self.store
                .upsert_status(collection, self.user, entry, &patch)
                .await
                .expect("ledger write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pikachu_is_twenty_five() {
        let catalog = national_catalog(65);
        assert_eq!(catalog.len(), 65);
        assert_eq!(catalog[24].species, "Pikachu");
        assert_eq!(catalog[24].id, EntryId(PIKACHU));
    }

    #[test]
    fn regional_fixture_numbers() {
        let johto = Universe::regional("johto").select(regional_catalog());
        let numbers: Vec<u32> = johto
            .iter()
            .filter_map(|e| e.regional_sequence("johto"))
            .collect();
        assert_eq!(numbers, vec![1, 21, 22, 226]);
    }
}
