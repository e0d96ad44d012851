//! Catalog types
//!
//! Read-only reference data populated by an offline import: one [`Entry`] per
//! species/form combination, plus the directory of regional dexes.

use crate::grid::BoxPlacement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable catalog entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Whether non-default forms take part in a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantMode {
    /// Default forms only
    DefaultOnly,
    /// Every form
    IncludeVariants,
}

impl VariantMode {
    /// Mode for an `include_variants` flag
    #[inline]
    #[must_use]
    pub fn from_flag(include_variants: bool) -> Self {
        if include_variants {
            Self::IncludeVariants
        } else {
            Self::DefaultOnly
        }
    }
}

/// One species/form record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identity
    pub id: EntryId,
    /// National dex number (shared by all forms of a species)
    pub national_number: u32,
    /// Species name
    pub species: String,
    /// Non-default form label, `None` for the default form
    #[serde(default)]
    pub variant: Option<String>,
    /// Informational only
    #[serde(default)]
    pub supports_gigantamax: bool,
    /// Fixed slot in the default-forms view
    #[serde(default)]
    pub placement: Option<BoxPlacement>,
    /// Fixed slot in the all-forms view
    #[serde(default)]
    pub placement_with_variants: Option<BoxPlacement>,
    /// Position inside each regional dex this entry belongs to
    #[serde(default)]
    pub regional_sequences: BTreeMap<String, u32>,
    /// Region the entry is caught in
    #[serde(default)]
    pub catch_region: Option<String>,
    /// Games the entry is obtainable in
    #[serde(default)]
    pub catch_games: Vec<String>,
}

impl Entry {
    /// Create a default-form entry with no placements or regional numbers
    #[must_use]
    pub fn new(id: u32, national_number: u32, species: impl Into<String>) -> Self {
        Self {
            id: EntryId(id),
            national_number,
            species: species.into(),
            variant: None,
            supports_gigantamax: false,
            placement: None,
            placement_with_variants: None,
            regional_sequences: BTreeMap::new(),
            catch_region: None,
            catch_games: Vec::new(),
        }
    }

    /// With a form label
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// With a position in a regional dex
    #[must_use]
    pub fn with_regional_sequence(mut self, region: impl Into<String>, sequence: u32) -> Self {
        self.regional_sequences.insert(region.into(), sequence);
        self
    }

    /// With a precomputed slot for the given mode
    #[must_use]
    pub fn with_placement(mut self, mode: VariantMode, placement: BoxPlacement) -> Self {
        match mode {
            VariantMode::DefaultOnly => self.placement = Some(placement),
            VariantMode::IncludeVariants => self.placement_with_variants = Some(placement),
        }
        self
    }

    /// With catch region and games
    #[must_use]
    pub fn with_catch_info(mut self, region: impl Into<String>, games: Vec<String>) -> Self {
        self.catch_region = Some(region.into());
        self.catch_games = games;
        self
    }

    /// Whether this is the species' default form
    #[inline]
    #[must_use]
    pub fn is_default_variant(&self) -> bool {
        self.variant.is_none()
    }

    /// Position in the named regional dex, if the entry belongs to it
    #[inline]
    #[must_use]
    pub fn regional_sequence(&self, region: &str) -> Option<u32> {
        self.regional_sequences.get(region).copied()
    }

    /// Precomputed slot for a variant mode
    #[inline]
    #[must_use]
    pub fn precomputed_placement(&self, mode: VariantMode) -> Option<BoxPlacement> {
        match mode {
            VariantMode::DefaultOnly => self.placement,
            VariantMode::IncludeVariants => self.placement_with_variants,
        }
    }

    /// Species name, with the form in parentheses for variants
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{} ({variant})", self.species),
            None => self.species.clone(),
        }
    }

    /// Whether the entry can be caught in `game`
    #[must_use]
    pub fn obtainable_in(&self, game: &str) -> bool {
        self.catch_games.iter().any(|g| g.eq_ignore_ascii_case(game))
    }
}

/// The entry set a collection draws from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Universe {
    /// Every species ordered by national number
    National {
        /// Whether non-default forms are included
        include_variants: bool,
    },
    /// Entries of one regional dex, ordered by their regional number
    Regional {
        /// Regional dex name (e.g. `"paldea"`)
        region: String,
    },
}

impl Universe {
    /// National dex, default forms only
    #[inline]
    #[must_use]
    pub fn national() -> Self {
        Self::National {
            include_variants: false,
        }
    }

    /// National dex with every form
    #[inline]
    #[must_use]
    pub fn national_with_variants() -> Self {
        Self::National {
            include_variants: true,
        }
    }

    /// Regional dex by name
    #[inline]
    #[must_use]
    pub fn regional(region: impl Into<String>) -> Self {
        Self::Regional {
            region: region.into(),
        }
    }

    /// Variant mode whose precomputed placements apply to this universe
    ///
    /// Regional universes are laid out from their regional numbers, so no
    /// precomputed table applies to them.
    #[inline]
    #[must_use]
    pub fn placement_mode(&self) -> Option<VariantMode> {
        match self {
            Self::National { include_variants } => Some(VariantMode::from_flag(*include_variants)),
            Self::Regional { .. } => None,
        }
    }

    /// Whether `entry` belongs to this universe
    #[must_use]
    pub fn admits(&self, entry: &Entry) -> bool {
        match self {
            Self::National {
                include_variants: true,
            } => true,
            Self::National {
                include_variants: false,
            } => entry.is_default_variant(),
            Self::Regional { region } => entry.regional_sequence(region).is_some(),
        }
    }

    /// Members of this universe in display order
    ///
    /// National: by national number, default form first, then forms
    /// alphabetically. Regional: by regional number. Ties fall back to the
    /// entry id so the order is total.
    #[must_use]
    pub fn select(&self, entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
        let mut selected: Vec<Entry> = entries.into_iter().filter(|e| self.admits(e)).collect();

        match self {
            Self::National { .. } => selected.sort_by(|a, b| {
                a.national_number
                    .cmp(&b.national_number)
                    .then_with(|| a.variant.cmp(&b.variant))
                    .then(a.id.cmp(&b.id))
            }),
            Self::Regional { region } => {
                selected.sort_by_key(|e| (e.regional_sequence(region), e.id));
            }
        }

        selected
    }
}

impl std::fmt::Display for Universe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::National {
                include_variants: true,
            } => write!(f, "national (all forms)"),
            Self::National {
                include_variants: false,
            } => write!(f, "national"),
            Self::Regional { region } => write!(f, "regional:{region}"),
        }
    }
}

/// Directory entry describing one regional dex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalDex {
    /// Directory order
    pub id: u32,
    /// Key used in [`Entry::regional_sequences`]
    pub name: String,
    /// Human-readable title
    pub display_name: String,
    /// Region the dex belongs to
    #[serde(default)]
    pub region: Option<String>,
    /// Generation label (e.g. `"gen9"`)
    #[serde(default)]
    pub generation: Option<String>,
    /// Games using this dex
    #[serde(default)]
    pub games: Vec<String>,
    /// Advertised size of the dex
    #[serde(default)]
    pub total_entries: Option<u32>,
}
