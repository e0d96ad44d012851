//! Catch ledger rows
//!
//! One [`CatchStatusRecord`] per (collection, entry). Missing rows read as
//! not caught; they are only synthesized in memory, never written.

use crate::catalog::EntryId;
use crate::collection::{CollectionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catch progress of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchStatus {
    /// Not caught yet
    #[default]
    NotCaught,
    /// Caught
    Caught,
    /// Caught, evolution still pending
    ReadyToEvolve,
}

impl CatchStatus {
    /// Whether a specimen is held (pending evolutions count)
    #[inline]
    #[must_use]
    pub fn is_caught(self) -> bool {
        matches!(self, Self::Caught | Self::ReadyToEvolve)
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotCaught => "not_caught",
            Self::Caught => "caught",
            Self::ReadyToEvolve => "ready_to_evolve",
        }
    }
}

impl std::str::FromStr for CatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_caught" => Ok(Self::NotCaught),
            "caught" => Ok(Self::Caught),
            "ready_to_evolve" => Ok(Self::ReadyToEvolve),
            other => Err(format!("unknown catch status: {other}")),
        }
    }
}

impl std::fmt::Display for CatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the caught specimen is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchLocation {
    /// Nowhere recorded
    #[default]
    None,
    /// In a game save
    InGame,
    /// In cloud storage
    InHome,
}

/// Ledger row for one (collection, entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchStatusRecord {
    /// Owning collection
    pub collection_id: CollectionId,
    /// Owning user
    pub user_id: UserId,
    /// Catalog entry
    pub entry_id: EntryId,
    /// Progress
    #[serde(default)]
    pub status: CatchStatus,
    /// Storage location
    #[serde(default)]
    pub location: CatchLocation,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Region the specimen originates from
    #[serde(default)]
    pub origin_region: Option<String>,
    /// Game the specimen was caught in
    #[serde(default)]
    pub origin_game: Option<String>,
    /// Obtained as a special/rare variant
    #[serde(default)]
    pub special_variant: bool,
    /// Creation time, `None` for implicit rows
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last change, `None` for implicit rows
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatchStatusRecord {
    /// Implicit row for an entry with nothing stored
    #[must_use]
    pub fn implicit(collection_id: CollectionId, user_id: UserId, entry_id: EntryId) -> Self {
        Self {
            collection_id,
            user_id,
            entry_id,
            status: CatchStatus::NotCaught,
            location: CatchLocation::None,
            notes: None,
            origin_region: None,
            origin_game: None,
            special_variant: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the row exists in storage
    #[inline]
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.created_at.is_some()
    }

    /// Apply a patch, returning whether any field changed
    pub fn apply(&mut self, patch: &StatusPatch) -> bool {
        let before = (
            self.status,
            self.location,
            self.notes.clone(),
            self.origin_region.clone(),
            self.origin_game.clone(),
            self.special_variant,
        );

        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(notes) = &patch.notes {
            self.notes.clone_from(notes);
        }
        if let Some(region) = &patch.origin_region {
            self.origin_region.clone_from(region);
        }
        if let Some(game) = &patch.origin_game {
            self.origin_game.clone_from(game);
        }
        if let Some(special) = patch.special_variant {
            self.special_variant = special;
        }

        before
            != (
                self.status,
                self.location,
                self.notes.clone(),
                self.origin_region.clone(),
                self.origin_game.clone(),
                self.special_variant,
            )
    }
}

/// Present-but-null fields read as `Some(None)`; absent ones fall back to
/// the field default.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Field changes for an upsert; `None` leaves the stored value alone
///
/// The nested options distinguish "keep" (`None`) from "clear"
/// (`Some(None)`). On the wire a missing field keeps and an explicit
/// `null` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    /// New progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CatchStatus>,
    /// New storage location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<CatchLocation>,
    /// New notes
    #[serde(
        default,
        deserialize_with = "double_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    /// New origin region
    #[serde(
        default,
        deserialize_with = "double_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_region: Option<Option<String>>,
    /// New origin game
    #[serde(
        default,
        deserialize_with = "double_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_game: Option<Option<String>>,
    /// New special-variant flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_variant: Option<bool>,
}

impl StatusPatch {
    /// Patch touching only the status
    #[inline]
    #[must_use]
    pub fn status(status: CatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Also set the storage location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: CatchLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Also set the notes
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    /// Whether the patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> CatchStatusRecord {
        CatchStatusRecord::implicit(CollectionId::new(), UserId::new(), EntryId(1))
    }

    #[test]
    fn implicit_row_is_not_caught() {
        let record = blank();
        assert_eq!(record.status, CatchStatus::NotCaught);
        assert_eq!(record.location, CatchLocation::None);
        assert!(record.notes.is_none());
        assert!(!record.is_stored());
    }

    #[test]
    fn status_patch_keeps_other_fields() {
        let mut record = blank();
        record.location = CatchLocation::InHome;
        record.notes = Some("from a trade".to_string());

        let changed = record.apply(&StatusPatch::status(CatchStatus::Caught));
        assert!(changed);
        assert_eq!(record.status, CatchStatus::Caught);
        assert_eq!(record.location, CatchLocation::InHome);
        assert_eq!(record.notes.as_deref(), Some("from a trade"));
    }

    #[test]
    fn reapplying_patch_is_a_no_op() {
        let mut record = blank();
        let patch = StatusPatch::status(CatchStatus::ReadyToEvolve).with_notes("needs a stone");
        assert!(record.apply(&patch));
        assert!(!record.apply(&patch));
    }

    #[test]
    fn clearing_notes() {
        let mut record = blank();
        record.apply(&StatusPatch::default().with_notes("x"));
        let clear = StatusPatch {
            notes: Some(None),
            ..StatusPatch::default()
        };
        record.apply(&clear);
        assert!(record.notes.is_none());
    }

    #[test]
    fn json_null_clears_and_absent_keeps() {
        let clear: StatusPatch =
            serde_json::from_str(r#"{"notes": null, "origin_game": null}"#).unwrap();
        assert_eq!(clear.notes, Some(None));
        assert_eq!(clear.origin_game, Some(None));
        assert_eq!(clear.origin_region, None);

        let mut record = blank();
        record.notes = Some("from a trade".to_string());
        record.origin_game = Some("Crystal".to_string());
        record.origin_region = Some("Johto".to_string());
        assert!(record.apply(&clear));
        assert!(record.notes.is_none());
        assert!(record.origin_game.is_none());
        assert_eq!(record.origin_region.as_deref(), Some("Johto"));

        let keep: StatusPatch = serde_json::from_str(r#"{"status": "caught"}"#).unwrap();
        assert_eq!(keep, StatusPatch::status(CatchStatus::Caught));
    }

    #[test]
    fn patch_wire_form_survives_a_round_trip() {
        let clear = StatusPatch {
            notes: Some(None),
            ..StatusPatch::default()
        };
        let text = serde_json::to_string(&clear).unwrap();
        assert_eq!(text, r#"{"notes":null}"#);
        assert_eq!(serde_json::from_str::<StatusPatch>(&text).unwrap(), clear);
    }

    #[test]
    fn ready_to_evolve_counts_as_caught() {
        assert!(CatchStatus::ReadyToEvolve.is_caught());
        assert!(CatchStatus::Caught.is_caught());
        assert!(!CatchStatus::NotCaught.is_caught());
        assert_eq!("ready_to_evolve".parse::<CatchStatus>(), Ok(CatchStatus::ReadyToEvolve));
    }
}
