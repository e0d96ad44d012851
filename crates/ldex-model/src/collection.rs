//! Collections: a user's named view over one universe

use crate::catalog::Universe;
use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub Uuid);

impl CollectionId {
    /// Generate new collection ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owning user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate new user ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, user-owned tracking view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Identity
    pub id: CollectionId,
    /// Owner
    pub owner: UserId,
    /// Display name
    pub name: String,
    /// Entry set tracked by this collection
    pub universe: Universe,
    /// Tracking shiny specimens
    #[serde(default)]
    pub shiny_hunt: bool,
    /// Catches must come from the entry's origin game
    #[serde(default)]
    pub requires_origin: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Create a collection owned by `owner`
    ///
    /// # Errors
    /// Returns `ModelError::InvalidCollectionName` for a blank name.
    pub fn new(owner: UserId, name: &str, universe: Universe) -> Result<Self, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::InvalidCollectionName);
        }

        let now = Utc::now();
        Ok(Self {
            id: CollectionId::new(),
            owner,
            name: name.to_string(),
            universe,
            shiny_hunt: false,
            requires_origin: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Mark as a shiny hunt
    #[inline]
    #[must_use]
    pub fn shiny(mut self) -> Self {
        self.shiny_hunt = true;
        self
    }

    /// Require origin-game catches
    #[inline]
    #[must_use]
    pub fn with_origin_required(mut self) -> Self {
        self.requires_origin = true;
        self
    }

    /// Whether `user` owns this collection
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }
}
