// crates/lapboard-core/src/core/identifiers.rs
// ============================================================================
// Module: Lapboard Identifiers
// Description: Opaque identifiers for scores, players, and tracks.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! Identifiers are opaque and serialize as plain strings. Player and track
//! identifiers come from clients and are checked by submission validation, not
//! by these wrappers. Score identifiers are minted by the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Unique identifier of a stored score record.
///
/// # Invariants
/// - Generated once at insert time and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreId(String);

impl ScoreId {
    /// Creates a score identifier from an existing string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random (UUID v4) score identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client-supplied player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new player identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Client-supplied track identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Creates a new track identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
