// crates/lapboard-core/src/core/record.rs
// ============================================================================
// Module: Lapboard Score Records
// Description: Score submissions, stored records, and read filters.
// Purpose: Define the canonical leaderboard data model and wire shape.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ScoreSubmission`] is what a client sends; a [`ScoreRecord`] is what the
//! store keeps and returns after assigning an identifier and creation time.
//! Records are immutable once stored. Wire keys are camelCase.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PlayerId;
use crate::core::identifiers::ScoreId;
use crate::core::identifiers::TrackId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum number of retained score records.
pub const DEFAULT_MAX_RECORDS: u64 = 5_000;
/// Maximum number of records returned by a leaderboard query.
pub const MAX_QUERY_RESULTS: usize = 100;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Client-supplied score payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    /// Display name of the player.
    pub player_name: String,
    /// Opaque player identifier.
    pub player_id: PlayerId,
    /// Elapsed time for the run; lower is better.
    pub chrono: i64,
    /// Opaque track identifier.
    pub track_id: TrackId,
}

/// Stored score record.
///
/// # Invariants
/// - `id` is unique across the lifetime of the store.
/// - Fields never change after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Store-assigned identifier.
    pub id: ScoreId,
    /// Display name of the player.
    pub player_name: String,
    /// Opaque player identifier.
    pub player_id: PlayerId,
    /// Elapsed time for the run; lower is better.
    pub chrono: i64,
    /// Opaque track identifier.
    pub track_id: TrackId,
    /// Store-assigned creation time.
    pub created_at: Timestamp,
}

impl ScoreRecord {
    /// Builds a record from a submission plus store-assigned metadata.
    #[must_use]
    pub fn from_submission(
        id: ScoreId,
        submission: &ScoreSubmission,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            player_name: submission.player_name.clone(),
            player_id: submission.player_id.clone(),
            chrono: submission.chrono,
            track_id: submission.track_id.clone(),
            created_at,
        }
    }
}

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Exact-match filter for leaderboard reads.
///
/// # Invariants
/// - `None` fields match every record; present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    /// Restrict results to a single track.
    pub track_id: Option<TrackId>,
    /// Restrict results to a single player.
    pub player_id: Option<PlayerId>,
}

impl ScoreFilter {
    /// Filter matching every record.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            track_id: None,
            player_id: None,
        }
    }

    /// Restricts the filter to a track.
    #[must_use]
    pub fn with_track(mut self, track_id: impl Into<TrackId>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    /// Restricts the filter to a player.
    #[must_use]
    pub fn with_player(mut self, player_id: impl Into<PlayerId>) -> Self {
        self.player_id = Some(player_id.into());
        self
    }

    /// Returns true when the record satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, record: &ScoreRecord) -> bool {
        self.track_id.as_ref().is_none_or(|track| *track == record.track_id)
            && self.player_id.as_ref().is_none_or(|player| *player == record.player_id)
    }
}
