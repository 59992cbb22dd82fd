// crates/lapboard-core/src/runtime/validation.rs
// ============================================================================
// Module: Lapboard Submission Validation
// Description: Shape and range checks for score submissions.
// Purpose: Reject malformed submissions before they reach a store.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Validation is purely structural: non-empty trimmed text, bounded length,
//! no control characters, and a non-negative chrono by default. It does not
//! judge whether a time is plausible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ScoreSubmission;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum player name length in characters.
pub const DEFAULT_MAX_PLAYER_NAME_CHARS: usize = 64;
/// Default maximum player/track identifier length in characters.
pub const DEFAULT_MAX_IDENTIFIER_CHARS: usize = 128;

/// Limits applied to incoming submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Maximum player name length in characters.
    #[serde(default = "default_max_player_name_chars")]
    pub max_player_name_chars: usize,
    /// Maximum player and track identifier length in characters.
    #[serde(default = "default_max_identifier_chars")]
    pub max_identifier_chars: usize,
    /// Accept negative chrono values.
    #[serde(default)]
    pub allow_negative_chrono: bool,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_player_name_chars: DEFAULT_MAX_PLAYER_NAME_CHARS,
            max_identifier_chars: DEFAULT_MAX_IDENTIFIER_CHARS,
            allow_negative_chrono: false,
        }
    }
}

/// Returns the default player name limit.
const fn default_max_player_name_chars() -> usize {
    DEFAULT_MAX_PLAYER_NAME_CHARS
}

/// Returns the default identifier limit.
const fn default_max_identifier_chars() -> usize {
    DEFAULT_MAX_IDENTIFIER_CHARS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Submission rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    /// Builds a validation error for a field.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a submission against the configured limits.
///
/// # Errors
///
/// Returns [`ValidationError`] for the first field that violates a limit.
pub fn validate_submission(
    submission: &ScoreSubmission,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    validate_text("playerName", &submission.player_name, limits.max_player_name_chars)?;
    validate_text("playerId", submission.player_id.as_str(), limits.max_identifier_chars)?;
    validate_text("trackId", submission.track_id.as_str(), limits.max_identifier_chars)?;
    if submission.chrono < 0 && !limits.allow_negative_chrono {
        return Err(ValidationError::new("chrono", "must be non-negative"));
    }
    Ok(())
}

/// Validates a single text field.
fn validate_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must be non-empty"));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(field, format!("exceeds {max_chars} characters")));
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(field, "must not contain control characters"));
    }
    Ok(())
}
