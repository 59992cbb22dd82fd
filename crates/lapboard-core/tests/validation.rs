// crates/lapboard-core/tests/validation.rs
// ============================================================================
// Module: Submission Validation Tests
// Description: Boundary checks for score submission validation.
// Purpose: Ensure malformed submissions are rejected with the right field.
// Dependencies: lapboard-core, serde_json
// ============================================================================

//! ## Overview
//! Covers empty, overlong, and control-character text plus chrono sign rules,
//! and the camelCase wire shape of submissions and records.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use lapboard_core::PlayerId;
use lapboard_core::ScoreId;
use lapboard_core::ScoreRecord;
use lapboard_core::ScoreSubmission;
use lapboard_core::Timestamp;
use lapboard_core::TrackId;
use lapboard_core::ValidationLimits;
use lapboard_core::validate_submission;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn valid() -> ScoreSubmission {
    ScoreSubmission {
        player_name: "Jim".to_string(),
        player_id: PlayerId::new("jim-01"),
        chrono: 61_234,
        track_id: TrackId::new("monaco"),
    }
}

fn rejected_field(submission: &ScoreSubmission, limits: &ValidationLimits) -> &'static str {
    validate_submission(submission, limits).unwrap_err().field
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn accepts_well_formed_submission() {
    assert!(validate_submission(&valid(), &ValidationLimits::default()).is_ok());
}

#[test]
fn rejects_blank_fields() {
    let limits = ValidationLimits::default();
    let mut submission = valid();
    submission.player_name = " \t ".to_string();
    assert_eq!(rejected_field(&submission, &limits), "playerName");

    let mut submission = valid();
    submission.player_id = PlayerId::new("");
    assert_eq!(rejected_field(&submission, &limits), "playerId");

    let mut submission = valid();
    submission.track_id = TrackId::new("");
    assert_eq!(rejected_field(&submission, &limits), "trackId");
}

#[test]
fn length_limit_counts_characters_not_bytes() {
    let limits = ValidationLimits {
        max_player_name_chars: 4,
        ..ValidationLimits::default()
    };
    let mut submission = valid();
    submission.player_name = "éééé".to_string();
    assert!(validate_submission(&submission, &limits).is_ok());
    submission.player_name = "ééééé".to_string();
    assert_eq!(rejected_field(&submission, &limits), "playerName");
}

#[test]
fn rejects_control_characters() {
    let mut submission = valid();
    submission.track_id = TrackId::new("mon\naco");
    assert_eq!(rejected_field(&submission, &ValidationLimits::default()), "trackId");
}

#[test]
fn negative_chrono_requires_opt_in() {
    let mut submission = valid();
    submission.chrono = -1;
    assert_eq!(rejected_field(&submission, &ValidationLimits::default()), "chrono");
    let permissive = ValidationLimits {
        allow_negative_chrono: true,
        ..ValidationLimits::default()
    };
    assert!(validate_submission(&submission, &permissive).is_ok());
}

#[test]
fn zero_chrono_is_accepted() {
    let mut submission = valid();
    submission.chrono = 0;
    assert!(validate_submission(&submission, &ValidationLimits::default()).is_ok());
}

#[test]
fn submission_uses_camel_case_keys() {
    let parsed: ScoreSubmission = serde_json::from_value(json!({
        "playerName": "Jim",
        "playerId": "jim-01",
        "chrono": 61234,
        "trackId": "monaco"
    }))
    .unwrap();
    assert_eq!(parsed, valid());
}

#[test]
fn submission_rejects_fractional_chrono() {
    let parsed = serde_json::from_value::<ScoreSubmission>(json!({
        "playerName": "Jim",
        "playerId": "jim-01",
        "chrono": 1.5,
        "trackId": "monaco"
    }));
    assert!(parsed.is_err());
}

#[test]
fn record_serializes_created_at_as_rfc3339() {
    let record = ScoreRecord::from_submission(
        ScoreId::new("id-1"),
        &valid(),
        Timestamp::from_unix_millis(1_700_000_000_000),
    );
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "id-1",
            "playerName": "Jim",
            "playerId": "jim-01",
            "chrono": 61234,
            "trackId": "monaco",
            "createdAt": "2023-11-14T22:13:20.000Z"
        })
    );
}
