// crates/lapboard-core/src/core/mod.rs
// ============================================================================
// Module: Lapboard Core Types
// Description: Canonical score records, identifiers, and time values.
// Purpose: Provide stable, serializable types shared by stores and transports.
// Dependencies: serde, time, uuid
// ============================================================================

//! ## Overview
//! Core types define the score record wire shape and the filters used to read
//! the leaderboard. These types are the canonical source of truth for the HTTP
//! surface and every store backend.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod record;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::PlayerId;
pub use identifiers::ScoreId;
pub use identifiers::TrackId;
pub use record::DEFAULT_MAX_RECORDS;
pub use record::MAX_QUERY_RESULTS;
pub use record::ScoreFilter;
pub use record::ScoreRecord;
pub use record::ScoreSubmission;
pub use time::Clock;
pub use time::FixedClock;
pub use time::SystemClock;
pub use time::Timestamp;
pub use time::TimestampError;
