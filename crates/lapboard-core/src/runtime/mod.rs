// crates/lapboard-core/src/runtime/mod.rs
// ============================================================================
// Module: Lapboard Runtime
// Description: Leaderboard service, validation, and in-memory storage.
// Purpose: Orchestrate score submission and reads over any score store.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the leaderboard operations on top of
//! [`crate::interfaces::ScoreStore`]. Every transport must call into
//! [`Leaderboard`] so validation and capacity policy stay identical.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod leaderboard;
pub mod store;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use leaderboard::Leaderboard;
pub use leaderboard::LeaderboardConfig;
pub use leaderboard::LeaderboardError;
pub use leaderboard::SubmitOutcome;
pub use store::InMemoryScoreStore;
pub use store::SharedScoreStore;
pub use validation::ValidationError;
pub use validation::ValidationLimits;
pub use validation::validate_submission;
