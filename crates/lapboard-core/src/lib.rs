// crates/lapboard-core/src/lib.rs
// ============================================================================
// Module: Lapboard Core Library
// Description: Public API surface for the Lapboard leaderboard core.
// Purpose: Expose score types, store interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Lapboard core owns the score record model and the bounded-retention score
//! store contract. Transports (HTTP, CLI) and storage backends integrate
//! through the [`ScoreStore`] interface and the [`Leaderboard`] service rather
//! than touching records directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ScoreStore;
pub use interfaces::StoreError;
pub use runtime::InMemoryScoreStore;
pub use runtime::Leaderboard;
pub use runtime::LeaderboardConfig;
pub use runtime::LeaderboardError;
pub use runtime::SharedScoreStore;
pub use runtime::SubmitOutcome;
pub use runtime::ValidationError;
pub use runtime::ValidationLimits;
pub use runtime::validate_submission;
