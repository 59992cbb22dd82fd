// crates/lapboard-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Score Store
// Description: Durable ScoreStore backend using SQLite WAL.
// Purpose: Persist leaderboard records across process restarts.
// Dependencies: lapboard-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ScoreStore`] implementation. Records
//! live in a single `scores` table keyed by an autoincrement insertion
//! sequence, so eviction order and ranking ties are deterministic and
//! sequence values are never reused.
//!
//! [`ScoreStore`]: lapboard_core::ScoreStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::SqliteScoreStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
