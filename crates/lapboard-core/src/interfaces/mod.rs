// crates/lapboard-core/src/interfaces/mod.rs
// ============================================================================
// Module: Lapboard Interfaces
// Description: Backend-agnostic score store contract.
// Purpose: Define the seam between the leaderboard service and persistence.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Every persistence backend implements [`ScoreStore`]. Each operation is a
//! single atomic step against the backend; the store never exposes partial
//! writes. Orchestration (validation, capacity policy) lives in
//! [`crate::runtime::Leaderboard`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ScoreFilter;
use crate::core::ScoreRecord;
use crate::core::ScoreSubmission;

// ============================================================================
// SECTION: Score Store
// ============================================================================

/// Score store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("score store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("score store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("score store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data or arguments are invalid.
    #[error("score store invalid data: {0}")]
    Invalid(String),
    /// Store engine reported an error.
    #[error("score store error: {0}")]
    Store(String),
}

impl StoreError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Corrupt(_) => "corrupt",
            Self::VersionMismatch(_) => "version_mismatch",
            Self::Invalid(_) => "invalid",
            Self::Store(_) => "store",
        }
    }
}

/// Persistent score storage with bounded retention.
pub trait ScoreStore {
    /// Persists a submission as a new record with a fresh id and `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write cannot complete; nothing is
    /// persisted in that case.
    fn insert(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, StoreError>;

    /// Evicts the oldest records until at most `max_records` remain.
    ///
    /// Oldest means lowest `createdAt`, ties broken by insertion order.
    /// Returns the number of evicted records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when counting or deleting fails.
    fn enforce_capacity(&self, max_records: u64) -> Result<u64, StoreError>;

    /// Returns up to `limit` records matching `filter`, best chrono first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn query(&self, filter: &ScoreFilter, limit: usize) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the count cannot be read.
    fn count(&self) -> Result<u64, StoreError>;
}
