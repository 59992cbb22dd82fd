// crates/lapboard-core/src/runtime/leaderboard.rs
// ============================================================================
// Module: Lapboard Leaderboard Service
// Description: Submission, capacity enforcement, and ranked reads.
// Purpose: Single entry point for every transport touching the score store.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`Leaderboard`] validates submissions, inserts them, and then enforces the
//! retention cap before returning. Insert and enforcement run under a
//! process-wide retention lock so concurrent submissions cannot interleave
//! their count-and-delete steps; the stored count never exceeds the cap once a
//! submission returns. Enforcement is a separate atomic step, so a failure
//! there leaves the freshly inserted record in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use thiserror::Error;

use crate::core::DEFAULT_MAX_RECORDS;
use crate::core::MAX_QUERY_RESULTS;
use crate::core::ScoreFilter;
use crate::core::ScoreId;
use crate::core::ScoreRecord;
use crate::core::ScoreSubmission;
use crate::interfaces::ScoreStore;
use crate::interfaces::StoreError;
use crate::runtime::store::SharedScoreStore;
use crate::runtime::validation::ValidationError;
use crate::runtime::validation::ValidationLimits;
use crate::runtime::validation::validate_submission;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Leaderboard policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardConfig {
    /// Maximum number of retained records.
    pub max_records: u64,
    /// Submission validation limits.
    pub limits: ValidationLimits,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            limits: ValidationLimits::default(),
        }
    }
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Stored record.
    pub record: ScoreRecord,
    /// Number of old records evicted to honor the cap.
    pub evicted: u64,
}

/// Leaderboard errors.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Submission failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Record was stored but the retention cap could not be enforced.
    #[error("capacity enforcement failed after storing {id}: {source}")]
    Capacity {
        /// Identifier of the record that was stored.
        id: ScoreId,
        /// Underlying store failure.
        source: StoreError,
    },
    /// Leaderboard settings are invalid.
    #[error("invalid leaderboard config: {0}")]
    Config(String),
}

// ============================================================================
// SECTION: Leaderboard
// ============================================================================

/// Bounded-retention leaderboard over a shared score store.
pub struct Leaderboard {
    /// Backing store.
    store: SharedScoreStore,
    /// Policy settings.
    config: LeaderboardConfig,
    /// Serializes insert-then-enforce sequences.
    retention: Mutex<()>,
}

impl Leaderboard {
    /// Builds a leaderboard over the provided store.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Config`] when `max_records` is zero.
    pub fn new(store: SharedScoreStore, config: LeaderboardConfig) -> Result<Self, LeaderboardError> {
        if config.max_records == 0 {
            return Err(LeaderboardError::Config(
                "max_records must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            store,
            config,
            retention: Mutex::new(()),
        })
    }

    /// Returns the active policy settings.
    #[must_use]
    pub const fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    /// Validates, stores, and enforces the retention cap for a submission.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Validation`] for rejected input,
    /// [`LeaderboardError::Store`] when the insert fails, and
    /// [`LeaderboardError::Capacity`] when eviction fails after the insert.
    pub fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitOutcome, LeaderboardError> {
        validate_submission(submission, &self.config.limits)?;
        let guard = self.lock_retention()?;
        let record = self.store.insert(submission)?;
        let evicted =
            self.store.enforce_capacity(self.config.max_records).map_err(|source| {
                LeaderboardError::Capacity {
                    id: record.id.clone(),
                    source,
                }
            })?;
        drop(guard);
        Ok(SubmitOutcome {
            record,
            evicted,
        })
    }

    /// Returns the ranked records matching `filter`, at most 100.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] when the read fails.
    pub fn query(&self, filter: &ScoreFilter) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        Ok(self.store.query(filter, MAX_QUERY_RESULTS)?)
    }

    /// Runs capacity enforcement without inserting.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] when eviction fails.
    pub fn enforce_capacity(&self) -> Result<u64, LeaderboardError> {
        let guard = self.lock_retention()?;
        let evicted = self.store.enforce_capacity(self.config.max_records)?;
        drop(guard);
        Ok(evicted)
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] when the count cannot be read.
    pub fn count(&self) -> Result<u64, LeaderboardError> {
        Ok(self.store.count()?)
    }

    /// Acquires the retention lock.
    fn lock_retention(&self) -> Result<std::sync::MutexGuard<'_, ()>, LeaderboardError> {
        self.retention
            .lock()
            .map_err(|_| LeaderboardError::Store(StoreError::Store("retention lock poisoned".to_string())))
    }
}
