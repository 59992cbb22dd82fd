// crates/lapboard-core/src/runtime/store.rs
// ============================================================================
// Module: Lapboard In-Memory Store
// Description: In-memory score store and shared store wrapper.
// Purpose: Provide a deterministic store for tests and ephemeral deployments.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryScoreStore`] keeps records in an ordered map keyed by insertion
//! sequence. It implements the same ordering, filtering, and eviction rules as
//! the durable backends and is used for tests and the `memory` store type.
//! [`SharedScoreStore`] wraps any backend behind an `Arc` trait object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::Clock;
use crate::core::ScoreFilter;
use crate::core::ScoreId;
use crate::core::ScoreRecord;
use crate::core::ScoreSubmission;
use crate::core::SystemClock;
use crate::core::Timestamp;
use crate::interfaces::ScoreStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable state behind the in-memory store mutex.
#[derive(Debug, Default)]
struct StoreState {
    /// Records keyed by insertion sequence.
    records: BTreeMap<u64, ScoreRecord>,
    /// Next insertion sequence to assign.
    next_sequence: u64,
    /// Newest `createdAt` ever assigned, kept across evictions.
    latest_created_at: Option<Timestamp>,
}

/// In-memory score store for tests and ephemeral deployments.
#[derive(Clone)]
pub struct InMemoryScoreStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<StoreState>>,
    /// Time source for `createdAt`.
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreStore {
    /// Creates an empty store backed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store with an explicit time source.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock,
        }
    }

    /// Locks the store state.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("score store mutex poisoned".to_string()))
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn insert(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, StoreError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        let created_at = guard.latest_created_at.map_or(now, |latest| latest.max(now));
        let sequence = guard.next_sequence;
        guard.next_sequence = sequence
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt("insertion sequence overflow".to_string()))?;
        let record = ScoreRecord::from_submission(ScoreId::generate(), submission, created_at);
        guard.records.insert(sequence, record.clone());
        guard.latest_created_at = Some(created_at);
        drop(guard);
        Ok(record)
    }

    fn enforce_capacity(&self, max_records: u64) -> Result<u64, StoreError> {
        let max_records = usize::try_from(max_records)
            .map_err(|_| StoreError::Invalid("max_records too large".to_string()))?;
        let mut guard = self.lock()?;
        let excess = guard.records.len().saturating_sub(max_records);
        if excess == 0 {
            return Ok(0);
        }
        let mut oldest: Vec<(Timestamp, u64)> =
            guard.records.iter().map(|(sequence, record)| (record.created_at, *sequence)).collect();
        oldest.sort_unstable();
        for (_, sequence) in oldest.into_iter().take(excess) {
            guard.records.remove(&sequence);
        }
        drop(guard);
        u64::try_from(excess).map_err(|_| StoreError::Invalid("eviction count overflow".to_string()))
    }

    fn query(&self, filter: &ScoreFilter, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        if limit == 0 {
            return Err(StoreError::Invalid("query limit must be greater than zero".to_string()));
        }
        let guard = self.lock()?;
        let mut matches: Vec<(u64, &ScoreRecord)> = guard
            .records
            .iter()
            .filter(|(_, record)| filter.matches(record))
            .map(|(sequence, record)| (*sequence, record))
            .collect();
        matches.sort_by_key(|(sequence, record)| (record.chrono, record.created_at, *sequence));
        let results = matches.into_iter().take(limit).map(|(_, record)| record.clone()).collect();
        drop(guard);
        Ok(results)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let len = self.lock()?.records.len();
        u64::try_from(len).map_err(|_| StoreError::Invalid("record count overflow".to_string()))
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared score store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedScoreStore {
    /// Inner store implementation.
    inner: Arc<dyn ScoreStore + Send + Sync>,
}

impl SharedScoreStore {
    /// Wraps a score store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ScoreStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ScoreStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ScoreStore for SharedScoreStore {
    fn insert(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, StoreError> {
        self.inner.insert(submission)
    }

    fn enforce_capacity(&self, max_records: u64) -> Result<u64, StoreError> {
        self.inner.enforce_capacity(max_records)
    }

    fn query(&self, filter: &ScoreFilter, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        self.inner.query(filter, limit)
    }

    fn count(&self) -> Result<u64, StoreError> {
        self.inner.count()
    }
}
