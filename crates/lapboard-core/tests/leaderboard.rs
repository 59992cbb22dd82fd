// crates/lapboard-core/tests/leaderboard.rs
// ============================================================================
// Module: Leaderboard Service Tests
// Description: Validate submission orchestration and the retention cap.
// Purpose: Ensure validation, insert, and eviction compose correctly.
// Dependencies: lapboard-core
// ============================================================================

//! ## Overview
//! Exercises [`Leaderboard`] against the in-memory store and a store stub that
//! fails on demand, covering the exact-cap guarantee, idempotent enforcement,
//! and the rule that enforcement failures never undo an insert.

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

use std::sync::Arc;
use std::thread;

use lapboard_core::InMemoryScoreStore;
use lapboard_core::Leaderboard;
use lapboard_core::LeaderboardConfig;
use lapboard_core::LeaderboardError;
use lapboard_core::PlayerId;
use lapboard_core::ScoreFilter;
use lapboard_core::ScoreRecord;
use lapboard_core::ScoreStore;
use lapboard_core::ScoreSubmission;
use lapboard_core::SharedScoreStore;
use lapboard_core::StoreError;
use lapboard_core::TrackId;
use lapboard_core::ValidationLimits;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn submission(track: &str, chrono: i64) -> ScoreSubmission {
    ScoreSubmission {
        player_name: "Ayrton".to_string(),
        player_id: PlayerId::new("player-1"),
        chrono,
        track_id: TrackId::new(track),
    }
}

fn leaderboard_with_cap(store: InMemoryScoreStore, max_records: u64) -> Leaderboard {
    Leaderboard::new(
        SharedScoreStore::from_store(store),
        LeaderboardConfig {
            max_records,
            limits: ValidationLimits::default(),
        },
    )
    .unwrap()
}

/// Delegates to an in-memory store but fails selected operations.
struct FlakyStore {
    inner: InMemoryScoreStore,
    fail_insert: bool,
    fail_enforce: bool,
}

impl ScoreStore for FlakyStore {
    fn insert(&self, submission: &ScoreSubmission) -> Result<ScoreRecord, StoreError> {
        if self.fail_insert {
            return Err(StoreError::Io("disk unavailable".to_string()));
        }
        self.inner.insert(submission)
    }

    fn enforce_capacity(&self, max_records: u64) -> Result<u64, StoreError> {
        if self.fail_enforce {
            return Err(StoreError::Store("delete failed".to_string()));
        }
        self.inner.enforce_capacity(max_records)
    }

    fn query(&self, filter: &ScoreFilter, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        self.inner.query(filter, limit)
    }

    fn count(&self) -> Result<u64, StoreError> {
        self.inner.count()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn rejects_zero_capacity() {
    let result = Leaderboard::new(
        SharedScoreStore::from_store(InMemoryScoreStore::new()),
        LeaderboardConfig {
            max_records: 0,
            limits: ValidationLimits::default(),
        },
    );
    assert!(matches!(result, Err(LeaderboardError::Config(_))));
}

#[test]
fn default_config_caps_at_five_thousand() {
    assert_eq!(LeaderboardConfig::default().max_records, 5_000);
}

#[test]
fn submit_returns_record_and_no_eviction_under_cap() {
    let board = leaderboard_with_cap(InMemoryScoreStore::new(), 10);
    let outcome = board.submit(&submission("A", 123)).unwrap();
    assert_eq!(outcome.evicted, 0);
    assert_eq!(outcome.record.chrono, 123);
    assert_eq!(outcome.record.track_id.as_str(), "A");
    assert_eq!(board.count().unwrap(), 1);
}

#[test]
fn submit_at_cap_keeps_count_exactly_at_cap() {
    let board = leaderboard_with_cap(InMemoryScoreStore::new(), 5);
    for chrono in 0..5 {
        board.submit(&submission("A", chrono)).unwrap();
    }
    for chrono in 5..20 {
        let outcome = board.submit(&submission("A", chrono)).unwrap();
        assert_eq!(outcome.evicted, 1);
        assert_eq!(board.count().unwrap(), 5);
    }
}

#[test]
fn five_thousand_and_one_inserts_evict_only_the_oldest() {
    let board = leaderboard_with_cap(InMemoryScoreStore::new(), 5_000);
    let first = board.submit(&submission("A", 0)).unwrap().record;
    for chrono in 1..5_001 {
        board.submit(&submission("A", chrono)).unwrap();
    }
    assert_eq!(board.count().unwrap(), 5_000);
    let best = board.query(&ScoreFilter::all()).unwrap();
    assert!(best.iter().all(|record| record.id != first.id));
    assert_eq!(best[0].chrono, 1);
}

#[test]
fn explicit_enforcement_is_idempotent() {
    let store = InMemoryScoreStore::new();
    for chrono in 0..8 {
        store.insert(&submission("A", chrono)).unwrap();
    }
    let board = leaderboard_with_cap(store, 3);
    assert_eq!(board.enforce_capacity().unwrap(), 5);
    assert_eq!(board.enforce_capacity().unwrap(), 0);
}

#[test]
fn invalid_submission_never_reaches_store() {
    let board = leaderboard_with_cap(InMemoryScoreStore::new(), 10);
    let mut bad = submission("A", 10);
    bad.player_name = "   ".to_string();
    let err = board.submit(&bad).unwrap_err();
    assert!(matches!(err, LeaderboardError::Validation(ref inner) if inner.field == "playerName"));
    assert_eq!(board.count().unwrap(), 0);
}

#[test]
fn query_is_capped_at_one_hundred() {
    let board = leaderboard_with_cap(InMemoryScoreStore::new(), 1_000);
    for chrono in (0..150).rev() {
        board.submit(&submission("A", chrono)).unwrap();
    }
    let results = board.query(&ScoreFilter::all().with_track("A")).unwrap();
    assert_eq!(results.len(), 100);
    assert_eq!(results.last().unwrap().chrono, 99);
}

#[test]
fn insert_failure_surfaces_store_error() {
    let store = FlakyStore {
        inner: InMemoryScoreStore::new(),
        fail_insert: true,
        fail_enforce: false,
    };
    let board =
        Leaderboard::new(SharedScoreStore::from_store(store), LeaderboardConfig::default()).unwrap();
    let err = board.submit(&submission("A", 1)).unwrap_err();
    assert!(matches!(err, LeaderboardError::Store(StoreError::Io(_))));
    assert_eq!(board.count().unwrap(), 0);
}

#[test]
fn enforcement_failure_keeps_inserted_record() {
    let inner = InMemoryScoreStore::new();
    let store = FlakyStore {
        inner: inner.clone(),
        fail_insert: false,
        fail_enforce: true,
    };
    let board =
        Leaderboard::new(SharedScoreStore::from_store(store), LeaderboardConfig::default()).unwrap();
    let err = board.submit(&submission("A", 1)).unwrap_err();
    let id = match err {
        LeaderboardError::Capacity {
            id,
            ..
        } => id,
        other => panic!("expected capacity error, got {other:?}"),
    };
    let stored = inner.query(&ScoreFilter::all(), 10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
}

#[test]
fn concurrent_submissions_never_exceed_cap() {
    let board = Arc::new(leaderboard_with_cap(InMemoryScoreStore::new(), 25));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                for chrono in 0..50 {
                    board.submit(&submission("A", worker * 100 + chrono)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(board.count().unwrap(), 25);
}
