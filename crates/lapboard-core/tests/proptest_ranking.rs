// crates/lapboard-core/tests/proptest_ranking.rs
// ============================================================================
// Module: Ranking and Retention Property Tests
// Description: Property-based checks for leaderboard ordering and eviction.
// Purpose: Ensure ordering and cap invariants hold for arbitrary inputs.
// Dependencies: lapboard-core, proptest
// ============================================================================

//! ## Overview
//! Generates arbitrary score sequences and checks that reads are sorted,
//! bounded, and filtered, and that eviction always lands exactly on the cap.

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

use lapboard_core::InMemoryScoreStore;
use lapboard_core::MAX_QUERY_RESULTS;
use lapboard_core::PlayerId;
use lapboard_core::ScoreFilter;
use lapboard_core::ScoreStore;
use lapboard_core::ScoreSubmission;
use lapboard_core::TrackId;
use proptest::prelude::*;

// ============================================================================
// SECTION: Strategies
// ============================================================================

fn entry() -> impl Strategy<Value = (u8, u8, i64)> {
    (0u8..3, 0u8..3, 0i64..10_000)
}

fn submission(player: u8, track: u8, chrono: i64) -> ScoreSubmission {
    ScoreSubmission {
        player_name: format!("player {player}"),
        player_id: PlayerId::new(format!("p{player}")),
        chrono,
        track_id: TrackId::new(format!("t{track}")),
    }
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn query_is_sorted_filtered_and_bounded(entries in prop::collection::vec(entry(), 0..300)) {
        let store = InMemoryScoreStore::new();
        for (player, track, chrono) in &entries {
            store.insert(&submission(*player, *track, *chrono)).unwrap();
        }
        let filter = ScoreFilter::all().with_track("t1");
        let results = store.query(&filter, MAX_QUERY_RESULTS).unwrap();

        let mut expected: Vec<i64> = entries
            .iter()
            .filter(|(_, track, _)| *track == 1)
            .map(|(_, _, chrono)| *chrono)
            .collect();
        expected.sort_unstable();
        expected.truncate(MAX_QUERY_RESULTS);

        let actual: Vec<i64> = results.iter().map(|record| record.chrono).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(results.iter().all(|record| record.track_id.as_str() == "t1"));
    }

    #[test]
    fn enforcement_lands_exactly_on_cap(count in 0usize..200, cap in 1u64..150) {
        let store = InMemoryScoreStore::new();
        for chrono in 0..count {
            store.insert(&submission(0, 0, i64::try_from(chrono).unwrap())).unwrap();
        }
        let before = store.count().unwrap();
        let evicted = store.enforce_capacity(cap).unwrap();
        prop_assert_eq!(evicted, before.saturating_sub(cap));
        prop_assert_eq!(store.count().unwrap(), before.min(cap));
        prop_assert_eq!(store.enforce_capacity(cap).unwrap(), 0);
    }
}
