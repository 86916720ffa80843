//! Concurrency tests for the shared match handle.
//!
//! Run with: cargo test --test session

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::thread;
use tower_siege::{start_match, Command, MatchConfig, MatchHandle, MatchSetup, PlayerId};

fn shared_match(seed: u64) -> MatchHandle {
    MatchHandle::new(start_match(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
        MatchConfig::default().with_seed(seed),
    ))
}

#[test]
fn test_seats_on_separate_threads_alternate() {
    const ATTEMPTS: usize = 2_000;
    let handle = shared_match(7);

    let seats: Vec<_> = PlayerId::ALL
        .into_iter()
        .map(|seat| {
            let handle = handle.clone();
            thread::spawn(move || {
                let mut accepted = 0usize;
                for _ in 0..ATTEMPTS {
                    let report = handle.apply(seat, Command::EndTurn).unwrap();
                    if report.accepted {
                        assert!(report.turn_advanced);
                        accepted += 1;
                    }
                }
                accepted
            })
        })
        .collect();
    let counts: Vec<usize> = seats.into_iter().map(|t| t.join().unwrap()).collect();

    // Player one always moves first, so the counts differ by at most one.
    assert!(counts[0] == counts[1] || counts[0] == counts[1] + 1);

    let expected = if counts[0] == counts[1] {
        PlayerId::One
    } else {
        PlayerId::Two
    };
    assert_eq!(handle.active().unwrap(), expected);

    let state = handle.snapshot().unwrap();
    assert!(state.log.len() <= 10);
    assert!(tower_siege::game::check_invariants(&state).is_empty());
}

#[test]
fn test_snapshot_is_detached() {
    let handle = shared_match(11);
    let before = handle.snapshot().unwrap();

    handle.apply(PlayerId::One, Command::EndTurn).unwrap();

    assert_eq!(before.active, PlayerId::One);
    assert_eq!(handle.active().unwrap(), PlayerId::Two);
}
