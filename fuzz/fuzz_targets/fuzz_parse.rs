#![no_main]

//! Script line parser fuzzer.
//!
//! Any text must either parse into a command or produce an error, and
//! whatever parses must be safe to apply.

use libfuzzer_sys::fuzz_target;
use tower_siege::game::check_invariants;
use tower_siege::{Command, MatchConfig, MatchSetup, PlayerId, start_match};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut game = start_match(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
        MatchConfig::default().with_seed(0),
    );

    for line in text.lines().take(200) {
        match line.parse::<Command>() {
            Ok(command) => {
                let player = game.state().active;
                game.apply(player, command);
                assert!(check_invariants(game.state()).is_empty());
            }
            Err(e) => assert!(!e.to_string().is_empty()),
        }
    }
});
