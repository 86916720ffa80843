#![no_main]

//! Command stream fuzzer.
//!
//! Drives a seeded match with arbitrary commands from arbitrary seats,
//! including commands for the wrong player and off-board coordinates, and
//! checks every invariant after each step.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tower_siege::game::{CATALOG, WeaponInstanceId, check_invariants};
use tower_siege::{
    BuildingKind, Command, Coord, Match, MatchConfig, MatchSetup, Phase, PlayerId, Resource,
};

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Move { x: u8, y: u8 },
    BuildMine,
    BuildForge,
    Upgrade { x: u8, y: u8 },
    Buy { weapon: u8 },
    Toggle { instance: u8 },
    EndTurn,
    Grant { seat: bool, resource: u8, amount: i32 },
}

impl FuzzCommand {
    fn into_command(self) -> Command {
        match self {
            Self::Move { x, y } => Command::Move(Coord::new(u16::from(x % 12), u16::from(y % 7))),
            Self::BuildMine => Command::Build(BuildingKind::GoldMine),
            Self::BuildForge => Command::Build(BuildingKind::Forge),
            Self::Upgrade { x, y } => {
                Command::Upgrade(Coord::new(u16::from(x % 12), u16::from(y % 7)))
            }
            Self::Buy { weapon } => {
                Command::BuyWeapon(CATALOG[usize::from(weapon) % CATALOG.len()].id)
            }
            Self::Toggle { instance } => {
                Command::ToggleWeapon(WeaponInstanceId(u32::from(instance % 16)))
            }
            Self::EndTurn => Command::EndTurn,
            Self::Grant {
                seat,
                resource,
                amount,
            } => Command::Grant {
                target: if seat { PlayerId::One } else { PlayerId::Two },
                resource: match resource % 3 {
                    0 => Resource::Power,
                    1 => Resource::Gold,
                    _ => Resource::Coins,
                },
                amount: i64::from(amount),
            },
        }
    }
}

/// Structured input for a fuzzed match.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    /// Seed for the match dice.
    seed: u64,
    /// Monsters scattered at start.
    monsters: u8,
    /// Steps as (issue as active player, command).
    steps: Vec<(bool, FuzzCommand)>,
}

fuzz_target!(|input: MatchInput| {
    let config = MatchConfig {
        seed: Some(input.seed),
        initial_monsters: usize::from(input.monsters % 8),
        ..MatchConfig::default()
    };
    let mut game = Match::new(config);
    game.start(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
    )
    .unwrap();

    for (as_active, command) in input.steps.into_iter().take(500) {
        let active = game.state().active;
        let seat = if as_active { active } else { active.other() };
        let before = game.state().clone();
        let report = game.apply(seat, command.into_command());

        let violations = check_invariants(game.state());
        if !violations.is_empty() {
            panic!("invariant violations: {violations:?}");
        }
        if seat != active && !report.accepted {
            assert_eq!(game.state().players, before.players);
            assert_eq!(game.state().active, before.active);
        }
        if matches!(before.phase, Phase::Won(_)) {
            assert!(!report.accepted);
        }
    }
});
