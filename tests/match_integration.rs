//! End-to-end match scenarios through the public command surface.
//!
//! Run with: cargo test match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use tower_siege::game::{
    check_invariants, Event, GameState, Monster, MonsterKind, Phase, ScriptedDice, WeaponId,
};
use tower_siege::{
    BuildingKind, Command, Coord, Match, MatchConfig, MatchSetup, PlayerId, Rejection, Resource,
    Tile, TurnCost,
};

fn config() -> MatchConfig {
    MatchConfig {
        initial_monsters: 0,
        ..MatchConfig::default()
    }
}

fn started(dice: ScriptedDice) -> Match<ScriptedDice> {
    let mut game = Match::with_dice(config(), dice);
    game.start(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
    )
    .unwrap();
    game
}

fn in_progress(state: GameState, dice: ScriptedDice) -> Match<ScriptedDice> {
    let mut state = state;
    state.phase = Phase::InProgress;
    Match::resume(state, config(), dice)
}

fn fresh_state() -> GameState {
    GameState::new(
        MatchSetup::default_for(PlayerId::One),
        MatchSetup::default_for(PlayerId::Two),
        10,
    )
}

/// Walk player one along the middle row to (8, 2) while player two passes.
fn walk_to_enemy_tower(game: &mut Match<ScriptedDice>) {
    for x in 1..=8 {
        game.move_token(PlayerId::One, Coord::new(x, 2)).unwrap();
        game.end_turn(PlayerId::Two).unwrap();
    }
}

#[test]
fn test_move_to_adjacent_empty_tile() {
    let mut game = started(ScriptedDice::always_win());
    let before = game.state().player(PlayerId::One).stats;

    let report = game.apply(PlayerId::One, Command::Move(Coord::new(1, 2)));

    assert!(report.accepted);
    assert!(report.turn_advanced);
    assert_eq!(game.state().active, PlayerId::Two);
    let player = game.state().player(PlayerId::One);
    assert_eq!(player.pos, Coord::new(1, 2));
    assert_eq!(player.stats, before);
}

#[test]
fn test_attack_undefended_tower() {
    let mut game = started(ScriptedDice::always_win());
    game.end_turn(PlayerId::One).unwrap();
    game.move_token(PlayerId::Two, Coord::new(9, 1)).unwrap();
    walk_to_enemy_tower(&mut game);

    let outcome = game.move_token(PlayerId::One, Coord::new(9, 2)).unwrap();

    assert_eq!(outcome.cost, TurnCost::AdvancesTurn);
    assert_eq!(game.state().player(PlayerId::Two).tower_health, 95);
    assert_eq!(game.state().winner(), None);
    assert_eq!(game.state().active, PlayerId::Two);
}

#[test]
fn test_first_gold_mine() {
    let mut game = started(ScriptedDice::always_win());

    let outcome = game.build(PlayerId::One, BuildingKind::GoldMine).unwrap();

    assert_eq!(
        outcome.event,
        Event::Built {
            kind: BuildingKind::GoldMine,
            at: Coord::new(0, 1),
            cost: 10
        }
    );
    assert_eq!(game.state().player(PlayerId::One).stats.gold, 10);
    assert_eq!(
        game.state().board.tile(Coord::new(0, 1)),
        Some(Tile::Mine {
            owner: PlayerId::One,
            level: 1
        })
    );
}

#[test]
fn test_tower_upgrade_to_level_two() {
    let mut game = started(ScriptedDice::always_win());

    game.upgrade(PlayerId::One, Coord::new(0, 2)).unwrap();

    let player = game.state().player(PlayerId::One);
    assert_eq!(player.stats.upgrade_coins, 1);
    assert_eq!(player.tower_level, 2);
    assert_eq!(player.tower_health, 1000);
}

#[test]
fn test_siege_to_victory_then_frozen() {
    let mut game = started(ScriptedDice::always_win());
    game.end_turn(PlayerId::One).unwrap();
    game.move_token(PlayerId::Two, Coord::new(9, 1)).unwrap();
    walk_to_enemy_tower(&mut game);

    for hit in 1..=20 {
        let outcome = game.move_token(PlayerId::One, Coord::new(9, 2)).unwrap();
        let Event::TowerAttacked { remaining, destroyed, .. } = outcome.event else {
            panic!("expected a tower attack, got {:?}", outcome.event);
        };
        assert_eq!(remaining, 100 - 5 * hit);
        assert_eq!(destroyed, hit == 20);
        if !destroyed {
            game.end_turn(PlayerId::Two).unwrap();
        }
    }
    assert_eq!(game.state().winner(), Some(PlayerId::One));

    let frozen = game.state().clone();
    let active = frozen.active;
    for command in [
        Command::Move(Coord::new(8, 1)),
        Command::Build(BuildingKind::GoldMine),
        Command::Upgrade(Coord::new(0, 2)),
        Command::EndTurn,
    ] {
        for player in PlayerId::ALL {
            let report = game.apply(player, command);
            assert!(!report.accepted);
            assert_eq!(report.message, Rejection::MatchOver.to_string());
        }
    }
    assert_eq!(game.state().active, active);
    assert_eq!(game.state(), &frozen);
}

#[test]
fn test_fifth_mine_and_second_forge_rejected() {
    let mut state = fresh_state();
    state.player_mut(PlayerId::One).stats.gold = 1000;
    let mut game = in_progress(state, ScriptedDice::always_win());

    for _ in 0..4 {
        game.build(PlayerId::One, BuildingKind::GoldMine).unwrap();
        game.end_turn(PlayerId::Two).unwrap();
    }
    game.build(PlayerId::One, BuildingKind::Forge).unwrap();
    game.end_turn(PlayerId::Two).unwrap();

    let board = game.state().board.clone();
    let gold = game.state().player(PlayerId::One).stats.gold;
    assert_eq!(gold, 1000 - (10 + 20 + 30 + 40) - 20);

    assert_eq!(
        game.build(PlayerId::One, BuildingKind::GoldMine),
        Err(Rejection::MineLimit)
    );
    assert_eq!(
        game.build(PlayerId::One, BuildingKind::Forge),
        Err(Rejection::ForgeLimit)
    );
    assert_eq!(game.state().board, board);
    assert_eq!(game.state().player(PlayerId::One).stats.gold, gold);
    assert_eq!(game.state().active, PlayerId::One);
    assert_eq!(game.state().log.latest(), Some("You already have a Forge!"));
}

#[test]
fn test_fifth_equip_rejected() {
    let mut state = fresh_state();
    state.board.set_tile(
        Coord::new(0, 1),
        Tile::Forge {
            owner: PlayerId::One,
            level: 4,
        },
    );
    state.player_mut(PlayerId::One).stats.gold = 10_000;
    let mut game = in_progress(state, ScriptedDice::always_win());

    for weapon in [
        WeaponId::RustyDagger,
        WeaponId::ShortSword,
        WeaponId::IronMace,
        WeaponId::WarHammer,
        WeaponId::MagicWand,
    ] {
        game.buy_weapon(PlayerId::One, weapon).unwrap();
        game.end_turn(PlayerId::Two).unwrap();
    }

    let player = game.state().player(PlayerId::One).clone();
    assert_eq!(player.equipped.len(), 4);
    let spare = player.inventory[4].instance;
    assert!(!player.is_equipped(spare));

    let report = game.apply(PlayerId::One, Command::ToggleWeapon(spare));
    assert!(!report.accepted);
    assert_eq!(report.message, "Maximum 4 weapons equipped!");
    let after = game.state().player(PlayerId::One);
    assert_eq!(after.equipped, player.equipped);
    assert_eq!(after.stats.gold, player.stats.gold);
    assert_eq!(game.state().active, PlayerId::One);

    // Freeing a slot makes room, and neither toggle costs the turn.
    let first = player.equipped[0];
    game.toggle_weapon(PlayerId::One, first).unwrap();
    game.toggle_weapon(PlayerId::One, spare).unwrap();
    let after = game.state().player(PlayerId::One);
    assert!(after.is_equipped(spare));
    assert!(!after.is_equipped(first));
    assert_eq!(game.state().active, PlayerId::One);
}

#[test]
fn test_monster_loss_with_three_gold() {
    let mut state = fresh_state();
    state.player_mut(PlayerId::One).stats.gold = 3;
    let orc = Monster {
        kind: MonsterKind::Orc,
        power: 10,
        reward_gold: 20,
        reward_coins: 1,
        lucky: false,
    };
    state.board.place_monster(Coord::new(1, 2), orc);
    let mut game = in_progress(state, ScriptedDice::always_lose());

    let report = game.apply(PlayerId::One, Command::Move(Coord::new(1, 2)));

    assert!(report.accepted);
    assert_eq!(
        report.message,
        "Defeat! The Orc was too strong. You respawned at your tower."
    );
    let player = game.state().player(PlayerId::One);
    assert_eq!(player.stats.gold, 0);
    assert_eq!(player.pos, Coord::new(0, 2));
    assert_eq!(game.state().board.monster_at(Coord::new(1, 2)), Some(&orc));
    assert_eq!(game.state().active, PlayerId::Two);
}

#[test]
fn test_powerless_duel_sends_attacker_home() {
    let mut state = fresh_state();
    state.player_mut(PlayerId::One).pos = Coord::new(4, 2);
    state.player_mut(PlayerId::Two).pos = Coord::new(5, 2);
    let mut game = in_progress(state, ScriptedDice::with_fallback(0.4));
    game.grant(PlayerId::One, Resource::Power, -5).unwrap();
    game.grant(PlayerId::Two, Resource::Power, -5).unwrap();

    let report = game.apply(PlayerId::One, Command::Move(Coord::new(5, 2)));

    assert!(report.accepted);
    assert_eq!(
        report.message,
        "Defeat! Player 2 defeated you. You respawned at your tower."
    );
    assert_eq!(game.state().player(PlayerId::One).pos, Coord::new(0, 2));
    assert_eq!(game.state().player(PlayerId::Two).pos, Coord::new(5, 2));
}

#[test]
fn test_lucky_and_plain_monster_rewards() {
    let plain = Monster {
        kind: MonsterKind::Skeleton,
        power: 6,
        reward_gold: 11,
        reward_coins: 1,
        lucky: false,
    };
    let lucky = Monster {
        kind: MonsterKind::Dragon,
        power: 20,
        reward_gold: 51,
        reward_coins: 3,
        lucky: true,
    };

    let mut state = fresh_state();
    state.board.place_monster(Coord::new(0, 1), plain);
    state.board.place_monster(Coord::new(9, 1), lucky);
    let mut game = in_progress(state, ScriptedDice::always_win());

    game.move_token(PlayerId::One, Coord::new(0, 1)).unwrap();
    game.move_token(PlayerId::Two, Coord::new(9, 1)).unwrap();

    let one = game.state().player(PlayerId::One).stats;
    assert_eq!((one.gold, one.upgrade_coins, one.power), (31, 3, 5));

    let two = game.state().player(PlayerId::Two).stats;
    assert_eq!((two.gold, two.upgrade_coins, two.power), (20 + 76, 2 + 4, 15));
    assert_eq!(game.state().board.monsters().count(), 0);
}

#[test]
fn test_income_for_every_mine_level() {
    let mut state = fresh_state();
    for (y, level) in [(0, 1), (1, 2), (3, 3), (4, 4)] {
        state.board.set_tile(
            Coord::new(1, y),
            Tile::Mine {
                owner: PlayerId::One,
                level,
            },
        );
    }
    let mut game = in_progress(state, ScriptedDice::always_win());

    let outcome = game.end_turn(PlayerId::One).unwrap();

    assert_eq!(outcome.event, Event::TurnEnded { income: 75 });
    assert_eq!(game.state().player(PlayerId::One).stats.gold, 95);
    assert_eq!(game.state().player(PlayerId::Two).stats.gold, 20);

    // Income is only paid to the player ending their turn.
    game.end_turn(PlayerId::Two).unwrap();
    assert_eq!(game.state().player(PlayerId::One).stats.gold, 95);
}

#[test]
fn test_fifth_upgrade_rejected() {
    let mut game = started(ScriptedDice::always_win());
    game.grant(PlayerId::One, Resource::Coins, 10).unwrap();

    for level in 2..=4 {
        game.upgrade(PlayerId::One, Coord::new(0, 2)).unwrap();
        assert_eq!(game.state().player(PlayerId::One).tower_level, level);
        game.end_turn(PlayerId::Two).unwrap();
    }
    let player = game.state().player(PlayerId::One);
    assert_eq!(player.tower_health, 3500);
    assert_eq!(player.stats.upgrade_coins, 12 - 7);

    assert_eq!(
        game.upgrade(PlayerId::One, Coord::new(0, 2)),
        Err(Rejection::MaxLevel)
    );
    assert_eq!(game.state().player(PlayerId::One).stats.upgrade_coins, 5);
}

#[test]
fn test_log_keeps_ten_newest() {
    let mut game = started(ScriptedDice::always_win());
    for i in 0..12 {
        let player = if i % 2 == 0 { PlayerId::One } else { PlayerId::Two };
        game.end_turn(player).unwrap();
    }
    let log: Vec<&str> = game.state().log.iter().collect();
    assert_eq!(log.len(), 10);
    assert!(log.iter().all(|line| *line == "Turn skipped."));
}

#[test]
fn test_same_seed_same_match() {
    let script = [
        "move 1 2", "move 8 2", "move 2 2", "move 7 2", "build mine", "end", "move 3 2",
        "move 6 2", "move 4 2", "move 5 2", "move 5 2",
    ];
    let play = || {
        let mut game = Match::new(MatchConfig::default().with_seed(1234));
        game.start(
            MatchSetup::default_for(PlayerId::One),
            MatchSetup::default_for(PlayerId::Two),
        )
        .unwrap();
        for line in script {
            let player = game.state().active;
            game.apply(player, line.parse().unwrap());
        }
        game.into_state()
    };

    let a = play();
    let b = play();
    assert_eq!(a, b);
    assert!(check_invariants(&a).is_empty());
}
