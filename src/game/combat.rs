//! Movement and combat resolution.
//!
//! Every engagement is a single weighted coin flip: the attacker wins with
//! probability `attacker / (attacker + defender)`. A move one step onto
//! - the enemy tower damages it by the attacker's full power, with a duel
//!   first if the enemy stands on it (the duel only decides who respawns),
//! - the enemy token starts a duel for the tile,
//! - a monster starts a fight for its bounty,
//! - anything else simply moves the token.

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::game::{Coord, Dice, Event, GameState, Monster, Outcome, PlayerId, Tile};

/// Gold lost when a monster wins.
pub const MONSTER_DEFEAT_PENALTY: u32 = 5;

/// Permanent power gained from slaying a lucky monster.
pub const LUCKY_POWER_BONUS: u32 = 10;

/// Extra coins from slaying a lucky monster.
pub const LUCKY_COIN_BONUS: u32 = 1;

/// Who won a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOutcome {
    /// The moving player won.
    AttackerWon,
    /// The defender (player or monster) held.
    DefenderWon,
}

/// Chance that the attacker wins.
///
/// An attacker with no power never wins, even against a powerless defender.
#[must_use]
pub fn win_probability(attacker: u32, defender: u32) -> f64 {
    if attacker == 0 {
        return 0.0;
    }
    f64::from(attacker) / (f64::from(attacker) + f64::from(defender))
}

/// Resolve one engagement with a single roll.
pub fn duel(dice: &mut impl Dice, attacker: u32, defender: u32) -> DuelOutcome {
    if dice.roll() < win_probability(attacker, defender) {
        DuelOutcome::AttackerWon
    } else {
        DuelOutcome::DefenderWon
    }
}

/// Gold, coins and power paid for slaying `monster`.
#[must_use]
pub const fn bounty(monster: &Monster) -> (u32, u32, u32) {
    if monster.lucky {
        (
            monster.reward_gold.saturating_mul(3) / 2,
            monster.reward_coins.saturating_add(LUCKY_COIN_BONUS),
            LUCKY_POWER_BONUS,
        )
    } else {
        (monster.reward_gold, monster.reward_coins, 0)
    }
}

/// Move the player's token one step toward `target`, fighting whatever is
/// there.
///
/// # Errors
///
/// [`Rejection::NotAdjacent`] unless `target` is exactly one step away, and
/// [`Rejection::OutOfBounds`] if it is off the board. Both are silent.
pub fn attempt_move(
    state: &mut GameState,
    dice: &mut impl Dice,
    player_id: PlayerId,
    target: Coord,
) -> Result<Outcome, Rejection> {
    let from = state.player(player_id).pos;
    if from.manhattan(target) != 1 {
        return Err(Rejection::NotAdjacent(target));
    }
    let Some(tile) = state.board.tile(target) else {
        return Err(Rejection::OutOfBounds(target));
    };

    let enemy_id = player_id.other();

    if matches!(tile, Tile::Tower { owner } if owner == enemy_id) {
        return Ok(attack_tower(state, dice, player_id, target));
    }

    if state.player(enemy_id).pos == target {
        return Ok(fight_player(state, dice, player_id, target));
    }

    if let Some(monster) = state.board.monster_at(target).copied() {
        return Ok(fight_monster(state, dice, player_id, target, monster));
    }

    state.player_mut(player_id).pos = target;
    Ok(Outcome::turn(Event::Moved { to: target }, format!("Moved to {target}.")))
}

fn attack_tower(
    state: &mut GameState,
    dice: &mut impl Dice,
    player_id: PlayerId,
    target: Coord,
) -> Outcome {
    let enemy_id = player_id.other();
    let damage = state.player(player_id).total_power();
    let enemy_name = state.player(enemy_id).name.clone();
    let mut message = format!("Attacked enemy tower for {damage} damage!");

    let defended = state.player(enemy_id).pos == target;
    let duel_outcome = defended.then(|| {
        let attacker = state.player(player_id).total_power();
        let defender = state.player(enemy_id).total_power();
        duel(dice, attacker, defender)
    });
    match duel_outcome {
        Some(DuelOutcome::AttackerWon) => {
            state.respawn(enemy_id);
            message.push_str(&format!(" Victory! You defeated {enemy_name} on their tower."));
        }
        Some(DuelOutcome::DefenderWon) => {
            state.respawn(player_id);
            message.push_str(&format!(" Defeat! {enemy_name} defended their tower. You respawned."));
        }
        None => {}
    }

    let remaining = state.player_mut(enemy_id).damage_tower(damage);
    let destroyed = remaining == 0;
    if destroyed {
        state.declare_winner(player_id);
        message.push_str(&format!(" {enemy_name}'s tower has fallen!"));
    }

    Outcome::turn(
        Event::TowerAttacked {
            target: enemy_id,
            damage,
            remaining,
            duel: duel_outcome,
            destroyed,
        },
        message,
    )
}

fn fight_player(
    state: &mut GameState,
    dice: &mut impl Dice,
    player_id: PlayerId,
    target: Coord,
) -> Outcome {
    let enemy_id = player_id.other();
    let attacker = state.player(player_id).total_power();
    let defender = state.player(enemy_id).total_power();
    let enemy_name = state.player(enemy_id).name.clone();

    let outcome = duel(dice, attacker, defender);
    let message = match outcome {
        DuelOutcome::AttackerWon => {
            state.respawn(enemy_id);
            state.player_mut(player_id).pos = target;
            format!("Victory! You defeated {enemy_name}. They respawned at their tower.")
        }
        DuelOutcome::DefenderWon => {
            state.respawn(player_id);
            format!("Defeat! {enemy_name} defeated you. You respawned at your tower.")
        }
    };

    Outcome::turn(Event::DuelResolved { outcome, at: target }, message)
}

fn fight_monster(
    state: &mut GameState,
    dice: &mut impl Dice,
    player_id: PlayerId,
    target: Coord,
    monster: Monster,
) -> Outcome {
    let attacker = state.player(player_id).total_power();

    match duel(dice, attacker, monster.power) {
        DuelOutcome::AttackerWon => {
            state.board.take_monster(target);
            let (gold, coins, power) = bounty(&monster);
            let player = state.player_mut(player_id);
            player.pos = target;
            player.stats.gold = player.stats.gold.saturating_add(gold);
            player.stats.upgrade_coins = player.stats.upgrade_coins.saturating_add(coins);
            player.stats.power = player.stats.power.saturating_add(power);

            let mut message = format!("Victory! Killed {}. Gained {gold} gold.", monster.kind);
            if monster.lucky {
                message.push_str(" LUCKY DROP!");
            }
            Outcome::turn(
                Event::MonsterSlain {
                    monster,
                    gold,
                    coins,
                    power,
                },
                message,
            )
        }
        DuelOutcome::DefenderWon => {
            state.respawn(player_id);
            let player = state.player_mut(player_id);
            let before = player.stats.gold;
            player.lose_gold(MONSTER_DEFEAT_PENALTY);
            let gold_lost = before - player.stats.gold;
            Outcome::turn(
                Event::MonsterRepelled { monster, gold_lost },
                format!(
                    "Defeat! The {} was too strong. You respawned at your tower.",
                    monster.kind
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MatchSetup, MonsterKind, ScriptedDice, TurnCost};

    fn fresh_state() -> GameState {
        GameState::new(
            MatchSetup::default_for(PlayerId::One),
            MatchSetup::new("Bob", "#ef4444"),
            10,
        )
    }

    fn monster(kind: MonsterKind, power: u32, gold: u32, coins: u32, lucky: bool) -> Monster {
        Monster {
            kind,
            power,
            reward_gold: gold,
            reward_coins: coins,
            lucky,
        }
    }

    #[test]
    fn test_win_probability() {
        assert!((win_probability(5, 5) - 0.5).abs() < f64::EPSILON);
        assert!((win_probability(30, 10) - 0.75).abs() < f64::EPSILON);
        assert!(win_probability(0, 10).abs() < f64::EPSILON);
        assert!(win_probability(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_powerless_attacker_always_loses() {
        let mut dice = ScriptedDice::always_win().rolls([0.4]);
        assert_eq!(duel(&mut dice, 0, 0), DuelOutcome::DefenderWon);
        assert_eq!(duel(&mut dice, 0, 0), DuelOutcome::DefenderWon);

        let mut state = fresh_state();
        state.player_mut(PlayerId::One).stats.power = 0;
        state.player_mut(PlayerId::Two).stats.power = 0;
        state.player_mut(PlayerId::One).pos = Coord::new(4, 2);
        state.player_mut(PlayerId::Two).pos = Coord::new(5, 2);
        let mut dice = ScriptedDice::always_win().rolls([0.4]);

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(5, 2)).unwrap();
        assert!(matches!(
            outcome.event,
            Event::DuelResolved {
                outcome: DuelOutcome::DefenderWon,
                ..
            }
        ));
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(0, 2));
        assert_eq!(state.player(PlayerId::Two).pos, Coord::new(5, 2));
    }

    #[test]
    fn test_duel_threshold() {
        let mut dice = ScriptedDice::always_win().rolls([0.74, 0.75]);
        assert_eq!(duel(&mut dice, 30, 10), DuelOutcome::AttackerWon);
        assert_eq!(duel(&mut dice, 30, 10), DuelOutcome::DefenderWon);
    }

    #[test]
    fn test_plain_move() {
        let mut state = fresh_state();
        let mut dice = ScriptedDice::always_win();
        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(1, 2)).unwrap();
        assert_eq!(outcome.cost, TurnCost::AdvancesTurn);
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(1, 2));
        assert_eq!(state.player(PlayerId::One).stats.gold, 20);
    }

    #[test]
    fn test_non_adjacent_and_off_board() {
        let mut state = fresh_state();
        let mut dice = ScriptedDice::always_win();
        assert_eq!(
            attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(2, 2)),
            Err(Rejection::NotAdjacent(Coord::new(2, 2)))
        );
        assert_eq!(
            attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(1, 3)),
            Err(Rejection::NotAdjacent(Coord::new(1, 3)))
        );
        assert_eq!(
            attempt_move(&mut state, &mut dice, PlayerId::Two, Coord::new(10, 2)),
            Err(Rejection::OutOfBounds(Coord::new(10, 2)))
        );
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(0, 2));
    }

    #[test]
    fn test_undefended_tower_attack() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(8, 2);
        state.player_mut(PlayerId::Two).pos = Coord::new(5, 0);
        let mut dice = ScriptedDice::always_lose();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(9, 2)).unwrap();
        assert_eq!(outcome.message, "Attacked enemy tower for 5 damage!");
        assert_eq!(state.player(PlayerId::Two).tower_health, 95);
        // The attacker never stands on the enemy tower.
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(8, 2));
        assert!(!state.is_over());
    }

    #[test]
    fn test_defended_tower_takes_damage_either_way() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(8, 2);
        let mut dice = ScriptedDice::always_lose();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(9, 2)).unwrap();
        assert!(matches!(
            outcome.event,
            Event::TowerAttacked {
                duel: Some(DuelOutcome::DefenderWon),
                damage: 5,
                remaining: 95,
                ..
            }
        ));
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(0, 2));
        assert_eq!(state.player(PlayerId::Two).pos, Coord::new(9, 2));
        assert_eq!(state.player(PlayerId::Two).tower_health, 95);

        state.player_mut(PlayerId::One).pos = Coord::new(9, 1);
        let mut dice = ScriptedDice::always_win();
        attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(9, 2)).unwrap();
        assert_eq!(state.player(PlayerId::Two).tower_health, 90);
        assert_eq!(state.player(PlayerId::Two).pos, Coord::new(9, 2));
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(9, 1));
    }

    #[test]
    fn test_tower_destroyed_declares_winner() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(8, 2);
        state.player_mut(PlayerId::Two).pos = Coord::new(5, 0);
        state.player_mut(PlayerId::Two).tower_health = 3;
        let mut dice = ScriptedDice::always_win();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(9, 2)).unwrap();
        assert!(matches!(outcome.event, Event::TowerAttacked { destroyed: true, remaining: 0, .. }));
        assert_eq!(state.winner(), Some(PlayerId::One));
        assert!(outcome.message.ends_with("Bob's tower has fallen!"));
    }

    #[test]
    fn test_own_tower_is_walkable() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(1, 2);
        let mut dice = ScriptedDice::always_lose();
        attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(0, 2)).unwrap();
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(0, 2));
        assert_eq!(state.player(PlayerId::One).tower_health, 100);
    }

    #[test]
    fn test_player_duel_win_and_loss() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(4, 2);
        state.player_mut(PlayerId::Two).pos = Coord::new(5, 2);

        let mut dice = ScriptedDice::always_win();
        attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(5, 2)).unwrap();
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(5, 2));
        assert_eq!(state.player(PlayerId::Two).pos, Coord::new(9, 2));

        state.player_mut(PlayerId::Two).pos = Coord::new(6, 2);
        let mut dice = ScriptedDice::always_lose();
        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, Coord::new(6, 2)).unwrap();
        assert_eq!(
            outcome.message,
            "Defeat! Bob defeated you. You respawned at your tower."
        );
        assert_eq!(state.player(PlayerId::One).pos, Coord::new(0, 2));
        assert_eq!(state.player(PlayerId::Two).pos, Coord::new(6, 2));
    }

    #[test]
    fn test_monster_win_plain_rewards() {
        let mut state = fresh_state();
        let target = Coord::new(1, 2);
        state
            .board
            .place_monster(target, monster(MonsterKind::Orc, 9, 20, 2, false));
        let mut dice = ScriptedDice::always_win();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, target).unwrap();
        assert_eq!(outcome.message, "Victory! Killed Orc. Gained 20 gold.");
        let player = state.player(PlayerId::One);
        assert_eq!(player.pos, target);
        assert_eq!(player.stats.gold, 40);
        assert_eq!(player.stats.upgrade_coins, 4);
        assert_eq!(player.stats.power, 5);
        assert!(state.board.monster_at(target).is_none());
    }

    #[test]
    fn test_lucky_monster_bonus() {
        let mut state = fresh_state();
        let target = Coord::new(0, 1);
        state
            .board
            .place_monster(target, monster(MonsterKind::Dragon, 20, 75, 3, true));
        let mut dice = ScriptedDice::always_win();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, target).unwrap();
        assert!(outcome.message.ends_with("LUCKY DROP!"));
        let player = state.player(PlayerId::One);
        assert_eq!(player.stats.gold, 20 + 112);
        assert_eq!(player.stats.upgrade_coins, 2 + 4);
        assert_eq!(player.stats.power, 15);
    }

    #[test]
    fn test_monster_loss_penalty_clamps() {
        let mut state = fresh_state();
        state.player_mut(PlayerId::One).pos = Coord::new(3, 3);
        state.player_mut(PlayerId::One).stats.gold = 3;
        let target = Coord::new(3, 4);
        let zombie = monster(MonsterKind::Zombie, 4, 6, 0, false);
        state.board.place_monster(target, zombie);
        let mut dice = ScriptedDice::always_lose();

        let outcome = attempt_move(&mut state, &mut dice, PlayerId::One, target).unwrap();
        assert_eq!(
            outcome.event,
            Event::MonsterRepelled {
                monster: zombie,
                gold_lost: 3
            }
        );
        let player = state.player(PlayerId::One);
        assert_eq!(player.stats.gold, 0);
        assert_eq!(player.pos, Coord::new(0, 2));
        assert_eq!(state.board.monster_at(target), Some(&zombie));
    }
}
