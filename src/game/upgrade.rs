//! Tower and building upgrades.
//!
//! Levels run 1..=4. Raising a level costs upgrade coins (1, 2, then 4).
//! Upgrading a tower resets its health to the new level's maximum rather
//! than adding to it.

use crate::error::Rejection;
use crate::game::{Coord, Event, GameState, Level, Outcome, PlayerId, Tile, MAX_LEVEL};

/// Maximum tower health by level.
#[must_use]
pub const fn max_tower_health(level: Level) -> u32 {
    match level {
        0 | 1 => 100,
        2 => 1000,
        3 => 2000,
        _ => 3500,
    }
}

/// Coin cost to reach `next_level`, or `None` outside 2..=4.
#[must_use]
pub const fn upgrade_cost(next_level: Level) -> Option<u32> {
    match next_level {
        2 => Some(1),
        3 => Some(2),
        4 => Some(4),
        _ => None,
    }
}

/// What an upgrade applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tower,
    Building,
}

/// Raise the level of the player's tower or one of their buildings at `at`.
///
/// # Errors
///
/// Fails if the tile is neither, if it is already at [`MAX_LEVEL`], or if the
/// player cannot pay the coin cost.
pub fn upgrade(state: &mut GameState, player_id: PlayerId, at: Coord) -> Result<Outcome, Rejection> {
    let player = state.player(player_id);

    let (target, current) = match state.board.tile(at) {
        Some(Tile::Tower { owner }) if owner == player_id => (Target::Tower, player.tower_level),
        Some(Tile::Mine { owner, level } | Tile::Forge { owner, level }) if owner == player_id => {
            (Target::Building, level)
        }
        _ => return Err(Rejection::NotUpgradable(at)),
    };

    if current >= MAX_LEVEL {
        return Err(Rejection::MaxLevel);
    }
    let next = current + 1;
    let Some(cost) = upgrade_cost(next) else {
        return Err(Rejection::MaxLevel);
    };
    if player.stats.upgrade_coins < cost {
        return Err(Rejection::NotEnoughCoins {
            needed: cost,
            available: player.stats.upgrade_coins,
        });
    }

    let label = match target {
        Target::Tower => {
            let player = state.player_mut(player_id);
            player.tower_level = next;
            player.tower_health = max_tower_health(next);
            "Tower".to_string()
        }
        Target::Building => {
            let mut label = String::new();
            if let Some(cell) = state.board.get_mut(at) {
                match &mut cell.tile {
                    Tile::Mine { level, .. } => {
                        *level = next;
                        label = "Gold Mine".to_string();
                    }
                    Tile::Forge { level, .. } => {
                        *level = next;
                        label = "Forge".to_string();
                    }
                    Tile::Empty | Tile::Tower { .. } => {}
                }
            }
            label
        }
    };
    state.player_mut(player_id).stats.upgrade_coins -= cost;

    Ok(Outcome::turn(
        Event::Upgraded {
            at,
            level: next,
            coins_spent: cost,
            tower: target == Target::Tower,
        },
        format!("Upgraded {label} to level {next}!"),
    ))
}
