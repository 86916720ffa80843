//! Monster catalog and spawner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Board, Coord, Dice};

/// Monster species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Weakest archetype.
    Zombie,
    /// Steady single-coin drop.
    Skeleton,
    /// Tougher, better paying.
    Orc,
    /// Rare and lucky.
    Dragon,
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonsterKind::Zombie => "Zombie",
            MonsterKind::Skeleton => "Skeleton",
            MonsterKind::Orc => "Orc",
            MonsterKind::Dragon => "Dragon",
        };
        f.write_str(name)
    }
}

/// Spawn table entry. All ranges are inclusive `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    /// Species spawned from this entry.
    pub kind: MonsterKind,
    /// Combat power range.
    pub power: (u32, u32),
    /// Gold reward range.
    pub gold: (u32, u32),
    /// Upgrade-coin reward range.
    pub coins: (u32, u32),
    /// Lucky monsters pay bonus rewards when slain.
    pub lucky: bool,
}

/// Fixed monster table; archetypes are picked uniformly.
pub const ARCHETYPES: [Archetype; 4] = [
    Archetype {
        kind: MonsterKind::Zombie,
        power: (3, 6),
        gold: (5, 10),
        coins: (0, 1),
        lucky: false,
    },
    Archetype {
        kind: MonsterKind::Skeleton,
        power: (5, 8),
        gold: (8, 15),
        coins: (1, 1),
        lucky: false,
    },
    Archetype {
        kind: MonsterKind::Orc,
        power: (8, 12),
        gold: (15, 25),
        coins: (1, 2),
        lucky: false,
    },
    Archetype {
        kind: MonsterKind::Dragon,
        power: (15, 25),
        gold: (50, 100),
        coins: (2, 5),
        lucky: true,
    },
];

/// A spawned monster. Immutable until it is defeated and removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    /// Species.
    pub kind: MonsterKind,
    /// Combat power.
    pub power: u32,
    /// Base gold paid to the player who slays it.
    pub reward_gold: u32,
    /// Base upgrade coins paid to the player who slays it.
    pub reward_coins: u32,
    /// Whether the slayer gets the lucky bonus.
    pub lucky: bool,
}

/// Roll a random monster: archetype first, then each stat within its range.
pub fn spawn_monster(dice: &mut impl Dice) -> Monster {
    #[allow(clippy::cast_possible_truncation)]
    let last = (ARCHETYPES.len() - 1) as u32;
    let archetype = &ARCHETYPES[dice.between(0, last) as usize];

    Monster {
        kind: archetype.kind,
        power: dice.between(archetype.power.0, archetype.power.1),
        reward_gold: dice.between(archetype.gold.0, archetype.gold.1),
        reward_coins: dice.between(archetype.coins.0, archetype.coins.1),
        lucky: archetype.lucky,
    }
}

/// Scatter up to `count` monsters over empty tiles.
///
/// Samples random coordinates at most `attempts` times, skipping any tile
/// that holds a structure or a monster. Returns the number placed, which may
/// be fewer than `count`.
pub fn seed_monsters(board: &mut Board, dice: &mut impl Dice, count: usize, attempts: u32) -> usize {
    let mut spawned = 0;
    let mut tries = 0;

    while spawned < count && tries < attempts {
        tries += 1;
        let x = dice.between(0, u32::from(board.width()) - 1);
        let y = dice.between(0, u32::from(board.height()) - 1);
        #[allow(clippy::cast_possible_truncation)]
        let coord = Coord::new(x as u16, y as u16);

        let vacant = board.get(coord).is_some_and(|cell| cell.is_vacant());
        if !vacant {
            tracing::trace!(%coord, "spawn attempt skipped occupied tile");
            continue;
        }

        let monster = spawn_monster(dice);
        if board.place_monster(coord, monster) {
            tracing::trace!(%coord, kind = %monster.kind, "monster spawned");
            spawned += 1;
        }
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PlayerId, ScriptedDice, SeededDice, Tile};

    #[test]
    fn test_only_rarest_archetype_is_lucky() {
        let lucky: Vec<_> = ARCHETYPES.iter().filter(|a| a.lucky).collect();
        assert_eq!(lucky.len(), 1);
        assert_eq!(lucky[0].kind, MonsterKind::Dragon);
    }

    #[test]
    fn test_spawn_within_archetype_ranges() {
        let mut dice = SeededDice::new(1234);
        for _ in 0..2000 {
            let monster = spawn_monster(&mut dice);
            let archetype = ARCHETYPES
                .iter()
                .find(|a| a.kind == monster.kind)
                .unwrap();
            assert!((archetype.power.0..=archetype.power.1).contains(&monster.power));
            assert!((archetype.gold.0..=archetype.gold.1).contains(&monster.reward_gold));
            assert!((archetype.coins.0..=archetype.coins.1).contains(&monster.reward_coins));
            assert_eq!(monster.lucky, archetype.lucky);
        }
    }

    #[test]
    fn test_spawn_scripted_picks() {
        // Dragon, power 20, gold 60, coins 3
        let mut dice = ScriptedDice::always_win().picks([3, 20, 60, 3]);
        let monster = spawn_monster(&mut dice);
        assert_eq!(monster.kind, MonsterKind::Dragon);
        assert_eq!(monster.power, 20);
        assert_eq!(monster.reward_gold, 60);
        assert_eq!(monster.reward_coins, 3);
        assert!(monster.lucky);
    }

    #[test]
    fn test_seed_places_on_empty_tiles_only() {
        let mut board = Board::standard();
        // First sample hits player 1's tower, second lands on (4, 1),
        // third lands on (4, 1) again, fourth on (5, 3).
        let mut dice = ScriptedDice::always_win().picks([
            0, 2, // tower, skipped
            4, 1, 0, 3, 5, 0, // zombie at (4, 1)
            4, 1, // occupied, skipped
            5, 3, 0, 3, 5, 0, // zombie at (5, 3)
        ]);
        let placed = seed_monsters(&mut board, &mut dice, 2, 20);
        assert_eq!(placed, 2);
        assert!(board.monster_at(Coord::new(4, 1)).is_some());
        assert!(board.monster_at(Coord::new(5, 3)).is_some());
        assert!(board.monster_at(Coord::new(0, 2)).is_none());
    }

    #[test]
    fn test_seed_gives_up_after_attempt_budget() {
        let mut board = Board::standard();
        for x in 0..board.width() {
            for y in 0..board.height() {
                if board.tile(Coord::new(x, y)) == Some(Tile::Empty) {
                    board.set_tile(
                        Coord::new(x, y),
                        Tile::Mine {
                            owner: PlayerId::One,
                            level: 1,
                        },
                    );
                }
            }
        }
        let mut dice = SeededDice::new(5);
        assert_eq!(seed_monsters(&mut board, &mut dice, 2, 20), 0);
        assert_eq!(board.monsters().count(), 0);
    }
}
