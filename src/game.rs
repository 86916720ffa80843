//! Rules engine for Tower Siege.
//!
//! Implements the match on a fixed 10×5 board:
//! - Board with two towers, gold mines and forges
//! - Players with power, gold, upgrade coins and weapons
//! - Monsters seeded at start
//! - Movement, duels and tower sieges
//! - Construction, upgrades, the weapon shop and mine income
//! - The [`Match`] command surface that gates and sequences all of it

mod board;
mod combat;
mod commands;
mod construction;
mod dice;
mod economy;
mod invariants;
mod log;
mod monster;
mod player;
mod state;
mod upgrade;
mod weapon;

pub use board::{Board, BuildingKind, Cell, Coord, Level, Tile, BOARD_HEIGHT, BOARD_WIDTH, MAX_LEVEL};
pub use combat::{
    attempt_move, bounty, duel, win_probability, DuelOutcome, LUCKY_COIN_BONUS, LUCKY_POWER_BONUS,
    MONSTER_DEFEAT_PENALTY,
};
pub use commands::{
    start_match, Command, Event, Match, Outcome, ParseCommandError, Report, Resource, TurnCost,
};
pub use construction::{
    build, build_cost, find_build_site, FORGE_COST, MAX_FORGES, MAX_MINES, PLACEMENT_OFFSETS,
};
pub use dice::{Dice, ScriptedDice, SeededDice};
pub use economy::{end_turn, grant, mine_income, mine_yield};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use log::{EventLog, DEFAULT_LOG_CAPACITY};
pub use monster::{seed_monsters, spawn_monster, Archetype, Monster, MonsterKind, ARCHETYPES};
pub use player::{
    MatchSetup, ParsePlayerError, Player, PlayerId, Stats, INITIAL_COINS, INITIAL_GOLD,
    INITIAL_POWER,
};
pub use state::{GameState, Phase};
pub use upgrade::{max_tower_health, upgrade, upgrade_cost};
pub use weapon::{
    buy_weapon, toggle_weapon, OwnedWeapon, ParseWeaponError, WeaponId, WeaponInstanceId,
    WeaponSpec, CATALOG, MAX_EQUIPPED,
};
