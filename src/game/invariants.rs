//! Match invariants - sanity checks that detect bugs.
//!
//! Every command handler validates before it mutates, so none of these should
//! ever fire. [`assert_invariants`] runs after each accepted command in debug
//! builds.

use std::collections::HashSet;

use crate::game::{
    max_tower_health, BuildingKind, GameState, Phase, PlayerId, Tile, MAX_EQUIPPED, MAX_LEVEL,
    MAX_FORGES, MAX_MINES,
};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all match invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    for player in &state.players {
        let id = player.id;
        if player.tower_level == 0 || player.tower_level > MAX_LEVEL {
            violation(format!("{id} tower level {} outside 1..=4", player.tower_level));
        }
        let max = max_tower_health(player.tower_level);
        if player.tower_health > max {
            violation(format!(
                "{id} tower health {} exceeds max {max}",
                player.tower_health
            ));
        }
        if !state.board.in_bounds(player.pos) {
            violation(format!("{id} stands off the board at {}", player.pos));
        }
        if player.equipped.len() > MAX_EQUIPPED {
            violation(format!("{id} has {} weapons equipped", player.equipped.len()));
        }
        let mut seen = HashSet::new();
        for instance in &player.equipped {
            if player.weapon(*instance).is_none() {
                violation(format!("{id} has equipped {instance} outside inventory"));
            }
            if !seen.insert(*instance) {
                violation(format!("{id} has {instance} equipped twice"));
            }
        }
        let kinds: HashSet<_> = player.inventory.iter().map(|w| w.kind).collect();
        if kinds.len() != player.inventory.len() {
            violation(format!("{id} owns the same catalog weapon twice"));
        }

        let mines = state.board.count_buildings(id, BuildingKind::GoldMine);
        if mines > MAX_MINES {
            violation(format!("{id} owns {mines} gold mines"));
        }
        let forges = state.board.count_buildings(id, BuildingKind::Forge);
        if forges > MAX_FORGES {
            violation(format!("{id} owns {forges} forges"));
        }

        let origin = state.board.tower_origin(id);
        if state.board.tile(origin) != Some(Tile::Tower { owner: id }) {
            violation(format!("{id} tower missing from {origin}"));
        }
    }

    let mut instances = HashSet::new();
    for weapon in state.players.iter().flat_map(|p| &p.inventory) {
        if !instances.insert(weapon.instance) {
            violation(format!("weapon instance {} is not unique", weapon.instance));
        }
        if weapon.instance.0 >= state.next_weapon_instance() {
            violation(format!(
                "weapon instance {} was never allocated",
                weapon.instance
            ));
        }
    }

    let mut towers = 0;
    for (coord, cell) in state.board.iter() {
        match cell.tile {
            Tile::Tower { .. } => towers += 1,
            Tile::Mine { level, .. } | Tile::Forge { level, .. } => {
                if level == 0 || level > MAX_LEVEL {
                    violation(format!("building at {coord} has level {level}"));
                }
            }
            Tile::Empty => {}
        }
        if cell.monster.is_some() && !cell.tile.is_empty() {
            violation(format!("monster stands on a structure at {coord}"));
        }
    }
    if towers != PlayerId::ALL.len() {
        violation(format!("board has {towers} towers"));
    }

    if let Phase::Won(winner) = state.phase {
        let loser = state.player(winner.other());
        if loser.tower_health != 0 {
            violation(format!(
                "{winner} won but {} tower has {} health",
                loser.id, loser.tower_health
            ));
        }
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
