//! Player state management.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::{max_tower_health, Coord, Level, OwnedWeapon, WeaponId, WeaponInstanceId};

/// Power a player starts with.
pub const INITIAL_POWER: u32 = 5;
/// Gold a player starts with.
pub const INITIAL_GOLD: u32 = 20;
/// Upgrade coins a player starts with.
pub const INITIAL_COINS: u32 = 2;

/// One of the two seats in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// Moves first; tower on the left edge.
    One,
    /// Tower on the right edge.
    Two,
}

impl PlayerId {
    /// Both players, in turn order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The opponent.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index into per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => write!(f, "Player 1"),
            PlayerId::Two => write!(f, "Player 2"),
        }
    }
}

/// Error parsing a [`PlayerId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player `{0}` (expected p1 or p2)")]
pub struct ParsePlayerError(String);

impl FromStr for PlayerId {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "p1" | "player1" => Ok(PlayerId::One),
            "2" | "p2" | "player2" => Ok(PlayerId::Two),
            _ => Err(ParsePlayerError(s.to_string())),
        }
    }
}

/// Name and color chosen for a seat before the match starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Display name.
    pub name: String,
    /// Display color (CSS hex string); opaque to the engine.
    pub color: String,
}

impl MatchSetup {
    /// Create a setup entry.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Default setup for a seat.
    #[must_use]
    pub fn default_for(id: PlayerId) -> Self {
        match id {
            PlayerId::One => Self::new("Player 1", "#3b82f6"),
            PlayerId::Two => Self::new("Player 2", "#ef4444"),
        }
    }
}

/// Spendable resources and base power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Base power, excluding weapons.
    pub power: u32,
    /// Gold.
    pub gold: u32,
    /// Upgrade coins.
    pub upgrade_coins: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            power: INITIAL_POWER,
            gold: INITIAL_GOLD,
            upgrade_coins: INITIAL_COINS,
        }
    }
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Token position.
    pub pos: Coord,
    /// Resources and base power.
    pub stats: Stats,
    /// Remaining tower health, within `0..=max_tower_health(tower_level)`.
    pub tower_health: u32,
    /// Tower level (1..=4).
    pub tower_level: Level,
    /// Every weapon the player owns.
    pub inventory: Vec<OwnedWeapon>,
    /// Instance ids of equipped weapons; a subset of the inventory.
    pub equipped: Vec<WeaponInstanceId>,
}

impl Player {
    /// Create a fresh player standing on their tower.
    #[must_use]
    pub fn new(id: PlayerId, setup: MatchSetup, origin: Coord) -> Self {
        Self {
            id,
            name: setup.name,
            color: setup.color,
            pos: origin,
            stats: Stats::default(),
            tower_health: max_tower_health(1),
            tower_level: 1,
            inventory: Vec::new(),
            equipped: Vec::new(),
        }
    }

    /// Combat power: base power plus all equipped weapons.
    #[must_use]
    pub fn total_power(&self) -> u32 {
        self.equipped_weapons()
            .map(|w| w.kind.spec().power)
            .fold(self.stats.power, u32::saturating_add)
    }

    /// Iterate over equipped weapons.
    pub fn equipped_weapons(&self) -> impl Iterator<Item = &OwnedWeapon> {
        self.inventory
            .iter()
            .filter(|w| self.equipped.contains(&w.instance))
    }

    /// Find an owned weapon by instance id.
    #[must_use]
    pub fn weapon(&self, instance: WeaponInstanceId) -> Option<&OwnedWeapon> {
        self.inventory.iter().find(|w| w.instance == instance)
    }

    /// Check whether an instance is currently equipped.
    #[must_use]
    pub fn is_equipped(&self, instance: WeaponInstanceId) -> bool {
        self.equipped.contains(&instance)
    }

    /// Check whether the player already owns a weapon of this catalog entry.
    #[must_use]
    pub fn owns_kind(&self, kind: WeaponId) -> bool {
        self.inventory.iter().any(|w| w.kind == kind)
    }

    /// Deduct gold, stopping at zero.
    pub fn lose_gold(&mut self, amount: u32) {
        self.stats.gold = self.stats.gold.saturating_sub(amount);
    }

    /// Deal damage to this player's tower. Returns remaining health.
    pub fn damage_tower(&mut self, damage: u32) -> u32 {
        self.tower_health = self.tower_health.saturating_sub(damage);
        self.tower_health
    }
}
