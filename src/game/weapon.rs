//! Weapon catalog, shop, and equip slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::game::{Event, GameState, Outcome, PlayerId};

/// Number of weapons a player can have equipped at once.
pub const MAX_EQUIPPED: usize = 4;

/// Catalog entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponId {
    /// w1
    RustyDagger,
    /// w2
    ShortSword,
    /// w3
    IronMace,
    /// w4
    WarHammer,
    /// w5
    MagicWand,
    /// w6
    ExcaliburFragment,
    /// w7
    DragonSlayerAxe,
    /// w8
    GodKillerSpear,
}

/// Static description of a weapon for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSpec {
    /// Catalog identifier.
    pub id: WeaponId,
    /// Short shop code (`w1`..`w8`).
    pub code: &'static str,
    /// Display name; ownership is unique per name.
    pub name: &'static str,
    /// Power added while equipped.
    pub power: u32,
    /// Gold price.
    pub cost: u32,
    /// Minimum forge level required to buy.
    pub tier: u8,
    /// Icon hint for hosts.
    pub icon: &'static str,
    /// Color hint for hosts.
    pub color: &'static str,
}

/// The shop, ordered by tier.
pub static CATALOG: [WeaponSpec; 8] = [
    WeaponSpec {
        id: WeaponId::RustyDagger,
        code: "w1",
        name: "Rusty Dagger",
        power: 2,
        cost: 10,
        tier: 1,
        icon: "dagger",
        color: "#94a3b8",
    },
    WeaponSpec {
        id: WeaponId::ShortSword,
        code: "w2",
        name: "Short Sword",
        power: 5,
        cost: 25,
        tier: 1,
        icon: "sword",
        color: "#cbd5e1",
    },
    WeaponSpec {
        id: WeaponId::IronMace,
        code: "w3",
        name: "Iron Mace",
        power: 10,
        cost: 50,
        tier: 2,
        icon: "mace",
        color: "#64748b",
    },
    WeaponSpec {
        id: WeaponId::WarHammer,
        code: "w4",
        name: "War Hammer",
        power: 20,
        cost: 100,
        tier: 2,
        icon: "hammer",
        color: "#475569",
    },
    WeaponSpec {
        id: WeaponId::MagicWand,
        code: "w5",
        name: "Magic Wand",
        power: 40,
        cost: 250,
        tier: 3,
        icon: "wand",
        color: "#3b82f6",
    },
    WeaponSpec {
        id: WeaponId::ExcaliburFragment,
        code: "w6",
        name: "Excalibur Fragment",
        power: 80,
        cost: 600,
        tier: 3,
        icon: "sword",
        color: "#f59e0b",
    },
    WeaponSpec {
        id: WeaponId::DragonSlayerAxe,
        code: "w7",
        name: "Dragon Slayer Axe",
        power: 150,
        cost: 1500,
        tier: 4,
        icon: "axe",
        color: "#ef4444",
    },
    WeaponSpec {
        id: WeaponId::GodKillerSpear,
        code: "w8",
        name: "God Killer Spear",
        power: 500,
        cost: 5000,
        tier: 4,
        icon: "spear",
        color: "#a855f7",
    },
];

impl WeaponId {
    /// Catalog data for this weapon.
    #[must_use]
    pub fn spec(self) -> &'static WeaponSpec {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// Error parsing a [`WeaponId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weapon `{0}` (expected w1..w8 or a catalog name)")]
pub struct ParseWeaponError(String);

impl FromStr for WeaponId {
    type Err = ParseWeaponError;

    /// Accepts a shop code (`w3`) or a name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CATALOG
            .iter()
            .find(|spec| {
                spec.code.eq_ignore_ascii_case(needle) || spec.name.eq_ignore_ascii_case(needle)
            })
            .map(|spec| spec.id)
            .ok_or_else(|| ParseWeaponError(s.to_string()))
    }
}

/// Match-wide unique identifier of an owned weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponInstanceId(pub u32);

impl fmt::Display for WeaponInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A weapon in a player's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedWeapon {
    /// Unique instance id.
    pub instance: WeaponInstanceId,
    /// Catalog entry.
    pub kind: WeaponId,
}

/// Buy a weapon from the catalog.
///
/// Requires a forge of at least the weapon's tier, no existing weapon of the
/// same catalog entry, and enough gold. The new weapon is equipped
/// automatically when a slot is free. Consumes the turn.
///
/// # Errors
///
/// Returns the first failed requirement; nothing is changed in that case.
pub fn buy_weapon(
    state: &mut GameState,
    player_id: PlayerId,
    kind: WeaponId,
) -> Result<Outcome, Rejection> {
    let spec = kind.spec();
    let forge_level = state.board.forge_level(player_id).unwrap_or(0);
    if spec.tier > forge_level {
        return Err(Rejection::ForgeTierTooLow(spec.tier));
    }

    let player = state.player(player_id);
    if player.owns_kind(kind) {
        return Err(Rejection::AlreadyOwned(kind));
    }
    if player.stats.gold < spec.cost {
        return Err(Rejection::NotEnoughGold {
            needed: spec.cost,
            available: player.stats.gold,
        });
    }

    let weapon = OwnedWeapon {
        instance: state.allocate_weapon_instance(),
        kind,
    };
    let player = state.player_mut(player_id);
    player.stats.gold -= spec.cost;
    player.inventory.push(weapon);
    let equipped = player.equipped.len() < MAX_EQUIPPED;
    if equipped {
        player.equipped.push(weapon.instance);
    }

    let message = if equipped {
        format!("Bought {} and equipped it!", spec.name)
    } else {
        format!("Bought {}!", spec.name)
    };
    Ok(Outcome::turn(
        Event::WeaponBought {
            weapon,
            cost: spec.cost,
            equipped,
        },
        message,
    ))
}

/// Equip or unequip an owned weapon. Never consumes the turn.
///
/// # Errors
///
/// Fails if the instance is not in the inventory, or if equipping would
/// exceed [`MAX_EQUIPPED`].
pub fn toggle_weapon(
    state: &mut GameState,
    player_id: PlayerId,
    instance: WeaponInstanceId,
) -> Result<Outcome, Rejection> {
    let player = state.player_mut(player_id);
    let Some(weapon) = player.weapon(instance).copied() else {
        return Err(Rejection::UnknownWeapon(instance));
    };

    if player.is_equipped(instance) {
        player.equipped.retain(|&id| id != instance);
        return Ok(Outcome::free(
            Event::WeaponUnequipped { weapon },
            format!("Unequipped {}.", weapon.kind),
        ));
    }

    if player.equipped.len() >= MAX_EQUIPPED {
        return Err(Rejection::EquipLimit);
    }
    player.equipped.push(instance);
    Ok(Outcome::free(
        Event::WeaponEquipped { weapon },
        format!("Equipped {}.", weapon.kind),
    ))
}
