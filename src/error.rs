//! Error types for the match engine.

use thiserror::Error;

use crate::game::{BuildingKind, Coord, PlayerId, WeaponId, WeaponInstanceId};

/// Why a command was refused.
///
/// Every variant is a validation failure: the state is left untouched and the
/// turn does not advance. The `Display` text is the line written to the
/// match's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Command issued before the match was started.
    #[error("The match has not started yet.")]
    NotStarted,
    /// `start` issued twice.
    #[error("The match has already started.")]
    AlreadyStarted,
    /// Command issued after a tower fell.
    #[error("The match is over.")]
    MatchOver,
    /// Command issued by the player who is not active.
    #[error("It is not {0}'s turn.")]
    NotYourTurn(PlayerId),
    /// Move target is not exactly one step away.
    #[error("{0} is not adjacent.")]
    NotAdjacent(Coord),
    /// Move target is off the board.
    #[error("{0} is off the board.")]
    OutOfBounds(Coord),
    /// Player already owns the maximum number of gold mines.
    #[error("Maximum 4 Gold Mines allowed!")]
    MineLimit,
    /// Player already owns a forge.
    #[error("You already have a Forge!")]
    ForgeLimit,
    /// Not enough gold for a purchase.
    #[error("Not enough gold! Need {needed}G.")]
    NotEnoughGold {
        /// Price of the purchase.
        needed: u32,
        /// Gold the player holds.
        available: u32,
    },
    /// None of the placement candidates around the tower is free.
    #[error("No space left near your tower for a {0}!")]
    NoSpace(BuildingKind),
    /// Upgrade target is not the player's tower or one of their buildings.
    #[error("Cannot upgrade {0}!")]
    NotUpgradable(Coord),
    /// Upgrade target is already level 4.
    #[error("Already at max level!")]
    MaxLevel,
    /// Not enough upgrade coins.
    #[error("Need {needed} upgrade coins!")]
    NotEnoughCoins {
        /// Coin price of the upgrade.
        needed: u32,
        /// Coins the player holds.
        available: u32,
    },
    /// Weapon tier exceeds the player's forge level (or they have no forge).
    #[error("Need level {0} Forge!")]
    ForgeTierTooLow(u8),
    /// Player already owns this catalog weapon.
    #[error("You already own {0}!")]
    AlreadyOwned(WeaponId),
    /// Equipping would exceed the equip slots.
    #[error("Maximum 4 weapons equipped!")]
    EquipLimit,
    /// No such weapon instance in the player's inventory.
    #[error("No weapon {0} in inventory.")]
    UnknownWeapon(WeaponInstanceId),
}

impl Rejection {
    /// Whether the rejection is recorded in the event log.
    ///
    /// Phase gate failures and illegal move targets leave the log untouched.
    /// Out-of-turn commands and every rule failure are logged.
    #[must_use]
    pub const fn is_logged(&self) -> bool {
        !matches!(
            self,
            Rejection::NotStarted
                | Rejection::AlreadyStarted
                | Rejection::MatchOver
                | Rejection::NotAdjacent(_)
                | Rejection::OutOfBounds(_)
        )
    }
}

/// Failures of the shared match handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A thread panicked while holding the match lock.
    #[error("match lock poisoned")]
    Poisoned,
}

/// Failures loading a [`MatchConfig`](crate::MatchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for a config.
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
