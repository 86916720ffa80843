// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tower Siege: a deterministic two-player tower siege rules engine.
//!
//! Two players share a 10×5 board, each with a home tower on opposite edges.
//! On their turn a player moves one step (fighting monsters, the enemy, or
//! the enemy tower), builds gold mines and a forge, upgrades structures,
//! buys weapons, or passes. The first player to bring the enemy tower to
//! zero health wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Host (CLI, MatchHandle, ...)      │
//! ├─────────────────────────────────────┤
//! │   Match: gates, log, turn order     │
//! ├─────────────────────────────────────┤
//! │   Rules: combat, construction,      │
//! │   upgrades, weapons, economy        │
//! ├─────────────────────────────────────┤
//! │   Board / players / Dice            │
//! └─────────────────────────────────────┘
//! ```
//!
//! All randomness goes through [`game::Dice`], so a match is reproducible
//! from its seed.
//!
//! ```
//! use tower_siege::{start_match, MatchConfig, MatchSetup, PlayerId};
//!
//! let mut game = start_match(
//!     MatchSetup::new("Ann", "#3b82f6"),
//!     MatchSetup::new("Bob", "#ef4444"),
//!     MatchConfig::default().with_seed(7),
//! );
//! let report = game.apply(PlayerId::One, "end".parse().unwrap());
//! assert!(report.accepted);
//! assert_eq!(game.state().active, PlayerId::Two);
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod session;

pub use config::MatchConfig;
pub use error::{ConfigError, Rejection, SessionError};

// Re-export key game types at crate root for convenience
pub use game::{
    start_match, BuildingKind, Command, Coord, GameState, Match, MatchSetup, Phase, Player,
    PlayerId, Report, Resource, Tile, TurnCost, WeaponId,
};
pub use session::MatchHandle;
