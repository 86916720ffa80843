//! Match configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::DEFAULT_LOG_CAPACITY;

/// Monsters seeded at match start.
pub const DEFAULT_INITIAL_MONSTERS: usize = 2;

/// Coordinate samples allowed for the initial monster seeding.
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 20;

/// Configuration for a match.
///
/// Board size and rule tables are fixed; only randomness and seeding knobs
/// are configurable. Missing JSON fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Dice seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Monsters to place at start.
    pub initial_monsters: usize,
    /// Coordinate samples for placing them.
    pub spawn_attempts: u32,
    /// Event log lines kept.
    pub log_capacity: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_monsters: DEFAULT_INITIAL_MONSTERS,
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl MatchConfig {
    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Same config with a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
