//! Injectable randomness.
//!
//! Every random draw the engine makes (duel rolls, monster archetype and
//! stat draws, spawn coordinates) goes through [`Dice`], so a match can be
//! replayed from a seed or driven by a fixed script in tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of random draws for combat and spawning.
pub trait Dice {
    /// Uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform integer in `low..=high`. Returns `low` when `high <= low`.
    fn between(&mut self, low: u32, high: u32) -> u32;
}

/// Seedable dice backed by ChaCha8.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Create dice from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create dice seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Dice that replay queued values, then fall back to fixed defaults.
///
/// Integer draws take the next queued pick clamped into range; once the queue
/// is empty they return `low`.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    picks: VecDeque<u32>,
    fallback_roll: f64,
}

impl ScriptedDice {
    /// Dice whose rolls are always 0.0: every duel is won by the attacker
    /// as long as the attacker has any power.
    #[must_use]
    pub fn always_win() -> Self {
        Self::with_fallback(0.0)
    }

    /// Dice whose rolls are just below 1.0: every duel is lost unless the
    /// defender has no power.
    #[must_use]
    pub fn always_lose() -> Self {
        Self::with_fallback(1.0 - f64::EPSILON)
    }

    /// Dice that return `roll` once the queues run dry.
    #[must_use]
    pub fn with_fallback(roll: f64) -> Self {
        Self {
            rolls: VecDeque::new(),
            picks: VecDeque::new(),
            fallback_roll: roll.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }

    /// Queue explicit roll values.
    #[must_use]
    pub fn rolls(mut self, rolls: impl IntoIterator<Item = f64>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue explicit integer draws.
    #[must_use]
    pub fn picks(mut self, picks: impl IntoIterator<Item = u32>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback_roll)
    }

    fn between(&mut self, low: u32, high: u32) -> u32 {
        let high = high.max(low);
        self.picks
            .pop_front()
            .map_or(low, |pick| pick.clamp(low, high))
    }
}
