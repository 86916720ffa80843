//! Shared single-writer handle over a match.
//!
//! The engine itself does no locking. Hosts that take commands from several
//! threads (one per connected seat, say) share a [`MatchHandle`]; every
//! command takes the write lock, so commands for one match are serialized.

use std::sync::{Arc, RwLock};

use crate::error::SessionError;
use crate::game::{Command, Dice, GameState, Match, PlayerId, Report, SeededDice};

/// Cloneable handle to a match behind a lock.
pub struct MatchHandle<D: Dice = SeededDice> {
    inner: Arc<RwLock<Match<D>>>,
}

// Manual impls: derives would require `D: Clone` / `D: Debug`.
impl<D: Dice> Clone for MatchHandle<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Dice> std::fmt::Debug for MatchHandle<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchHandle")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<D: Dice> MatchHandle<D> {
    /// Take ownership of a match.
    #[must_use]
    pub fn new(game: Match<D>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(game)),
        }
    }

    /// Apply a command under the write lock.
    ///
    /// # Errors
    ///
    /// [`SessionError::Poisoned`] if another thread panicked mid-command.
    pub fn apply(&self, player: PlayerId, command: Command) -> Result<Report, SessionError> {
        let mut game = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        Ok(game.apply(player, command))
    }

    /// Copy of the current state.
    ///
    /// # Errors
    ///
    /// [`SessionError::Poisoned`] if another thread panicked mid-command.
    pub fn snapshot(&self) -> Result<GameState, SessionError> {
        let game = self.inner.read().map_err(|_| SessionError::Poisoned)?;
        Ok(game.state().clone())
    }

    /// Whose turn it is.
    ///
    /// # Errors
    ///
    /// [`SessionError::Poisoned`] if another thread panicked mid-command.
    pub fn active(&self) -> Result<PlayerId, SessionError> {
        let game = self.inner.read().map_err(|_| SessionError::Poisoned)?;
        Ok(game.state().active)
    }
}
