//! Match state.

use serde::{Deserialize, Serialize};

use crate::game::{Board, Coord, EventLog, MatchSetup, Player, PlayerId, WeaponInstanceId};

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Created but not started; every command is refused.
    NotStarted,
    /// Players are taking turns.
    InProgress,
    /// A tower fell. Terminal.
    Won(PlayerId),
}

/// Complete match state.
///
/// This is the canonical serialization of a match. Mutate it only through
/// the command handlers; direct field access is for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    pub board: Board,
    /// Both players, indexed by [`PlayerId::index`].
    pub players: [Player; 2],
    /// Whose turn it is.
    pub active: PlayerId,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Recent event lines, newest first.
    pub log: EventLog,
    /// Next weapon instance id to hand out.
    next_weapon_instance: u32,
}

impl GameState {
    /// Create an unstarted match on the standard board.
    #[must_use]
    pub fn new(p1: MatchSetup, p2: MatchSetup, log_capacity: usize) -> Self {
        let board = Board::standard();
        let players = [
            Player::new(PlayerId::One, p1, board.tower_origin(PlayerId::One)),
            Player::new(PlayerId::Two, p2, board.tower_origin(PlayerId::Two)),
        ];
        let mut log = EventLog::with_capacity(log_capacity);
        log.push("Welcome to Tower Siege!");

        Self {
            board,
            players,
            active: PlayerId::One,
            phase: Phase::NotStarted,
            log,
            next_weapon_instance: 1,
        }
    }

    /// Get a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Get a player mutably.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        self.player(self.active)
    }

    /// Winner, once the match is over.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::Won(id) => Some(id),
            Phase::NotStarted | Phase::InProgress => None,
        }
    }

    /// Check if the match has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Won(_))
    }

    /// Player whose token stands on `coord`, if any.
    #[must_use]
    pub fn player_at(&self, coord: Coord) -> Option<PlayerId> {
        self.players.iter().find(|p| p.pos == coord).map(|p| p.id)
    }

    /// Hand out a fresh weapon instance id.
    pub fn allocate_weapon_instance(&mut self) -> WeaponInstanceId {
        let id = WeaponInstanceId(self.next_weapon_instance);
        self.next_weapon_instance += 1;
        id
    }

    /// Next id [`allocate_weapon_instance`](Self::allocate_weapon_instance)
    /// will return.
    #[must_use]
    pub const fn next_weapon_instance(&self) -> u32 {
        self.next_weapon_instance
    }

    /// Hand the turn to the other player.
    pub fn advance_turn(&mut self) {
        self.active = self.active.other();
    }

    /// End the match in `winner`'s favor.
    pub fn declare_winner(&mut self, winner: PlayerId) {
        self.phase = Phase::Won(winner);
    }

    /// Send a player's token back to their tower.
    pub fn respawn(&mut self, id: PlayerId) {
        let home = self.board.tower_origin(id);
        self.player_mut(id).pos = home;
    }
}
