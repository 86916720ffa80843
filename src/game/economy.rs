//! Gold mine income.
//!
//! Each mine pays `5 × 2^(level − 1)` gold to its owner at the end of the
//! owner's turn: 5, 10, 20, 40 for levels 1 through 4.

use crate::error::Rejection;
use crate::game::{
    Board, BuildingKind, Event, GameState, Level, Outcome, PlayerId, Resource, MAX_LEVEL,
};

/// Gold paid by a level-1 mine.
const BASE_MINE_YIELD: u32 = 5;

/// Gold paid per turn by one mine of the given level.
///
/// Levels above the cap pay the capped yield.
#[must_use]
pub const fn mine_yield(level: Level) -> u32 {
    if level == 0 {
        return 0;
    }
    let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
    BASE_MINE_YIELD << (level - 1)
}

/// Total end-of-turn income for a player.
#[must_use]
pub fn mine_income(board: &Board, player: PlayerId) -> u32 {
    board
        .buildings_owned_by(player)
        .filter(|&(_, kind, _)| kind == BuildingKind::GoldMine)
        .map(|(_, _, level)| mine_yield(level))
        .fold(0, u32::saturating_add)
}

/// Pay the player's mine income and pass the turn.
///
/// # Errors
///
/// Never fails once the match gates have passed; the `Result` keeps the
/// signature uniform with the other commands.
pub fn end_turn(state: &mut GameState, player_id: PlayerId) -> Result<Outcome, Rejection> {
    let income = mine_income(&state.board, player_id);
    let player = state.player_mut(player_id);
    player.stats.gold = player.stats.gold.saturating_add(income);

    let message = if income > 0 {
        format!("Turn skipped. Mines paid {income} gold.")
    } else {
        "Turn skipped.".to_string()
    };
    Ok(Outcome::turn(Event::TurnEnded { income }, message))
}

/// Adjust a player's resource by a signed amount, clamping into `u32`.
///
/// Admin action: free, and allowed for either player.
///
/// # Errors
///
/// Never fails; see [`end_turn`].
pub fn grant(
    state: &mut GameState,
    target: PlayerId,
    resource: Resource,
    amount: i64,
) -> Result<Outcome, Rejection> {
    let player = state.player_mut(target);
    let slot = match resource {
        Resource::Power => &mut player.stats.power,
        Resource::Gold => &mut player.stats.gold,
        Resource::Coins => &mut player.stats.upgrade_coins,
    };
    let adjusted = i64::from(*slot).saturating_add(amount).clamp(0, i64::from(u32::MAX));
    *slot = u32::try_from(adjusted).unwrap_or(u32::MAX);

    let message = format!("Admin: Gave {amount} {resource} to {}.", player.name);
    Ok(Outcome::free(
        Event::Granted {
            target,
            resource,
            amount,
        },
        message,
    ))
}
