//! Building placement and purchase.
//!
//! Structures are always placed near the builder's tower: the first free
//! tile among a fixed list of twelve offsets wins. Tiles further away are
//! never considered, even when the board has room elsewhere.

use crate::error::Rejection;
use crate::game::{BuildingKind, Coord, Event, GameState, Outcome, PlayerId, Tile};

/// Gold mines a player may own.
pub const MAX_MINES: usize = 4;

/// Forges a player may own.
pub const MAX_FORGES: usize = 1;

/// Fixed price of a forge.
pub const FORGE_COST: u32 = 20;

/// Candidate offsets from the tower, in search order: orthogonal neighbors
/// (up, down, right, left), diagonals, then distance-2 orthogonals.
pub const PLACEMENT_OFFSETS: [(i16, i16); 12] = [
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (0, -2),
    (0, 2),
    (2, 0),
    (-2, 0),
];

/// Gold price of the next building of `kind` for a player who already owns
/// `owned` of them. Mines get pricier with each one: 10, 20, 30, 40.
#[must_use]
pub const fn build_cost(kind: BuildingKind, owned: usize) -> u32 {
    match kind {
        #[allow(clippy::cast_possible_truncation)]
        BuildingKind::GoldMine => (owned as u32 + 1) * 10,
        BuildingKind::Forge => FORGE_COST,
    }
}

/// First free candidate tile around `origin`, if any.
#[must_use]
pub fn find_build_site(state: &GameState, origin: Coord) -> Option<Coord> {
    PLACEMENT_OFFSETS.iter().find_map(|&(dx, dy)| {
        let candidate = origin.offset(dx, dy)?;
        let cell = state.board.get(candidate)?;
        cell.is_vacant().then_some(candidate)
    })
}

/// Construct a mine or forge next to the player's tower.
///
/// # Errors
///
/// Checks, in order: ownership limit, gold, then placement. The first
/// failure is returned and nothing changes.
pub fn build(state: &mut GameState, player_id: PlayerId, kind: BuildingKind) -> Result<Outcome, Rejection> {
    let owned = state.board.count_buildings(player_id, kind);
    match kind {
        BuildingKind::GoldMine if owned >= MAX_MINES => return Err(Rejection::MineLimit),
        BuildingKind::Forge if owned >= MAX_FORGES => return Err(Rejection::ForgeLimit),
        _ => {}
    }

    let cost = build_cost(kind, owned);
    let gold = state.player(player_id).stats.gold;
    if gold < cost {
        return Err(Rejection::NotEnoughGold {
            needed: cost,
            available: gold,
        });
    }

    let origin = state.board.tower_origin(player_id);
    let Some(site) = find_build_site(state, origin) else {
        return Err(Rejection::NoSpace(kind));
    };

    state.board.set_tile(site, Tile::building(kind, player_id));
    state.player_mut(player_id).stats.gold -= cost;

    Ok(Outcome::turn(
        Event::Built { kind, at: site, cost },
        format!("Built {kind} at {site}!"),
    ))
}
