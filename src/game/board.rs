//! Board and tile types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Monster, PlayerId};

/// Width of the standard board in tiles.
pub const BOARD_WIDTH: u16 = 10;

/// Height of the standard board in tiles.
pub const BOARD_HEIGHT: u16 = 5;

/// Highest level a tower or building can reach.
pub const MAX_LEVEL: Level = 4;

/// Level of a tower or building (1..=4).
pub type Level = u8;

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Shift by a signed offset.
    ///
    /// Returns `None` if the result would be negative or overflow; bounds
    /// against a particular board are checked separately.
    #[must_use]
    pub fn offset(self, dx: i16, dy: i16) -> Option<Coord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Coord::new(x, y))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Kind of structure a player can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Produces gold at the end of its owner's turn.
    GoldMine,
    /// Blacksmith; its level gates which weapon tiers are for sale.
    Forge,
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingKind::GoldMine => write!(f, "Gold Mine"),
            BuildingKind::Forge => write!(f, "Forge"),
        }
    }
}

/// Structure occupying a tile.
///
/// Monster occupancy is layered on top of this in [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Tile {
    /// Open ground.
    Empty,
    /// A player's home tower. Its level and health live on the owning player.
    Tower {
        /// Owning player.
        owner: PlayerId,
    },
    /// Gold mine.
    Mine {
        /// Owning player.
        owner: PlayerId,
        /// Current level.
        level: Level,
    },
    /// Forge (blacksmith).
    Forge {
        /// Owning player.
        owner: PlayerId,
        /// Current level.
        level: Level,
    },
}

impl Tile {
    /// A freshly constructed level-1 building.
    #[must_use]
    pub const fn building(kind: BuildingKind, owner: PlayerId) -> Self {
        match kind {
            BuildingKind::GoldMine => Tile::Mine { owner, level: 1 },
            BuildingKind::Forge => Tile::Forge { owner, level: 1 },
        }
    }

    /// Owner of the structure on this tile, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        match *self {
            Tile::Empty => None,
            Tile::Tower { owner } | Tile::Mine { owner, .. } | Tile::Forge { owner, .. } => {
                Some(owner)
            }
        }
    }

    /// Building kind and level, for mines and forges.
    #[must_use]
    pub const fn building_info(&self) -> Option<(BuildingKind, Level)> {
        match *self {
            Tile::Mine { level, .. } => Some((BuildingKind::GoldMine, level)),
            Tile::Forge { level, .. } => Some((BuildingKind::Forge, level)),
            Tile::Empty | Tile::Tower { .. } => None,
        }
    }

    /// Check if this is open ground.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }
}

/// A single board cell: structure plus optional monster occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Structure on the cell.
    pub tile: Tile,
    /// Monster standing on the cell.
    pub monster: Option<Monster>,
}

impl Cell {
    /// An empty cell with no monster.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tile: Tile::Empty,
            monster: None,
        }
    }

    /// Check if the cell is open ground without a monster.
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        self.tile.is_empty() && self.monster.is_none()
    }
}

/// The game board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Width of the board in tiles.
    width: u16,
    /// Height of the board in tiles.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// Create the standard 10×5 board with both towers placed.
    #[must_use]
    pub fn standard() -> Self {
        let size = usize::from(BOARD_WIDTH) * usize::from(BOARD_HEIGHT);
        let mut board = Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: vec![Cell::empty(); size],
        };
        for player in PlayerId::ALL {
            let origin = board.tower_origin(player);
            board.set_tile(origin, Tile::Tower { owner: player });
        }
        board
    }

    /// Get the width of the board.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the raw cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Tile where a player's tower stands and where the player respawns.
    #[must_use]
    pub const fn tower_origin(&self, player: PlayerId) -> Coord {
        let y = self.height / 2;
        match player {
            PlayerId::One => Coord::new(0, y),
            PlayerId::Two => Coord::new(self.width - 1, y),
        }
    }

    /// Check if a coordinate is within the board bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the cells array.
    fn coord_to_index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get a reference to the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.coord_to_index(coord).and_then(|idx| self.cells.get(idx))
    }

    /// Get a mutable reference to the cell at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.coord_to_index(coord).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Get the structure at the given coordinate.
    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<Tile> {
        self.get(coord).map(|cell| cell.tile)
    }

    /// Set the structure at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set_tile(&mut self, coord: Coord, tile: Tile) -> bool {
        if let Some(cell) = self.get_mut(coord) {
            cell.tile = tile;
            true
        } else {
            false
        }
    }

    /// Get the monster at the given coordinate.
    #[must_use]
    pub fn monster_at(&self, coord: Coord) -> Option<&Monster> {
        self.get(coord).and_then(|cell| cell.monster.as_ref())
    }

    /// Put a monster on an in-bounds cell, replacing nothing.
    ///
    /// Returns `false` if the coordinate is out of bounds or already occupied.
    pub fn place_monster(&mut self, coord: Coord, monster: Monster) -> bool {
        match self.get_mut(coord) {
            Some(cell) if cell.monster.is_none() => {
                cell.monster = Some(monster);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the monster at the given coordinate.
    pub fn take_monster(&mut self, coord: Coord) -> Option<Monster> {
        self.get_mut(coord).and_then(|cell| cell.monster.take())
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let width = usize::from(self.width);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, cell)
        })
    }

    /// Iterate over all monsters on the board.
    pub fn monsters(&self) -> impl Iterator<Item = (Coord, &Monster)> {
        self.iter()
            .filter_map(|(coord, cell)| cell.monster.as_ref().map(|m| (coord, m)))
    }

    /// Get all mines and forges owned by a specific player.
    pub fn buildings_owned_by(
        &self,
        player: PlayerId,
    ) -> impl Iterator<Item = (Coord, BuildingKind, Level)> {
        self.iter().filter_map(move |(coord, cell)| {
            if cell.tile.owner() != Some(player) {
                return None;
            }
            cell.tile
                .building_info()
                .map(|(kind, level)| (coord, kind, level))
        })
    }

    /// Count buildings of one kind owned by a player.
    #[must_use]
    pub fn count_buildings(&self, player: PlayerId, kind: BuildingKind) -> usize {
        self.buildings_owned_by(player)
            .filter(|&(_, k, _)| k == kind)
            .count()
    }

    /// Level of the player's forge, if they have one.
    #[must_use]
    pub fn forge_level(&self, player: PlayerId) -> Option<Level> {
        self.buildings_owned_by(player)
            .find(|&(_, kind, _)| kind == BuildingKind::Forge)
            .map(|(_, _, level)| level)
    }
}
