use serde::{Deserialize, Serialize};

use crate::*;

/// Upper bound for the number of ordinary kinds a board may be configured with.
pub const MAX_TILE_KINDS: u8 = 16;

/// Type of a tile. Ordinary kinds are matched by equality; the special kinds are reserved and are
/// never produced by generation or refill.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Ordinary(u8),
    HorizontalClear,
    VerticalClear,
    AreaBomb,
}

/// Stable identity of a tile, preserved across swaps and drops.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A tile sitting on the board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    pub id: TileId,
    pub row: Coord,
    pub col: Coord,
    pub kind: TileKind,
    /// Set by the match detector, only meaningful until the next removal.
    pub is_matched: bool,
}

impl TileEntry {
    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub(crate) fn set_position(&mut self, (row, col): Coord2) {
        self.row = row;
        self.col = col;
    }
}
