#![no_std]

extern crate alloc;

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use detector::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use motion::*;
pub use score::*;
pub use tile::*;
pub use types::*;

mod board;
mod detector;
mod engine;
mod error;
mod generator;
mod motion;
mod score;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub match_count: u8,
    pub tile_kinds: u8,
    pub swap_duration: Duration,
    pub fall_duration: Duration,
    pub match_delay: Duration,
    /// Safety cap on remove/drop/refill iterations per swap.
    pub max_cascades: u16,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord = 8;
    pub const DEFAULT_MATCH_COUNT: u8 = 3;
    pub const DEFAULT_TILE_KINDS: u8 = 6;

    pub const fn new_unchecked(size: Coord, match_count: u8, tile_kinds: u8) -> Self {
        Self {
            size,
            match_count,
            tile_kinds,
            swap_duration: Duration::from_millis(150),
            fall_duration: Duration::from_millis(200),
            match_delay: Duration::from_millis(200),
            max_cascades: 64,
        }
    }

    pub fn new(size: Coord, match_count: u8, tile_kinds: u8) -> Result<Self> {
        let config = Self::new_unchecked(size, match_count, tile_kinds);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_timings(
        mut self,
        swap_duration: Duration,
        fall_duration: Duration,
        match_delay: Duration,
    ) -> Self {
        self.swap_duration = swap_duration;
        self.fall_duration = fall_duration;
        self.match_delay = match_delay;
        self
    }

    pub const fn with_max_cascades(mut self, max_cascades: u16) -> Self {
        self.max_cascades = max_cascades;
        self
    }

    /// The safe generator only excludes two kinds per cell, so fewer than three would leave it
    /// without candidates.
    pub fn validate(&self) -> Result<()> {
        if self.tile_kinds < 3 {
            return Err(GameError::TooFewTileKinds);
        }
        if self.tile_kinds > MAX_TILE_KINDS {
            return Err(GameError::TooManyTileKinds);
        }
        if self.match_count < 3 {
            return Err(GameError::InvalidMatchCount);
        }
        if self.size < self.match_count {
            return Err(GameError::InvalidBoardSize);
        }
        if self.max_cascades == 0 {
            return Err(GameError::InvalidCascadeCap);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    /// World position of a cell. Rows grow upwards.
    pub fn world_position(&self, (row, col): Coord2) -> Point {
        let offset_x = (f32::from(self.size) - 1.0) / 2.0;
        let offset_y = (f32::from(self.size) + 3.0) / 2.0;
        Point::new(f32::from(col) - offset_x, f32::from(row) - offset_y)
    }

    /// Where a refilled tile appears before falling into `coords`.
    pub fn spawn_position(&self, coords: Coord2) -> Point {
        let target = self.world_position(coords);
        Point::new(target.x, target.y + f32::from(self.size))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            Self::DEFAULT_SIZE,
            Self::DEFAULT_MATCH_COUNT,
            Self::DEFAULT_TILE_KINDS,
        )
    }
}
