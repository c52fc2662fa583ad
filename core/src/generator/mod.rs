use crate::*;
use rand::Rng;
pub use safe::*;

mod safe;

pub trait BoardGenerator {
    /// Builds a fully populated board for `config`, drawing randomness from `rng`.
    fn generate<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> Result<Board>;
}

/// Uniformly random ordinary kind, as used for refills.
pub fn random_kind<R: Rng + ?Sized>(tile_kinds: u8, rng: &mut R) -> TileKind {
    TileKind::Ordinary(rng.random_range(0..tile_kinds))
}
