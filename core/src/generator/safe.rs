use smallvec::SmallVec;

use super::*;

/// Generation strategy that never produces a board with a run of three or more.
///
/// Cells are filled row by row from the bottom, left to right. A kind is excluded for a cell when
/// the two cells to its left, or the two cells below it, already share that kind. Both pairs are
/// placed before the cell itself, and any run through the cell would need one of them to match.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SafeBoardGenerator;

impl SafeBoardGenerator {
    fn pick_kind<R: Rng + ?Sized>(
        board: &Board,
        (row, col): Coord2,
        tile_kinds: u8,
        rng: &mut R,
    ) -> TileKind {
        let mut candidates: SmallVec<[TileKind; MAX_TILE_KINDS as usize]> =
            (0..tile_kinds).map(TileKind::Ordinary).collect();

        if col >= 2 {
            if let Some(kind) = Self::shared_kind(board, (row, col - 1), (row, col - 2)) {
                candidates.retain(|candidate| *candidate != kind);
            }
        }

        if row >= 2 {
            if let Some(kind) = Self::shared_kind(board, (row - 1, col), (row - 2, col)) {
                candidates.retain(|candidate| *candidate != kind);
            }
        }

        debug_assert!(!candidates.is_empty(), "validated configs keep a candidate");
        candidates[rng.random_range(0..candidates.len())]
    }

    fn shared_kind(board: &Board, a: Coord2, b: Coord2) -> Option<TileKind> {
        let kind = board.kind_at(a)?;
        (board.kind_at(b)? == kind).then_some(kind)
    }
}

impl BoardGenerator for SafeBoardGenerator {
    fn generate<R: Rng + ?Sized>(&self, config: &GameConfig, rng: &mut R) -> Result<Board> {
        config.validate()?;

        let mut board = Board::empty(config.size);
        for row in 0..config.size {
            for col in 0..config.size {
                let kind = Self::pick_kind(&board, (row, col), config.tile_kinds, rng);
                board.spawn((row, col), kind);
            }
        }

        log::debug!(
            "Generated {}x{} board with {} kinds",
            config.size,
            config.size,
            config.tile_kinds
        );
        Ok(board)
    }
}
