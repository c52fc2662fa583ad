use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Grid state: a square array of optional tiles indexed by `(row, col)`.
///
/// Every accessor taking raw coordinates panics when they fall outside the board; use
/// [`Board::validate_coords`] on untrusted input first.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Option<TileEntry>>,
    next_id: u32,
}

impl Board {
    /// Board of `size × size` empty cells.
    pub fn empty(size: Coord) -> Self {
        Self {
            cells: Array2::default((size, size).to_nd_index()),
            next_id: 0,
        }
    }

    /// Builds a fully populated board from explicit kinds, `kinds[[row, col]]`.
    pub fn from_kinds(kinds: &Array2<TileKind>) -> Result<Self> {
        let (rows, cols) = kinds.dim();
        if rows != cols {
            return Err(GameError::InvalidBoardShape);
        }
        let size: Coord = rows.try_into().map_err(|_| GameError::InvalidBoardShape)?;

        let mut board = Self::empty(size);
        for ((row, col), &kind) in kinds.indexed_iter() {
            board.spawn((row as Coord, col as Coord), kind);
        }
        Ok(board)
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn is_valid(&self, (row, col): Coord2) -> bool {
        let size = self.size();
        row < size && col < size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.is_valid(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// # Panics
    ///
    /// Panics when `coords` is outside the board.
    pub fn get(&self, coords: Coord2) -> Option<&TileEntry> {
        self.cells[coords.to_nd_index()].as_ref()
    }

    pub fn kind_at(&self, coords: Coord2) -> Option<TileKind> {
        self.get(coords).map(|entry| entry.kind)
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Option<&mut TileEntry> {
        self.cells[coords.to_nd_index()].as_mut()
    }

    /// Places `entry` at `coords`, rewriting its position fields, and returns what was there.
    pub fn set(&mut self, coords: Coord2, entry: Option<TileEntry>) -> Option<TileEntry> {
        let entry = entry.map(|mut entry| {
            entry.set_position(coords);
            entry
        });
        core::mem::replace(&mut self.cells[coords.to_nd_index()], entry)
    }

    /// Empties the cell at `coords`.
    pub fn take(&mut self, coords: Coord2) -> Option<TileEntry> {
        self.cells[coords.to_nd_index()].take()
    }

    /// Creates a fresh tile with a new identity at `coords`, replacing whatever was there.
    pub fn spawn(&mut self, coords: Coord2, kind: TileKind) -> TileEntry {
        let entry = TileEntry {
            id: TileId(self.next_id),
            row: coords.0,
            col: coords.1,
            kind,
            is_matched: false,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.cells[coords.to_nd_index()] = Some(entry);
        entry
    }

    /// Exchanges the entries at `a` and `b`. Kinds travel with their tiles, positions are swapped.
    pub fn swap(&mut self, a: Coord2, b: Coord2) {
        let entry_a = self.take(a);
        let entry_b = self.take(b);
        self.set(a, entry_b);
        self.set(b, entry_a);
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn tile_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_some()).count() as CellCount
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileEntry> {
        self.cells.iter().flatten()
    }

    /// Snapshot of the kinds on the board, `None` for empty cells.
    pub fn kinds(&self) -> Array2<Option<TileKind>> {
        self.cells.map(|cell| cell.map(|entry| entry.kind))
    }

    pub(crate) fn clear_matched_flags(&mut self) {
        for entry in self.cells.iter_mut().flatten() {
            entry.is_matched = false;
        }
    }

    /// Coordinates of every tile currently flagged as matched, in row-major order.
    pub fn matched_coords(&self) -> Vec<Coord2> {
        self.iter()
            .filter(|entry| entry.is_matched)
            .map(TileEntry::coords)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(i: u8) -> TileKind {
        TileKind::Ordinary(i)
    }

    #[test]
    fn set_rewrites_position_fields() {
        let mut board = Board::empty(3);
        let entry = board.spawn((0, 0), kind(1));

        board.take((0, 0));
        board.set((2, 1), Some(entry));

        let moved = board.get((2, 1)).unwrap();
        assert_eq!(moved.id, entry.id);
        assert_eq!(moved.coords(), (2, 1));
        assert!(board.get((0, 0)).is_none());
    }

    #[test]
    fn swap_keeps_kind_bound_to_tile() {
        let kinds = Array2::from_shape_fn((3, 3), |(row, col)| kind((row * 3 + col) as u8 % 4));
        let mut board = Board::from_kinds(&kinds).unwrap();
        let a = *board.get((1, 1)).unwrap();
        let b = *board.get((1, 2)).unwrap();

        board.swap((1, 1), (1, 2));

        assert_eq!(board.get((1, 2)).unwrap().id, a.id);
        assert_eq!(board.get((1, 2)).unwrap().kind, a.kind);
        assert_eq!(board.get((1, 1)).unwrap().id, b.id);
        assert_eq!(board.get((1, 1)).unwrap().coords(), (1, 1));

        board.swap((1, 2), (1, 1));
        assert_eq!(board.kinds(), kinds.map(|&k| Some(k)));
    }

    #[test]
    fn validate_coords_rejects_out_of_bounds() {
        let board = Board::empty(4);
        assert_eq!(board.validate_coords((3, 3)), Ok((3, 3)));
        assert_eq!(board.validate_coords((4, 0)), Err(GameError::InvalidCoords));
        assert!(!board.is_valid((0, 4)));
    }

    #[test]
    fn from_kinds_rejects_non_square_input() {
        let kinds = Array2::from_elem((2, 3), kind(0));
        assert_eq!(Board::from_kinds(&kinds), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn spawn_allocates_distinct_ids() {
        let mut board = Board::empty(2);
        let first = board.spawn((0, 0), kind(0));
        let second = board.spawn((0, 1), kind(0));
        assert_ne!(first.id, second.id);
        assert_eq!(board.tile_count(), 2);
        assert!(!board.is_full());
    }

    #[test]
    #[should_panic]
    fn get_out_of_bounds_fails_fast() {
        let board = Board::empty(2);
        let _ = board.get((2, 0));
    }
}
