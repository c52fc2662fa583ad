use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Coordinates of the `offset`-th cell on line `line` along this axis.
    const fn coords(self, line: Coord, offset: Coord) -> Coord2 {
        match self {
            Self::Horizontal => (line, offset),
            Self::Vertical => (offset, line),
        }
    }
}

/// A maximal line of equal kinds at least as long as the match threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub axis: Axis,
    /// Leftmost cell for horizontal runs, bottom cell for vertical runs.
    pub start: Coord2,
    pub len: u8,
    pub kind: TileKind,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let Run {
            axis, start, len, ..
        } = *self;
        (0..len).map(move |i| match axis {
            Axis::Horizontal => (start.0, start.1 + i),
            Axis::Vertical => (start.0 + i, start.1),
        })
    }
}

/// Result of one detection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchScan {
    pub runs: SmallVec<[Run; 4]>,
    /// Distinct cells flagged, a cell shared by two runs counts once.
    pub matched: CellCount,
}

impl MatchScan {
    pub fn has_match(&self) -> bool {
        !self.runs.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatchDetector {
    match_count: u8,
}

impl MatchDetector {
    pub const fn new(match_count: u8) -> Self {
        Self { match_count }
    }

    pub const fn match_count(&self) -> u8 {
        self.match_count
    }

    /// Recomputes the matched flags of the whole board from scratch.
    ///
    /// # Panics
    ///
    /// Panics when the board has empty cells.
    pub fn scan(&self, board: &mut Board) -> MatchScan {
        board.clear_matched_flags();
        let runs = self.find_runs(board);

        let mut matched: CellCount = 0;
        for run in &runs {
            for coords in run.cells() {
                if let Some(entry) = board.get_mut(coords) {
                    if !entry.is_matched {
                        entry.is_matched = true;
                        matched += 1;
                    }
                }
            }
        }

        if !runs.is_empty() {
            log::trace!("Found {} runs covering {} tiles", runs.len(), matched);
        }
        MatchScan { runs, matched }
    }

    /// Horizontal runs first, then vertical ones, without touching the flags.
    ///
    /// # Panics
    ///
    /// Panics when the board has empty cells.
    pub fn find_runs(&self, board: &Board) -> SmallVec<[Run; 4]> {
        let kinds = board
            .kinds()
            .map(|kind| kind.expect("match detection requires a fully populated board"));

        let mut runs = SmallVec::new();
        for axis in [Axis::Horizontal, Axis::Vertical] {
            for line in 0..board.size() {
                self.scan_line(&kinds, axis, line, &mut runs);
            }
        }
        runs
    }

    fn scan_line(
        &self,
        kinds: &Array2<TileKind>,
        axis: Axis,
        line: Coord,
        runs: &mut SmallVec<[Run; 4]>,
    ) {
        let size = kinds.nrows() as Coord;
        let kind_at = |offset| kinds[axis.coords(line, offset).to_nd_index()];

        let mut run_start = 0;
        let mut run_kind = kind_at(0);
        for offset in 1..=size {
            if offset < size && kind_at(offset) == run_kind {
                continue;
            }

            let len = offset - run_start;
            if len >= self.match_count {
                runs.push(Run {
                    axis,
                    start: axis.coords(line, run_start),
                    len,
                    kind: run_kind,
                });
            }

            if offset < size {
                run_start = offset;
                run_kind = kind_at(offset);
            }
        }
    }

    /// Adjacent swaps that would produce at least one match, each pair listed once with the lower
    /// coordinate first.
    pub fn find_swaps(&self, board: &Board) -> Vec<(Coord2, Coord2)> {
        let mut kinds = board.kinds();
        let size = board.size();
        let mut swaps = Vec::new();

        for row in 0..size {
            for col in 0..size {
                let from = (row, col);
                for to in [(row + 1, col), (row, col + 1)] {
                    if !board.is_valid(to) {
                        continue;
                    }
                    kinds.swap(from.to_nd_index(), to.to_nd_index());
                    if self.has_run_through(&kinds, from) || self.has_run_through(&kinds, to) {
                        swaps.push((from, to));
                    }
                    kinds.swap(from.to_nd_index(), to.to_nd_index());
                }
            }
        }
        swaps
    }

    pub fn has_possible_move(&self, board: &Board) -> bool {
        !self.find_swaps(board).is_empty()
    }

    fn has_run_through(&self, kinds: &Array2<Option<TileKind>>, (row, col): Coord2) -> bool {
        let Some(kind) = kinds[(row, col).to_nd_index()] else {
            return false;
        };
        let size = kinds.nrows() as isize;
        let same = |r: isize, c: isize| {
            (0..size).contains(&r)
                && (0..size).contains(&c)
                && kinds[[r as usize, c as usize]] == Some(kind)
        };
        let extent = |d_row: isize, d_col: isize| {
            let mut len = 0;
            let (mut r, mut c) = (row as isize + d_row, col as isize + d_col);
            while same(r, c) {
                len += 1;
                r += d_row;
                c += d_col;
            }
            len
        };

        let threshold = usize::from(self.match_count);
        let horizontal = 1 + extent(0, -1) + extent(0, 1);
        let vertical = 1 + extent(-1, 0) + extent(1, 0);
        horizontal >= threshold || vertical >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn checkerboard(size: usize) -> Array2<TileKind> {
        Array2::from_shape_fn((size, size), |(row, col)| {
            TileKind::Ordinary(((2 * row + col) % 6) as u8)
        })
    }

    fn board_with(size: usize, planted: &[(Coord2, u8)]) -> Board {
        let mut kinds = checkerboard(size);
        for &(coords, kind) in planted {
            kinds[coords.to_nd_index()] = TileKind::Ordinary(kind);
        }
        Board::from_kinds(&kinds).unwrap()
    }

    #[test]
    fn match_free_board_reports_nothing() {
        let mut board = board_with(8, &[]);
        let scan = MatchDetector::new(3).scan(&mut board);

        assert!(!scan.has_match());
        assert_eq!(scan.matched, 0);
        assert!(board.matched_coords().is_empty());
    }

    #[test]
    fn planted_horizontal_run_marks_exactly_its_cells() {
        // row 5 reads 4 5 0 1 2 3 4 5
        let mut board = board_with(8, &[((5, 2), 9), ((5, 3), 9), ((5, 4), 9), ((5, 5), 9)]);
        let scan = MatchDetector::new(3).scan(&mut board);

        assert!(scan.has_match());
        assert_eq!(
            scan.runs.as_slice(),
            &[Run {
                axis: Axis::Horizontal,
                start: (5, 2),
                len: 4,
                kind: TileKind::Ordinary(9),
            }]
        );
        assert_eq!(board.matched_coords(), vec![(5, 2), (5, 3), (5, 4), (5, 5)]);
    }

    #[test]
    fn run_ending_at_board_edge_is_detected() {
        let mut board = board_with(8, &[((0, 5), 9), ((0, 6), 9), ((0, 7), 9)]);
        let scan = MatchDetector::new(3).scan(&mut board);
        assert_eq!(scan.matched, 3);
        assert_eq!(board.matched_coords(), vec![(0, 5), (0, 6), (0, 7)]);
    }

    #[test]
    fn crossing_runs_share_their_cell() {
        let mut board = board_with(
            8,
            &[
                ((3, 2), 9),
                ((3, 3), 9),
                ((3, 4), 9),
                ((2, 3), 9),
                ((4, 3), 9),
            ],
        );
        let scan = MatchDetector::new(3).scan(&mut board);

        assert_eq!(scan.runs.len(), 2);
        assert_eq!(scan.runs[0].axis, Axis::Horizontal);
        assert_eq!(scan.runs[1].axis, Axis::Vertical);
        assert_eq!(scan.matched, 5);
    }

    #[test]
    fn flags_are_recomputed_not_accumulated() {
        let mut board = board_with(8, &[((0, 0), 9), ((0, 1), 9), ((0, 2), 9)]);
        let detector = MatchDetector::new(3);
        assert!(detector.scan(&mut board).has_match());

        board.swap((0, 2), (1, 2));
        let scan = detector.scan(&mut board);
        assert!(!scan.has_match());
        assert!(board.matched_coords().is_empty());
    }

    #[test]
    fn higher_threshold_ignores_short_runs() {
        let mut board = board_with(8, &[((4, 0), 9), ((4, 1), 9), ((4, 2), 9)]);
        assert!(!MatchDetector::new(4).scan(&mut board).has_match());
    }

    #[test]
    #[should_panic(expected = "fully populated")]
    fn scanning_with_holes_fails_fast() {
        let mut board = board_with(4, &[]);
        board.take((1, 1));
        MatchDetector::new(3).scan(&mut board);
    }

    #[test]
    fn find_swaps_reports_the_completing_swap() {
        // row 3 reads 0 9 9 2 3 ... and (4, 3) is 9 above (3, 3)
        let board = board_with(8, &[((3, 1), 9), ((3, 2), 9), ((4, 3), 9)]);
        let swaps = MatchDetector::new(3).find_swaps(&board);
        assert!(swaps.contains(&((3, 3), (4, 3))));

        let quiet = board_with(8, &[]);
        assert!(!MatchDetector::new(3).has_possible_move(&quiet));
    }
}
