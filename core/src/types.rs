/// Single coordinate axis used for board size, rows and columns.
pub type Coord = u8;

/// Count type used for removed-tile counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`. Row 0 is the bottom row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `a` and `b` share an edge. Diagonals and identical cells are not neighbors.
pub const fn is_neighbor(a: Coord2, b: Coord2) -> bool {
    let row_diff = a.0.abs_diff(b.0);
    let col_diff = a.1.abs_diff(b.1);
    (row_diff == 1 && col_diff == 0) || (row_diff == 0 && col_diff == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_rule_rejects_diagonals_and_self() {
        assert!(is_neighbor((2, 2), (2, 3)));
        assert!(is_neighbor((2, 2), (1, 2)));
        assert!(!is_neighbor((2, 2), (3, 3)));
        assert!(!is_neighbor((2, 2), (2, 2)));
        assert!(!is_neighbor((2, 2), (2, 4)));
    }
}
