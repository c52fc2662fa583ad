use std::fmt::Write;

use match3_core::{Board, Coord2, TileKind};

pub fn kind_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Ordinary(k) => char::from(b'A' + k),
        TileKind::HorizontalClear => '-',
        TileKind::VerticalClear => '|',
        TileKind::AreaBomb => '*',
    }
}

/// Draws the board top row first, brackets around `selected`.
pub fn render(board: &Board, selected: Option<Coord2>) -> String {
    let size = board.size();
    let mut out = String::new();

    for row in (0..size).rev() {
        write!(out, "{row:>2} ").unwrap();
        for col in 0..size {
            let glyph = board.kind_at((row, col)).map_or('.', kind_glyph);
            if selected == Some((row, col)) {
                write!(out, "[{glyph}]").unwrap();
            } else {
                write!(out, " {glyph} ").unwrap();
            }
        }
        out.push('\n');
    }

    out.push_str("   ");
    for col in 0..size {
        write!(out, "{col:^3}").unwrap();
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::*;

    #[test]
    fn renders_top_row_first() {
        let mut board = Board::empty(3);
        board.spawn((0, 0), TileKind::Ordinary(0));
        board.spawn((2, 2), TileKind::Ordinary(1));

        let text = render(&board, Some((0, 0)));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], " 2  .  .  B ");
        assert_eq!(lines[2], " 0 [A] .  . ");
        assert_eq!(lines[3], "    0  1  2 ");
    }

    #[test]
    fn special_kinds_have_glyphs() {
        assert_eq!(kind_glyph(TileKind::AreaBomb), '*');
        assert_eq!(kind_glyph(TileKind::Ordinary(5)), 'F');
    }
}
