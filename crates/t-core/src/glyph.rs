//! Block-digit glyphs.
//!
//! Each digit is five rows of three bits. A set bit is a lit block two
//! columns wide (a space on the foreground color), so a glyph covers 6×5
//! cells. Bit 2 is the leftmost column.
//!
//! ```text
//!  0       1       2       3       4
//! ██████      ██  ██████  ██████  ██  ██
//! ██  ██      ██      ██      ██  ██  ██
//! ██  ██      ██  ██████  ██████  ██████
//! ██  ██      ██  ██          ██      ██
//! ██████      ██  ██████  ██████      ██
//! ```

use t_term::cell::Cell;
use t_term::color::CellColor;
use t_term::window::Window;

/// Rows in a glyph.
pub const GLYPH_ROWS: u16 = 5;
/// Bits per glyph row.
pub const GLYPH_BITS: u16 = 3;
/// Screen columns per bit.
pub const BLOCK_WIDTH: u16 = 2;
/// Screen columns per glyph.
pub const GLYPH_WIDTH: u16 = GLYPH_BITS * BLOCK_WIDTH;

#[rustfmt::skip]
const GLYPHS: [[u8; GLYPH_ROWS as usize]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b001, 0b001, 0b001, 0b001, 0b001], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Row bitmasks for `digit`.
///
/// `digit` must be 0-9.
#[inline]
#[must_use]
pub const fn pattern(digit: u8) -> [u8; GLYPH_ROWS as usize] {
    debug_assert!(digit < 10, "glyph digit out of range");
    GLYPHS[digit as usize]
}

/// Whether bit `bit` (0 = leftmost) of row `row` is lit for `digit`.
#[must_use]
pub const fn is_lit(digit: u8, row: u16, bit: u16) -> bool {
    if row >= GLYPH_ROWS || bit >= GLYPH_BITS {
        return false;
    }
    let mask = pattern(digit)[row as usize];
    mask & (1 << (GLYPH_BITS - 1 - bit)) != 0
}

/// Paint `digit` with its top-left corner at window-local `(row, col)`.
///
/// Lit bits become `color` blocks; unlit bits are painted as background.
pub fn paint_digit(win: &mut Window<'_>, digit: u8, row: u16, col: u16, color: CellColor) {
    let lit = Cell::block(color);
    for r in 0..GLYPH_ROWS {
        for bit in 0..GLYPH_BITS {
            let cell = if is_lit(digit, r, bit) { lit } else { Cell::EMPTY };
            win.fill(row + r, col + bit * BLOCK_WIDTH, BLOCK_WIDTH, cell);
        }
    }
}

/// Paint one separator dot: a single block at `(row, col)`.
///
/// A hidden dot is painted as background.
pub fn paint_dot(win: &mut Window<'_>, row: u16, col: u16, color: CellColor, visible: bool) {
    let cell = if visible { Cell::block(color) } else { Cell::EMPTY };
    win.fill(row, col, BLOCK_WIDTH, cell);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use t_term::buffer::{FrameBuffer, Rect};

    /// Render lit cells as `#`, everything else as `.`.
    fn picture(buf: &FrameBuffer) -> Vec<String> {
        (0..buf.height())
            .map(|y| {
                (0..buf.width())
                    .map(|x| match buf.get(x, y) {
                        Some(c) if c.bg != CellColor::Default => '#',
                        _ => '.',
                    })
                    .collect()
            })
            .collect()
    }

    fn draw(digit: u8) -> Vec<String> {
        let mut buf = FrameBuffer::new(GLYPH_WIDTH, GLYPH_ROWS);
        let mut win = Window::new(&mut buf, Rect::new(0, 0, GLYPH_WIDTH, GLYPH_ROWS));
        paint_digit(&mut win, digit, 0, 0, CellColor::GREEN);
        picture(&buf)
    }

    #[test]
    fn eight_has_every_row_lit_on_both_sides() {
        assert_eq!(
            draw(8),
            vec!["######", "##..##", "######", "##..##", "######"]
        );
    }

    #[test]
    fn one_is_a_right_column() {
        assert_eq!(draw(1), vec!["....##"; 5]);
    }

    #[test]
    fn four_shape() {
        assert_eq!(
            draw(4),
            vec!["##..##", "##..##", "######", "....##", "....##"]
        );
    }

    #[test]
    fn every_digit_is_distinct() {
        for a in 0..10u8 {
            for b in (a + 1)..10 {
                assert_ne!(pattern(a), pattern(b), "{a} and {b} share a glyph");
            }
        }
    }

    #[test]
    fn every_row_fits_three_bits() {
        for digit in 0..10u8 {
            assert!(pattern(digit).iter().all(|&row| row <= 0b111));
        }
    }

    #[test]
    fn is_lit_out_of_range_is_false() {
        assert!(!is_lit(8, GLYPH_ROWS, 0));
        assert!(!is_lit(8, 0, GLYPH_BITS));
    }

    #[test]
    fn digit_uses_requested_color() {
        let mut buf = FrameBuffer::new(GLYPH_WIDTH, GLYPH_ROWS);
        let mut win = Window::new(&mut buf, Rect::new(0, 0, GLYPH_WIDTH, GLYPH_ROWS));
        paint_digit(&mut win, 7, 0, 0, CellColor::MAGENTA);
        assert_eq!(buf.get(0, 0).unwrap().bg, CellColor::MAGENTA);
        assert!(buf.get(0, 1).unwrap().is_empty());
    }

    #[test]
    fn hidden_dot_is_background() {
        let mut buf = FrameBuffer::new(4, 1);
        let mut win = Window::new(&mut buf, Rect::new(0, 0, 4, 1));
        paint_dot(&mut win, 0, 0, CellColor::RED, true);
        paint_dot(&mut win, 0, 2, CellColor::RED, false);
        assert_eq!(picture(&buf), vec!["##.."]);
    }
}
