// SPDX-License-Identifier: MIT
//
// FrameBuffer: the grid of cells a frame is painted into.
//
// Both clock panels paint into one full-screen buffer each tick, and the
// diff renderer compares that buffer with the one it drew last. Cells are
// stored row-major in one `Vec`, so a row is a contiguous slice.
//
// The buffer itself only bounds-checks. Clipping a panel that hangs off the
// screen is the job of `Window`, which knows the panel's rectangle.
//
// A wide character takes its own cell plus a continuation cell to its
// right. Overwriting either half blanks the other so no half-character is
// left behind.

use std::fmt;
use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;

// ─── Rect ───────────────────────────────────────────────────────────────────────

/// A screen rectangle in cell units.
///
/// The origin is signed so that a panel pushed past an edge is still a
/// rectangle; it just overlaps less of the screen, or none of it.
///
/// ```
/// use t_term::buffer::Rect;
///
/// let panel = Rect::new(11, 8, 58, 7);
/// assert!(panel.contains(11, 8));
/// assert!(panel.contains(68, 14));
/// assert!(!panel.contains(69, 8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Leftmost column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Columns covered, end exclusive.
    #[inline]
    #[must_use]
    pub fn columns(self) -> Range<i32> {
        self.x..self.x + i32::from(self.width)
    }

    /// Rows covered, end exclusive.
    #[inline]
    #[must_use]
    pub fn rows(self) -> Range<i32> {
        self.y..self.y + i32::from(self.height)
    }

    /// Whether screen cell `(px, py)` lies inside.
    #[inline]
    #[must_use]
    pub fn contains(self, px: u16, py: u16) -> bool {
        self.columns().contains(&i32::from(px)) && self.rows().contains(&i32::from(py))
    }

    /// The cells both rectangles cover, or `None` when they only touch or
    /// miss each other entirely.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let overlap = |a: Range<i32>, b: Range<i32>| {
            let start = a.start.max(b.start);
            let len = u16::try_from(a.end.min(b.end) - start).ok()?;
            (len > 0).then_some((start, len))
        };
        let (x, width) = overlap(self.columns(), other.columns())?;
        let (y, height) = overlap(self.rows(), other.rows())?;
        Some(Self::new(x, y, width, height))
    }
}

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Size used when the device cannot report one (not a tty, or 0×0).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// One frame's worth of cells, `width` columns by `height` rows.
///
/// ```
/// use t_term::buffer::FrameBuffer;
/// use t_term::cell::Cell;
///
/// let mut frame = FrameBuffer::new(58, 7);
/// frame.put_text(3, 6, "2026-10-19", Cell::EMPTY);
/// assert_eq!(frame.row_text(6).trim(), "2026-10-19");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; Self::area(width, height)],
        }
    }

    fn area(width: u16, height: u16) -> usize {
        usize::from(width) * usize::from(height)
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a [`Rect`] at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Index of `(x, y)` in `cells`, if on the grid.
    #[inline]
    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Every cell, row after row.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row `y` as a slice of `width` cells.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        let start = self.offset(0, y)?;
        self.cells.get(start..start + usize::from(self.width))
    }

    /// The characters of row `y`, continuation cells left out. Empty when
    /// `y` is past the last row.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.character())
            .collect()
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Every cell is blank afterwards.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(Self::area(width, height), Cell::EMPTY);
    }

    /// Overwrite with the cells of an equally sized buffer.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.cells.copy_from_slice(&other.cells);
    }

    /// Store `cell` at `(x, y)` as is. Returns `false` off the grid.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Store `cell` at `(x, y)`, first blanking the other half of any wide
    /// character occupying that position. Returns `false` off the grid.
    pub fn put(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        if self.cells[i].is_continuation() && x > 0 {
            self.cells[i - 1].ch = ' ';
        }
        if x + 1 < self.width && self.cells[i + 1].is_continuation() {
            self.cells[i + 1] = Cell::EMPTY;
        }
        self.cells[i] = cell;
        true
    }

    /// Put `ch` at `(x, y)` in the colors and attributes of `style`.
    ///
    /// Returns the columns `ch` advances: 0 for zero-width characters, which
    /// are dropped, 2 for wide ones. A wide character with no room for its
    /// right half is drawn as a space.
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: Cell) -> u16 {
        let as_char = |c| Cell { ch: c, ..style };
        match char_width(ch) {
            0 => 0,
            2 if x + 1 < self.width => {
                // Blank the right half's old occupant before the left half
                // goes in, so neither write undoes the other.
                self.put(x + 1, y, Cell::EMPTY);
                self.put(x, y, as_char(ch));
                self.set(x + 1, y, Cell::continuation(style.fg, style.bg, style.attrs));
                2
            }
            2 => {
                self.put(x, y, as_char(' '));
                2
            }
            _ => {
                self.put(x, y, as_char(ch));
                1
            }
        }
    }

    /// Put `text` left to right from `(x, y)`, stopping at the right edge.
    /// Returns the columns written.
    pub fn put_text(&mut self, x: u16, y: u16, text: &str, style: Cell) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            col = col.saturating_add(self.put_char(col, y, ch, style));
        }
        col.min(self.width).saturating_sub(x)
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────────

/// Columns `ch` occupies on a terminal: 0, 1 or 2.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Columns `s` occupies on a terminal.
///
/// ```
/// use t_term::buffer::string_width;
///
/// assert_eq!(string_width("2026-10-19"), 10);
/// assert_eq!(string_width("十月"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Attr;
    use crate::color::CellColor;
    use pretty_assertions::assert_eq;

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_ranges() {
        let r = Rect::new(-3, 20, 80, 24);
        assert_eq!(r.columns(), -3..77);
        assert_eq!(r.rows(), 20..44);
    }

    #[test]
    fn contains_is_end_exclusive() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 29));
        assert!(!r.contains(9, 10));
        assert!(!r.contains(30, 10));
        assert!(!r.contains(10, 30));
    }

    #[test]
    fn panel_hanging_off_the_corner_is_clipped() {
        let screen = Rect::new(0, 0, 80, 24);
        let panel = Rect::new(60, 20, 58, 7);
        assert_eq!(screen.intersect(panel), Some(Rect::new(60, 20, 20, 4)));
    }

    #[test]
    fn panel_left_of_the_screen_is_clipped() {
        let screen = Rect::new(0, 0, 80, 24);
        let panel = Rect::new(-10, 0, 38, 7);
        assert_eq!(screen.intersect(panel), Some(Rect::new(0, 0, 28, 7)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersect(Rect::new(10, 0, 10, 10)).is_none());
        assert!(a.intersect(Rect::new(0, 10, 10, 10)).is_none());
    }

    #[test]
    fn offscreen_panel_does_not_intersect() {
        let screen = Rect::new(0, 0, 80, 24);
        assert!(screen.intersect(Rect::new(100, 30, 58, 7)).is_none());
        assert!(screen.intersect(Rect::new(0, 0, 0, 7)).is_none());
    }

    // ── FrameBuffer ─────────────────────────────────────────────────────

    #[test]
    fn starts_blank() {
        let frame = FrameBuffer::new(10, 5);
        assert_eq!(frame.cells().len(), 50);
        assert!(frame.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn off_grid_access() {
        let mut frame = FrameBuffer::new(10, 5);
        assert!(frame.get(10, 0).is_none());
        assert!(frame.get(0, 5).is_none());
        assert!(frame.row(5).is_none());
        assert!(!frame.set(10, 0, Cell::new('X')));
        assert!(!frame.put(0, 5, Cell::new('X')));
        assert!(frame.set(9, 4, Cell::new('X')));
    }

    #[test]
    fn rows_are_width_long() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.set(3, 1, Cell::new('z'));
        let row = frame.row(1).unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row[3].ch, 'z');
    }

    #[test]
    fn row_text_reads_characters() {
        let mut frame = FrameBuffer::new(5, 1);
        frame.set(1, 0, Cell::new('a'));
        frame.set(3, 0, Cell::new('b'));
        assert_eq!(frame.row_text(0), " a b ");
        assert_eq!(frame.row_text(9), "");
    }

    #[test]
    fn resize_blanks() {
        let mut frame = FrameBuffer::new(10, 5);
        frame.set(0, 0, Cell::new('X'));
        frame.resize(20, 10);
        assert_eq!((frame.width(), frame.height()), (20, 10));
        assert_eq!(frame.cells().len(), 200);
        assert!(frame.get(0, 0).unwrap().is_empty());
    }

    #[test]
    fn clear_blanks() {
        let mut frame = FrameBuffer::new(4, 4);
        frame.set(2, 2, Cell::block(CellColor::GREEN));
        frame.clear();
        assert!(frame.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn copy_from_matches() {
        let mut a = FrameBuffer::new(3, 3);
        let mut b = FrameBuffer::new(3, 3);
        b.set(1, 1, Cell::new('z'));
        a.copy_from(&b);
        assert_eq!(a, b);
    }

    // ── Wide Characters ─────────────────────────────────────────────────

    #[test]
    fn overwriting_right_half_blanks_left() {
        let mut frame = FrameBuffer::new(10, 1);
        frame.put_text(0, 0, "中", Cell::EMPTY);
        frame.put(1, 0, Cell::new('x'));
        assert_eq!(frame.row_text(0), " x        ");
    }

    #[test]
    fn overwriting_left_half_blanks_right() {
        let mut frame = FrameBuffer::new(10, 1);
        frame.put_text(4, 0, "中", Cell::EMPTY);
        frame.put(4, 0, Cell::block(CellColor::RED));
        assert!(frame.get(5, 0).unwrap().is_empty());
    }

    #[test]
    fn text_is_styled_from_the_template() {
        let mut frame = FrameBuffer::new(20, 1);
        let style = Cell::EMPTY
            .with_fg(CellColor::YELLOW)
            .with_attrs(Attr::BOLD);
        assert_eq!(frame.put_text(2, 0, "09:05", style), 5);
        assert_eq!(frame.row_text(0), "  09:05             ");
        let colon = frame.get(4, 0).unwrap();
        assert_eq!((colon.ch, colon.fg, colon.attrs), (':', CellColor::YELLOW, Attr::BOLD));
    }

    #[test]
    fn wide_text_takes_two_columns_each() {
        let mut frame = FrameBuffer::new(10, 1);
        assert_eq!(frame.put_text(0, 0, "十月", Cell::EMPTY), 4);
        assert!(frame.get(1, 0).unwrap().is_continuation());
        assert_eq!(frame.get(2, 0).unwrap().ch, '月');
        assert_eq!(frame.row_text(0), "十月      ");
    }

    #[test]
    fn wide_char_without_room_becomes_space() {
        let mut frame = FrameBuffer::new(3, 1);
        assert_eq!(frame.put_text(2, 0, "中", Cell::new('x')), 1);
        assert_eq!(frame.get(2, 0).unwrap().ch, ' ');
    }

    #[test]
    fn text_stops_at_the_edge() {
        let mut frame = FrameBuffer::new(4, 2);
        assert_eq!(frame.put_text(2, 0, "abcdef", Cell::EMPTY), 2);
        assert_eq!(frame.row_text(0), "  ab");
        assert_eq!(frame.put_text(0, 2, "hi", Cell::EMPTY), 0);
    }

    #[test]
    fn zero_width_chars_are_dropped() {
        let mut frame = FrameBuffer::new(4, 1);
        assert_eq!(frame.put_text(0, 0, "a\u{301}b", Cell::EMPTY), 2);
        assert_eq!(frame.row_text(0), "ab  ");
    }

    #[test]
    fn string_width_mixed() {
        assert_eq!(string_width("a中b"), 4);
        assert_eq!(string_width(""), 0);
    }

    #[test]
    fn debug_shows_dimensions() {
        assert_eq!(format!("{:?}", FrameBuffer::new(80, 24)), "FrameBuffer(80x24)");
    }
}
