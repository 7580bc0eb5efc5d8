// SPDX-License-Identifier: MIT
//
// Window: a rectangular drawing surface inside the frame buffer.
//
// A window borrows the frame for the duration of one paint and translates
// window-local `(row, col)` coordinates to screen cells, clipping every
// write to both its own rectangle and the screen. The order is row first,
// column second, the convention of curses-style terminal windows.
//
// Windows are cheap views, not retained objects: moving a panel means
// opening the next window at the new position. Attributes set with
// `with_attrs` are OR-ed into everything the window draws, the way a
// window-wide attribute (bold, blink) applies to all of its output.

use crate::buffer::{FrameBuffer, Rect, char_width, string_width};
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// Box-drawing characters for a window border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl BorderChars {
    /// Single-line light box drawing.
    pub const LIGHT: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
    };
}

/// A clipped drawing view over part of a [`FrameBuffer`].
pub struct Window<'a> {
    buf: &'a mut FrameBuffer,
    rect: Rect,
    clip: Option<Rect>,
    attrs: Attr,
}

impl<'a> Window<'a> {
    /// Open a window over `rect` (screen coordinates, x = column, y = row).
    pub fn new(buf: &'a mut FrameBuffer, rect: Rect) -> Self {
        let clip = rect.intersect(buf.bounds());
        Self {
            buf,
            rect,
            clip,
            attrs: Attr::empty(),
        }
    }

    /// OR `attrs` into every cell this window draws.
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether any part of the window is on screen.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.clip.is_some()
    }

    /// Translate window-local `(row, col)` to a screen `(x, y)`.
    ///
    /// Returns `None` outside the window or off screen.
    fn to_screen(&self, row: u16, col: u16) -> Option<(u16, u16)> {
        if row >= self.rect.height || col >= self.rect.width {
            return None;
        }
        let x = self.rect.x + i32::from(col);
        let y = self.rect.y + i32::from(row);
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        self.clip.filter(|c| c.contains(x, y)).map(|_| (x, y))
    }

    /// Write one cell at window-local `(row, col)`.
    ///
    /// Returns `true` if the cell landed on screen.
    pub fn put(&mut self, row: u16, col: u16, cell: Cell) -> bool {
        let Some((x, y)) = self.to_screen(row, col) else {
            return false;
        };
        self.buf.put(x, y, cell.with_attrs(cell.attrs | self.attrs))
    }

    /// Write `len` copies of `cell` starting at `(row, col)`.
    pub fn fill(&mut self, row: u16, col: u16, len: u16, cell: Cell) {
        for c in col..col.saturating_add(len) {
            self.put(row, c, cell);
        }
    }

    /// Print text at `(row, col)`, clipped to the window.
    ///
    /// A wide character that would straddle the clip edge is left out.
    /// Returns the columns the whole text spans, clipped or not.
    pub fn print(&mut self, row: u16, col: u16, text: &str, fg: CellColor, bg: CellColor) -> u16 {
        let span = u16::try_from(string_width(text)).unwrap_or(u16::MAX);
        let Some(clip) = self.clip else {
            return span;
        };
        let screen_y = self.rect.y + i32::from(row);
        let Ok(y) = u16::try_from(screen_y) else {
            return span;
        };
        if row >= self.rect.height || !clip.rows().contains(&screen_y) {
            return span;
        }

        let style = Cell {
            ch: ' ',
            fg,
            bg,
            attrs: self.attrs,
        };
        let visible = clip.columns();
        let mut left = self.rect.x + i32::from(col);
        for ch in text.chars() {
            let right = left + i32::try_from(char_width(ch)).unwrap_or(0);
            if left < right && visible.start <= left && right <= visible.end {
                if let Ok(x) = u16::try_from(left) {
                    self.buf.put_char(x, y, ch, style);
                }
            }
            left = right;
        }
        span
    }

    /// Draw a border around the window's edge.
    pub fn draw_box(&mut self, chars: BorderChars, fg: CellColor) {
        let rows = self.rect.height;
        let cols = self.rect.width;
        if rows < 2 || cols < 2 {
            return;
        }
        let styled = |ch| Cell::new(ch).with_fg(fg);

        self.put(0, 0, styled(chars.top_left));
        self.put(0, cols - 1, styled(chars.top_right));
        self.put(rows - 1, 0, styled(chars.bottom_left));
        self.put(rows - 1, cols - 1, styled(chars.bottom_right));

        self.fill(0, 1, cols - 2, styled(chars.horizontal));
        self.fill(rows - 1, 1, cols - 2, styled(chars.horizontal));
        for row in 1..rows - 1 {
            self.put(row, 0, styled(chars.vertical));
            self.put(row, cols - 1, styled(chars.vertical));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
