// SPDX-License-Identifier: MIT
//
// Frame bytes and the pen that writes cells into them.
//
//   OutputBuffer holds one frame of escape sequences and text so the
//   terminal receives it in a single write.
//
//   Pen tracks what the terminal has selected: where the next character
//   lands and which colors and attributes are active. Writing a cell costs
//   a cursor move only when the pen is elsewhere and one SGR only when the
//   style differs. A run of lit glyph blocks is one background change
//   followed by spaces.

use std::io::{self, Write};

use crate::ansi::{self, Sgr};
use crate::buffer::char_width;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

const FRAME_CAPACITY: usize = 4_096;

/// Bytes of one frame, written to the terminal all at once.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(FRAME_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Append `ch` encoded as UTF-8.
    pub fn push_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.bytes
            .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    /// Empty the buffer, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Hand everything to `w`, flush `w`, then empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails. The bytes stay
    /// buffered in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        w.write_all(&self.bytes)?;
        w.flush()?;
        self.bytes.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// No-op: bytes leave through [`OutputBuffer::flush_to`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// Colors and attributes as selected on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Style {
    fg: CellColor,
    bg: CellColor,
    attrs: Attr,
}

impl Style {
    /// What SGR 0 leaves behind.
    const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    const fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// Writes cells while remembering the terminal's cursor and style.
///
/// Attributes can only be switched off with SGR 0, so dropping one resets
/// everything and re-selects the colors that are not the default. Adding
/// attributes or changing colors emits just the difference.
#[derive(Debug, Default)]
pub struct Pen {
    /// Where the next printed character lands, if known.
    cursor: Option<(u16, u16)>,
    /// The selected style, if known.
    style: Option<Style>,
    sgr: Sgr,
}

impl Pen {
    /// A pen that knows nothing about the terminal yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor: None,
            style: None,
            sgr: Sgr::new(),
        }
    }

    /// Start a frame on a terminal left in its default rendition with the
    /// cursor somewhere unknown.
    pub const fn begin_frame(&mut self) {
        self.cursor = None;
        self.style = Some(Style::PLAIN);
    }

    /// Write `cell` at column `x`, row `y`.
    ///
    /// A continuation cell directly behind its wide character is already on
    /// screen and produces nothing. A stray one is drawn as a space.
    pub fn put(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        if cell.is_continuation() && self.cursor == x.checked_add(1).map(|next| (next, y)) {
            return;
        }

        if self.cursor != Some((x, y)) {
            ansi::cursor_to(out, x, y).ok();
        }
        self.select(out, Style::of(cell));

        let ch = cell.character().unwrap_or(' ');
        out.push_char(ch);
        let advance = u16::try_from(char_width(ch)).unwrap_or(1);
        self.cursor = x.checked_add(advance).map(|next| (next, y));
    }

    fn select(&mut self, out: &mut OutputBuffer, want: Style) {
        if self.style == Some(want) {
            return;
        }

        self.sgr.clear();
        match self.style {
            Some(have) if have.attrs.difference(want.attrs).is_empty() => {
                self.sgr.attrs(want.attrs.difference(have.attrs));
                if have.fg != want.fg {
                    self.sgr.fg(want.fg);
                }
                if have.bg != want.bg {
                    self.sgr.bg(want.bg);
                }
            }
            _ => {
                self.sgr.reset().attrs(want.attrs);
                if want.fg != CellColor::Default {
                    self.sgr.fg(want.fg);
                }
                if want.bg != CellColor::Default {
                    self.sgr.bg(want.bg);
                }
            }
        }
        self.sgr.write_to(out).ok();
        self.style = Some(want);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
