// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Two kinds of output reach the terminal:
//
//   Select Graphic Rendition (colors and attributes) is built with `Sgr`,
//   which collects parameters and writes them as one `CSI ... m`. Turning a
//   plain cell into a bold, blinking, green block costs a single sequence.
//
//   Fixed control sequences: cursor positioning, erase, and the DEC private
//   modes (cursor visibility, alternate screen, synchronized output).
//
// Positions are 0-indexed here and 1-indexed on the wire.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Control Sequences ───────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Erase the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Back to the terminal's default rendition (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// DEC private modes the display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecMode {
    /// DECTCEM, text cursor visible.
    CursorVisible,
    /// The alternate screen, with the normal screen saved.
    AltScreen,
    /// Synchronized output: the terminal holds the frame until it ends.
    SyncOutput,
}

impl DecMode {
    /// The mode's parameter number.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::CursorVisible => 25,
            Self::AltScreen => 1049,
            Self::SyncOutput => 2026,
        }
    }
}

/// Set (`DECSET`) or reset (`DECRST`) a private mode.
#[inline]
pub fn set_mode(w: &mut impl Write, mode: DecMode, on: bool) -> io::Result<()> {
    let op = if on { 'h' } else { 'l' };
    write!(w, "\x1b[?{}{op}", mode.code())
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// Attribute flags and their SGR parameters, in emission order.
const ATTR_CODES: [(Attr, u8); 4] = [
    (Attr::BOLD, 1),
    (Attr::DIM, 2),
    (Attr::SLOW_BLINK, 5),
    (Attr::INVERSE, 7),
];

/// A Select Graphic Rendition sequence under construction.
///
/// ```
/// use t_term::ansi::Sgr;
/// use t_term::cell::Attr;
/// use t_term::color::CellColor;
///
/// let mut out = Vec::new();
/// Sgr::new()
///     .attrs(Attr::BOLD)
///     .bg(CellColor::GREEN)
///     .write_to(&mut out)
///     .unwrap();
/// assert_eq!(out, b"\x1b[1;42m");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sgr {
    params: String,
}

impl Sgr {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: String::new(),
        }
    }

    /// Drop every collected parameter.
    pub fn clear(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn push(&mut self, code: u16) {
        if !self.params.is_empty() {
            self.params.push(';');
        }
        // Writing to a String cannot fail.
        let _ = write!(self.params, "{code}");
    }

    /// SGR 0: forget every attribute and color set before.
    pub fn reset(&mut self) -> &mut Self {
        self.push(0);
        self
    }

    /// Turn on each attribute in `attrs`. Nothing is turned off.
    pub fn attrs(&mut self, attrs: Attr) -> &mut Self {
        for (flag, code) in ATTR_CODES {
            if attrs.contains(flag) {
                self.push(u16::from(code));
            }
        }
        self
    }

    /// Foreground: 30-37, 90-97, or `38;5;N`.
    pub fn fg(&mut self, color: CellColor) -> &mut Self {
        self.color(color, 30, 90, 38);
        self
    }

    /// Background: 40-47, 100-107, or `48;5;N`.
    pub fn bg(&mut self, color: CellColor) -> &mut Self {
        self.color(color, 40, 100, 48);
        self
    }

    fn color(&mut self, color: CellColor, basic: u16, bright: u16, extended: u16) {
        match color {
            // 39 / 49: the default foreground / background.
            CellColor::Default => self.push(basic + 9),
            CellColor::Ansi256(idx @ 0..=7) => self.push(basic + u16::from(idx)),
            CellColor::Ansi256(idx @ 8..=15) => self.push(bright + u16::from(idx - 8)),
            CellColor::Ansi256(idx) => {
                self.push(extended);
                self.push(5);
                self.push(u16::from(idx));
            }
        }
    }

    /// Write the sequence, or nothing if no parameter was collected.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        if self.params.is_empty() {
            return Ok(());
        }
        write!(w, "\x1b[{}m", self.params)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
