// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A clock face is almost entirely spaces. A lit block of a digit is a space
// on a colored background; everything else is a space on the terminal's
// own background, apart from the border's box-drawing characters and the
// date line.
//
// A wide character (a CJK date override, say) spans two columns. Its cell
// holds the character and the cell to its right is a continuation marker
// the renderer never prints.

use std::fmt;

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Rendition attributes, one bit per SGR parameter.
    ///
    /// ```
    /// use t_term::cell::Attr;
    ///
    /// let emphasis = Attr::BOLD | Attr::SLOW_BLINK;
    /// assert!(emphasis.contains(Attr::BOLD));
    /// assert!(!emphasis.contains(Attr::INVERSE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD       = 1 << 0;
        /// SGR 2.
        const DIM        = 1 << 1;
        /// SGR 5.
        const SLOW_BLINK = 1 << 2;
        /// SGR 7: foreground and background swapped.
        const INVERSE    = 1 << 3;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

const CONTINUATION: char = '\0';

/// A character with its colors and attributes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `'\0'` for the right half of a wide character.
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A blank in the terminal's default rendition.
    pub const EMPTY: Self = Self::new(' ');

    /// `ch` in the terminal's default rendition.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: CellColor::Default,
            bg: CellColor::Default,
            attrs: Attr::empty(),
        }
    }

    /// One lit block of a glyph: a blank on `color`.
    #[inline]
    #[must_use]
    pub const fn block(color: CellColor) -> Self {
        Self {
            bg: color,
            ..Self::EMPTY
        }
    }

    /// The right half of a wide character drawn in these colors.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: CONTINUATION,
            fg,
            bg,
            attrs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether the cell looks like untouched screen.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The printable character; `None` for a continuation.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.is_continuation() {
            None
        } else {
            Some(self.ch)
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Compact form: `Cell(' ', bg=Ansi256(2))` lists only what differs from
/// the default rendition.
impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ch) = self.character() else {
            return f.write_str("Cell(continuation)");
        };
        write!(f, "Cell({ch:?}")?;
        if self.fg != CellColor::Default {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if self.bg != CellColor::Default {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        f.write_str(")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
