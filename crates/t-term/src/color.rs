// SPDX-License-Identifier: MIT
//
// Terminal color: the palette-indexed subset a clock face needs.
//
// The clock paints with one configurable foreground index and the
// terminal's own default background, so cells carry either "whatever the
// terminal uses" or an index into the 256-color palette. Indices 0-7 are
// the classic ANSI colors that every terminal supports; 8-15 their bright
// variants; 16-255 the extended cube and grayscale ramp.

use std::fmt;

/// A resolved terminal color as stored in a [`Cell`](crate::cell::Cell).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// The terminal's configured default (SGR 39 / 49).
    #[default]
    Default,
    /// A 256-color palette index.
    Ansi256(u8),
}

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const RED: Self = Self::Ansi256(1);
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const MAGENTA: Self = Self::Ansi256(5);
    pub const CYAN: Self = Self::Ansi256(6);
    pub const WHITE: Self = Self::Ansi256(7);
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Ansi256(idx) => write!(f, "Ansi256({idx})"),
        }
    }
}
