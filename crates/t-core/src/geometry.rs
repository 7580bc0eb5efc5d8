//! Panel placement.
//!
//! Positions follow the curses convention: `x` is the row and `y` the
//! column. The conversion to a screen [`Rect`] (where `x` is the column)
//! happens once, in [`Geometry::rect`].

use t_term::buffer::{Rect, Size};

use crate::options::Anchor;

/// Panel height: five glyph rows, a padding row, and the border.
pub const HEIGHT: u16 = 7;
/// Panel width with the seconds field.
pub const WIDE_WIDTH: u16 = 58;
/// Panel width without the seconds field.
pub const NARROW_WIDTH: u16 = 38;

/// Where a panel sits and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Top row.
    pub x: u16,
    /// Left column.
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    /// Panel width for the given seconds visibility.
    #[inline]
    #[must_use]
    pub const fn width_for(seconds: bool) -> u16 {
        if seconds { WIDE_WIDTH } else { NARROW_WIDTH }
    }

    /// A panel at `(x, y)` sized for the given seconds visibility.
    #[must_use]
    pub const fn at(x: u16, y: u16, seconds: bool) -> Self {
        Self {
            x,
            y,
            width: Self::width_for(seconds),
            height: HEIGHT,
        }
    }

    /// Centered in `size`. Pinned to 0 on an axis the panel doesn't fit.
    #[must_use]
    pub const fn centered(size: Size, seconds: bool) -> Self {
        let width = Self::width_for(seconds);
        Self::at(
            size.rows.saturating_sub(HEIGHT) / 2,
            size.cols.saturating_sub(width) / 2,
            seconds,
        )
    }

    /// At the fixed anchor. Not clamped; drawing clips to the screen.
    #[must_use]
    pub const fn anchored(anchor: Anchor, seconds: bool) -> Self {
        Self::at(anchor.a, anchor.b, seconds)
    }

    /// The secondary panel: one row below this one, same column and size.
    #[must_use]
    pub const fn secondary(&self) -> Self {
        Self {
            x: self.x.saturating_add(self.height).saturating_add(1),
            ..*self
        }
    }

    /// Same position, resized for the given seconds visibility.
    #[must_use]
    pub const fn with_seconds(self, seconds: bool) -> Self {
        Self::at(self.x, self.y, seconds)
    }

    /// Largest row the panel can start on inside `size`.
    #[inline]
    #[must_use]
    pub const fn max_x(&self, size: Size) -> u16 {
        size.rows.saturating_sub(self.height)
    }

    /// Largest column the panel can start on inside `size`.
    #[inline]
    #[must_use]
    pub const fn max_y(&self, size: Size) -> u16 {
        size.cols.saturating_sub(self.width)
    }

    /// Whether the whole panel is on screen.
    #[must_use]
    pub fn fits(&self, size: Size) -> bool {
        u32::from(self.x) + u32::from(self.height) <= u32::from(size.rows)
            && u32::from(self.y) + u32::from(self.width) <= u32::from(size.cols)
    }

    /// Screen rectangle for drawing.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(i32::from(self.y), i32::from(self.x), self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn centered_on_80x24_wide() {
        let g = Geometry::centered(Size::new(80, 24), true);
        assert_eq!(
            g,
            Geometry {
                x: 8,
                y: 11,
                width: WIDE_WIDTH,
                height: HEIGHT
            }
        );
    }

    #[test]
    fn centered_on_80x24_narrow() {
        let g = Geometry::centered(Size::new(80, 24), false);
        assert_eq!((g.x, g.y, g.width), (8, 21, NARROW_WIDTH));
    }

    #[test]
    fn centering_saturates_on_tiny_terminal() {
        let g = Geometry::centered(Size::new(20, 3), true);
        assert_eq!((g.x, g.y), (0, 0));
        assert!(!g.fits(Size::new(20, 3)));
    }

    #[test]
    fn anchored_ignores_terminal() {
        let g = Geometry::anchored(Anchor::both(1), true);
        assert_eq!((g.x, g.y), (1, 1));
    }

    #[test]
    fn rect_swaps_axes() {
        let g = Geometry::at(3, 10, false);
        assert_eq!(g.rect(), Rect::new(10, 3, NARROW_WIDTH, HEIGHT));
    }

    #[test]
    fn secondary_saturates() {
        let g = Geometry::at(u16::MAX - 2, 0, true);
        assert_eq!(g.secondary().x, u16::MAX);
    }

    proptest! {
        #[test]
        fn centering_stays_inside(
            cols in WIDE_WIDTH..500u16,
            rows in HEIGHT..300u16,
            seconds: bool,
        ) {
            let size = Size::new(cols, rows);
            let g = Geometry::centered(size, seconds);
            prop_assert!(g.fits(size));
            // Balanced: the two margins differ by at most one cell.
            let left = g.y;
            let right = cols - g.y - g.width;
            prop_assert!(right == left || right == left + 1);
        }

        #[test]
        fn secondary_follows_primary(x in 0u16..1000, y in 0u16..1000, seconds: bool) {
            let p = Geometry::at(x, y, seconds);
            let s = p.secondary();
            prop_assert_eq!(s.x, p.x + p.height + 1);
            prop_assert_eq!(s.y, p.y);
            prop_assert_eq!((s.width, s.height), (p.width, p.height));
        }
    }
}
