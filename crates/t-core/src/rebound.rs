//! Bouncing panel animation.
//!
//! Each tick the panel moves one row and one column. An axis reverses when
//! the panel lands on that axis's edge, so the panel touches every edge it
//! travels toward and never leaves the screen. Each axis runs over
//! `[0, size - panel]`; an axis with no room stays at 0.

use t_term::buffer::Size;

use crate::geometry::Geometry;

/// Velocity of the bouncing panel, one cell per tick on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebound {
    /// Row velocity, `1` or `-1`.
    pub vx: i8,
    /// Column velocity, `1` or `-1`.
    pub vy: i8,
}

impl Default for Rebound {
    fn default() -> Self {
        Self::new()
    }
}

impl Rebound {
    /// Start moving down and to the right.
    #[must_use]
    pub const fn new() -> Self {
        Self { vx: 1, vy: 1 }
    }

    /// Move `geo` one step within `size`, updating the velocity.
    #[must_use]
    pub fn advance(&mut self, geo: Geometry, size: Size) -> Geometry {
        let (x, vx) = step_axis(geo.x, self.vx, geo.max_x(size));
        let (y, vy) = step_axis(geo.y, self.vy, geo.max_y(size));
        self.vx = vx;
        self.vy = vy;
        Geometry { x, y, ..geo }
    }
}

/// One step on a single axis with range `[0, max]`.
///
/// Returns the new position and velocity.
#[must_use]
pub fn step_axis(pos: u16, vel: i8, max: u16) -> (u16, i8) {
    if max == 0 {
        return (0, vel);
    }
    if pos > max {
        return (max, -1);
    }

    let mut vel = if vel < 0 { -1 } else { 1 };
    let next = |v: i8| {
        if v < 0 {
            pos.checked_sub(1)
        } else {
            pos.checked_add(1).filter(|&n| n <= max)
        }
    };
    let next = next(vel).unwrap_or_else(|| {
        vel = -vel;
        // `max > 0`, so one of the two neighbours is always in range.
        next(vel).unwrap_or(pos)
    });

    if next == 0 {
        vel = 1;
    } else if next == max {
        vel = -1;
    }
    (next, vel)
}
