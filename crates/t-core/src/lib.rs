//! # t-core: Clock core for t-clock
//!
//! Everything the clock knows, independent of how the terminal is driven:
//!
//! - **[`options`]**: display options and their defaults
//! - **[`time`]**: `TimeSource` (wall clock or fixed), two-digit splitting
//! - **[`glyph`]**: the block-digit table and digit/separator painting
//! - **[`geometry`]**: panel placement: centered, anchored, secondary
//! - **[`rebound`]**: the bouncing-panel animation
//! - **[`clock`]**: `Clock` state, runtime commands, per-tick updates
//! - **[`face`]**: painting both panels into a frame buffer
//!
//! Coordinates follow the curses convention used by the panels: `x` is the
//! row, `y` is the column. The frame buffer underneath uses the opposite
//! (`x` column, `y` row); [`geometry::Geometry::rect`] converts.

pub mod clock;
pub mod face;
pub mod geometry;
pub mod glyph;
pub mod options;
pub mod rebound;
pub mod time;
