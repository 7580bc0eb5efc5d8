//! Display options.
//!
//! One [`Options`] value holds every user-facing setting. It is built from
//! the defaults plus command-line overrides at startup and then mutated by
//! runtime keys. The defaults:
//!
//! | Option      | Default | Flag        |
//! |-------------|---------|-------------|
//! | seconds     | on      | `-s` off    |
//! | blink       | on      | `-S` off    |
//! | center      | on      | `-c` off    |
//! | box         | on      | `-b` off    |
//! | bold        | off     | `-B` on     |
//! | utc         | off     | `-u` on     |
//! | rebound     | off     | `-r` on     |
//! | date        | off     | `-T` on     |
//! | color       | 2       | `-C <n>`    |
//! | anchor      | (1, 1)  | `-a <n>`    |
//! | tick        | 1 s     |             |

use std::time::Duration;

use t_term::color::CellColor;

/// Default foreground color index (green).
pub const DEFAULT_COLOR: u8 = 2;

/// Default time between redraws.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Fixed panel position used when centering is off: `a` is the row, `b` the
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub a: u16,
    pub b: u16,
}

impl Anchor {
    /// The same value on both axes, as `-a <n>` sets it.
    #[must_use]
    pub const fn both(n: u16) -> Self {
        Self { a: n, b: n }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::both(1)
    }
}

/// Every setting that affects what the clock draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Show the seconds field (wide layout).
    pub seconds: bool,
    /// Hide the separators on even seconds.
    pub blink: bool,
    /// Center the primary panel in the terminal.
    pub center: bool,
    /// Draw a border around both panels.
    pub draw_box: bool,
    /// Bold + blink attributes on every panel cell.
    pub bold: bool,
    /// UTC instead of local time.
    pub utc: bool,
    /// Bounce the panel around the terminal.
    pub rebound: bool,
    /// Draw the date line.
    pub date: bool,
    /// Foreground palette index for lit glyph blocks.
    pub color: u8,
    /// Time between ticks.
    pub tick: Duration,
    /// Position when neither centered nor rebounding.
    pub anchor: Anchor,
    /// Literal text shown instead of the formatted date.
    pub date_override: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seconds: true,
            blink: true,
            center: true,
            draw_box: true,
            bold: false,
            utc: false,
            rebound: false,
            date: false,
            color: DEFAULT_COLOR,
            tick: DEFAULT_TICK,
            anchor: Anchor::default(),
            date_override: None,
        }
    }
}

impl Options {
    /// Reset the display options to their defaults (`-n`).
    ///
    /// The anchor and the date override are placement and content, not
    /// display toggles, and survive the reset.
    pub fn reset_display(&mut self) {
        *self = Self {
            anchor: self.anchor,
            date_override: self.date_override.take(),
            ..Self::default()
        };
    }

    /// The lit-block color.
    #[inline]
    #[must_use]
    pub const fn fg(&self) -> CellColor {
        CellColor::Ansi256(self.color)
    }

    /// Whether the panel position follows the anchor.
    #[inline]
    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        !self.center && !self.rebound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_classic_clock() {
        let opts = Options::default();
        assert!(opts.seconds && opts.blink && opts.center && opts.draw_box);
        assert!(!opts.bold && !opts.utc && !opts.rebound && !opts.date);
        assert_eq!(opts.color, 2);
        assert_eq!(opts.fg(), CellColor::GREEN);
        assert_eq!(opts.tick, Duration::from_secs(1));
        assert_eq!(opts.anchor, Anchor { a: 1, b: 1 });
        assert_eq!(opts.date_override, None);
    }

    #[test]
    fn reset_display_restores_toggles() {
        let mut opts = Options {
            seconds: false,
            blink: false,
            center: false,
            draw_box: false,
            bold: true,
            utc: true,
            rebound: true,
            date: true,
            color: 5,
            ..Options::default()
        };
        opts.reset_display();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn reset_display_keeps_anchor_and_date_text() {
        let mut opts = Options {
            anchor: Anchor::both(4),
            date_override: Some("someday".into()),
            seconds: false,
            ..Options::default()
        };
        opts.reset_display();
        assert!(opts.seconds);
        assert_eq!(opts.anchor, Anchor::both(4));
        assert_eq!(opts.date_override.as_deref(), Some("someday"));
    }

    #[test]
    fn anchored_only_without_center_or_rebound() {
        let mut opts = Options::default();
        assert!(!opts.is_anchored());
        opts.center = false;
        assert!(opts.is_anchored());
        opts.rebound = true;
        assert!(!opts.is_anchored());
    }
}
