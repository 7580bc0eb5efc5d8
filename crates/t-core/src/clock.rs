//! Clock state.
//!
//! A [`Clock`] owns the options, the time source, the last time read, the
//! terminal size, and the primary panel's geometry. The event loop drives
//! it through [`Clock::tick`], [`Clock::resize`], and [`Clock::apply`];
//! each reports how much of the screen needs repainting.

use log::{debug, trace, warn};
use t_term::buffer::Size;

use crate::geometry::Geometry;
use crate::options::Options;
use crate::rebound::Rebound;
use crate::time::{ClockTime, TimeSource};

/// How much of the screen a state change invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    /// Nothing visible changed.
    Nothing,
    /// Repaint; the renderer sends only what differs.
    Redraw,
    /// Clear the terminal and repaint everything.
    FullRedraw,
}

/// Anchor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A runtime request from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleSeconds,
    ToggleCenter,
    ToggleBlink,
    ToggleBox,
    ToggleBold,
    ToggleRebound,
    ToggleDate,
    /// Step through the eight basic colors.
    CycleColor,
    SetColor(u8),
    /// Nudge the anchor one cell. Ignored unless anchored.
    Move(Direction),
}

/// Number of basic palette colors `p` cycles through.
const CYCLE_COLORS: u8 = 8;

/// The clock: options, time, and panel placement.
#[derive(Debug)]
pub struct Clock<T> {
    options: Options,
    source: T,
    now: ClockTime,
    size: Size,
    primary: Geometry,
    rebound: Rebound,
    last_date: String,
}

impl<T: TimeSource> Clock<T> {
    /// Read the time once and lay out the primary panel in `size`.
    pub fn new(options: Options, source: T, size: Size) -> Self {
        let now = ClockTime::from_datetime(&source.now(options.utc));
        let primary = if options.center {
            Geometry::centered(size, options.seconds)
        } else {
            Geometry::anchored(options.anchor, options.seconds)
        };
        let mut clock = Self {
            options,
            source,
            now,
            size,
            primary,
            rebound: Rebound::new(),
            last_date: String::new(),
        };
        clock.last_date = clock.date_text();
        debug!("clock: {:?}", clock.options);
        clock.reflow();
        clock
    }

    #[inline]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The time read on the last tick.
    #[inline]
    pub const fn now(&self) -> &ClockTime {
        &self.now
    }

    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub const fn primary(&self) -> Geometry {
        self.primary
    }

    /// The secondary panel, directly below the primary.
    #[inline]
    pub const fn secondary(&self) -> Geometry {
        self.primary.secondary()
    }

    /// Text for the date line: the override if set, else the formatted date.
    pub fn date_text(&self) -> String {
        self.options
            .date_override
            .clone()
            .unwrap_or_else(|| self.now.date_string())
    }

    /// Read the clock and advance the animation.
    pub fn tick(&mut self) -> Change {
        let previous = self.now;
        self.now = ClockTime::from_datetime(&self.source.now(self.options.utc));

        let mut change = if self.now == previous {
            Change::Nothing
        } else {
            Change::Redraw
        };

        if self.options.rebound {
            self.primary = self.rebound.advance(self.primary, self.size);
            change = change.max(Change::Redraw);
        }

        // Only a visible date line needs the screen cleared.
        let date = self.date_text();
        if date != self.last_date {
            debug!("date changed: {} -> {date}", self.last_date);
            self.last_date = date;
            if self.options.date {
                change = Change::FullRedraw;
            }
        }

        trace!(
            "tick {:02}:{:02}:{:02} at ({}, {}) -> {change:?}",
            self.now.hour, self.now.minute, self.now.second, self.primary.x, self.primary.y
        );
        change
    }

    /// The terminal changed size.
    pub fn resize(&mut self, size: Size) -> Change {
        debug!("resize to {}x{}", size.cols, size.rows);
        self.size = size;
        self.reflow();
        Change::FullRedraw
    }

    /// Apply a runtime command.
    pub fn apply(&mut self, command: Command) -> Change {
        let opts = &mut self.options;
        match command {
            Command::ToggleSeconds => opts.seconds = !opts.seconds,
            Command::ToggleCenter => opts.center = !opts.center,
            Command::ToggleRebound => opts.rebound = !opts.rebound,
            Command::ToggleBox => {
                opts.draw_box = !opts.draw_box;
                return Change::FullRedraw;
            }
            Command::ToggleBlink => {
                opts.blink = !opts.blink;
                return Change::Redraw;
            }
            Command::ToggleBold => {
                opts.bold = !opts.bold;
                return Change::Redraw;
            }
            Command::ToggleDate => {
                opts.date = !opts.date;
                return Change::Redraw;
            }
            Command::CycleColor => {
                opts.color = if opts.color < CYCLE_COLORS - 1 {
                    opts.color + 1
                } else {
                    0
                };
                return Change::Redraw;
            }
            Command::SetColor(color) => {
                opts.color = color;
                return Change::Redraw;
            }
            Command::Move(dir) => return self.nudge(dir),
        }
        debug!("layout: {:?}", self.options);
        self.reflow();
        Change::FullRedraw
    }

    fn nudge(&mut self, dir: Direction) -> Change {
        if !self.options.is_anchored() {
            return Change::Nothing;
        }
        let before = self.options.anchor;
        let max_a = self.primary.max_x(self.size);
        let max_b = self.primary.max_y(self.size);
        let anchor = &mut self.options.anchor;
        match dir {
            Direction::Up => anchor.a = anchor.a.saturating_sub(1),
            Direction::Left => anchor.b = anchor.b.saturating_sub(1),
            Direction::Down if anchor.a < max_a => anchor.a += 1,
            Direction::Right if anchor.b < max_b => anchor.b += 1,
            Direction::Down | Direction::Right => {}
        }
        if self.options.anchor == before {
            return Change::Nothing;
        }
        self.reflow();
        Change::Redraw
    }

    /// Recompute the primary panel from the options and terminal size.
    ///
    /// A rebounding panel keeps its position, pulled back on screen if the
    /// terminal shrank.
    fn reflow(&mut self) {
        let seconds = self.options.seconds;
        self.primary = if self.options.rebound {
            let g = self.primary.with_seconds(seconds);
            Geometry {
                x: g.x.min(g.max_x(self.size)),
                y: g.y.min(g.max_y(self.size)),
                ..g
            }
        } else if self.options.center {
            Geometry::centered(self.size, seconds)
        } else {
            Geometry::anchored(self.options.anchor, seconds)
        };

        let p = self.primary;
        debug!("primary at ({}, {}) {}x{}", p.x, p.y, p.width, p.height);
        let needed = if seconds { p.secondary() } else { p };
        if !needed.fits(self.size) {
            warn!(
                "panel at ({}, {}) does not fit {}x{}; clipping",
                p.x, p.y, self.size.cols, self.size.rows
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::geometry::{HEIGHT, NARROW_WIDTH, WIDE_WIDTH};
    use crate::options::Anchor;
    use crate::time::FixedTime;

    fn source() -> FixedTime {
        FixedTime::at(2026, 10, 19, 9, 5, 30).unwrap()
    }

    fn clock(options: Options, src: &FixedTime) -> Clock<&FixedTime> {
        Clock::new(options, src, Size::new(80, 24))
    }

    // -- layout --

    #[test]
    fn defaults_on_80x24_are_wide_and_centered() {
        let src = source();
        let c = clock(Options::default(), &src);
        assert_eq!(c.primary(), Geometry::at(8, 11, true));
        assert_eq!(c.primary().width, WIDE_WIDTH);
        let s = c.secondary();
        assert_eq!((s.x, s.y), (8 + HEIGHT + 1, 11));
        assert_eq!((c.now().hour, c.now().minute, c.now().second), (9, 5, 30));
    }

    #[test]
    fn no_seconds_is_narrow() {
        let src = source();
        let opts = Options {
            seconds: false,
            ..Options::default()
        };
        assert_eq!(clock(opts, &src).primary().width, NARROW_WIDTH);
    }

    #[test]
    fn anchor_holds_for_any_size() {
        let src = source();
        let opts = Options {
            center: false,
            ..Options::default()
        };
        for size in [Size::new(80, 24), Size::new(10, 5), Size::new(300, 100)] {
            let c = Clock::new(opts.clone(), &src, size);
            assert_eq!((c.primary().x, c.primary().y), (1, 1));
        }
    }

    #[test]
    fn resize_recenters() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        assert_eq!(c.resize(Size::new(120, 40)), Change::FullRedraw);
        assert_eq!((c.primary().x, c.primary().y), (16, 31));
    }

    // -- ticks --

    #[test]
    fn same_second_is_nothing() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        assert_eq!(c.tick(), Change::Nothing);
        src.advance(1);
        assert_eq!(c.tick(), Change::Redraw);
        assert_eq!(c.now().second, 31);
    }

    #[test]
    fn date_change_forces_full_redraw() {
        let src = FixedTime::at(2026, 10, 19, 23, 59, 59).unwrap();
        let opts = Options {
            date: true,
            ..Options::default()
        };
        let mut c = clock(opts, &src);
        src.advance(1);
        assert_eq!(c.tick(), Change::FullRedraw);
        assert_eq!(c.date_text(), "2026-10-20");
        src.advance(1);
        assert_eq!(c.tick(), Change::Redraw);
    }

    #[test]
    fn midnight_without_date_line_is_a_plain_redraw() {
        let src = FixedTime::at(2026, 10, 19, 23, 59, 59).unwrap();
        let mut c = clock(Options::default(), &src);
        src.advance(1);
        assert_eq!(c.tick(), Change::Redraw);
        assert_eq!(c.date_text(), "2026-10-20");

        // The date seen while hidden is not reported again once shown.
        c.apply(Command::ToggleDate);
        src.advance(1);
        assert_eq!(c.tick(), Change::Redraw);
    }

    #[test]
    fn date_override_never_changes() {
        let src = FixedTime::at(2026, 10, 19, 23, 59, 59).unwrap();
        let opts = Options {
            date_override: Some("launch day".into()),
            ..Options::default()
        };
        let mut c = clock(opts, &src);
        src.advance(1);
        assert_eq!(c.tick(), Change::Redraw);
        assert_eq!(c.date_text(), "launch day");
    }

    #[test]
    fn rebound_moves_every_tick() {
        let src = source();
        let opts = Options {
            rebound: true,
            ..Options::default()
        };
        let mut c = clock(opts, &src);
        let start = c.primary();
        assert_eq!(c.tick(), Change::Redraw);
        assert_eq!((c.primary().x, c.primary().y), (start.x + 1, start.y + 1));
    }

    #[test]
    fn rebound_survives_shrink() {
        let src = source();
        let opts = Options {
            rebound: true,
            ..Options::default()
        };
        let mut c = Clock::new(opts, &src, Size::new(200, 60));
        c.resize(Size::new(80, 24));
        assert!(c.primary().fits(Size::new(80, 24)));
    }

    // -- commands --

    #[test]
    fn toggles_flip_options() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        assert_eq!(c.apply(Command::ToggleSeconds), Change::FullRedraw);
        assert!(!c.options().seconds);
        assert_eq!(c.primary().width, NARROW_WIDTH);
        assert_eq!(c.apply(Command::ToggleBlink), Change::Redraw);
        assert!(!c.options().blink);
        c.apply(Command::ToggleBox);
        c.apply(Command::ToggleBold);
        c.apply(Command::ToggleDate);
        let o = c.options();
        assert!(!o.draw_box && o.bold && o.date);
    }

    #[test]
    fn center_off_jumps_to_anchor() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        c.apply(Command::ToggleCenter);
        assert_eq!((c.primary().x, c.primary().y), (1, 1));
        c.apply(Command::ToggleCenter);
        assert_eq!((c.primary().x, c.primary().y), (8, 11));
    }

    #[test]
    fn rebound_off_returns_to_center() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        c.apply(Command::ToggleRebound);
        c.tick();
        assert_ne!(c.primary(), Geometry::at(8, 11, true));
        c.apply(Command::ToggleRebound);
        assert_eq!(c.primary(), Geometry::at(8, 11, true));
    }

    #[test]
    fn color_cycles_through_basic_palette() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        let seen: Vec<u8> = (0..8)
            .map(|_| {
                c.apply(Command::CycleColor);
                c.options().color
            })
            .collect();
        assert_eq!(seen, vec![3, 4, 5, 6, 7, 0, 1, 2]);
    }

    #[test]
    fn cycling_from_extended_color_wraps_to_zero() {
        let src = source();
        let opts = Options {
            color: 200,
            ..Options::default()
        };
        let mut c = clock(opts, &src);
        c.apply(Command::CycleColor);
        assert_eq!(c.options().color, 0);
        c.apply(Command::SetColor(5));
        assert_eq!(c.options().color, 5);
    }

    #[test]
    fn move_ignored_while_centered() {
        let src = source();
        let mut c = clock(Options::default(), &src);
        assert_eq!(c.apply(Command::Move(Direction::Down)), Change::Nothing);
        assert_eq!(c.options().anchor, Anchor::both(1));
    }

    #[test]
    fn move_shifts_anchor_within_screen() {
        let src = source();
        let opts = Options {
            center: false,
            anchor: Anchor { a: 0, b: 21 },
            ..Options::default()
        };
        let mut c = clock(opts, &src);
        assert_eq!(c.apply(Command::Move(Direction::Up)), Change::Nothing);
        assert_eq!(c.apply(Command::Move(Direction::Left)), Change::Redraw);
        assert_eq!(c.apply(Command::Move(Direction::Down)), Change::Redraw);
        assert_eq!(c.options().anchor, Anchor { a: 1, b: 20 });
        assert_eq!((c.primary().x, c.primary().y), (1, 20));

        // 80 - 58 = 22 is the last column that fits.
        c.apply(Command::Move(Direction::Right));
        c.apply(Command::Move(Direction::Right));
        assert_eq!(c.apply(Command::Move(Direction::Right)), Change::Nothing);
        assert_eq!(c.options().anchor.b, 22);
    }
}
