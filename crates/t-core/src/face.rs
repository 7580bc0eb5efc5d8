//! Painting the clock face.
//!
//! Both panels are painted into the frame buffer each frame. Panel layout,
//! in window-local columns:
//!
//! ```text
//! col:  1      8       16  20     27      35  39     46
//!       [ H ]  [ H ]   ::  [ M ]  [ M ]   ::  [ S ]  [ S ]
//! ```
//!
//! Glyphs occupy rows 1-5; separator dots sit on rows 2 and 4. The
//! secondary panel repeats hours and minutes and is only shown alongside
//! the seconds field.

use t_term::buffer::{FrameBuffer, string_width};
use t_term::cell::Attr;
use t_term::color::CellColor;
use t_term::window::{BorderChars, Window};

use crate::clock::Clock;
use crate::geometry::Geometry;
use crate::glyph::{paint_digit, paint_dot};
use crate::time::{TimeSource, split_digits};

/// Row of the top of every glyph.
pub const GLYPH_TOP: u16 = 1;
/// Rows of the two separator dots.
pub const DOT_ROWS: [u16; 2] = [2, 4];

pub const HOUR_COLS: [u16; 2] = [1, 8];
pub const MINUTE_COLS: [u16; 2] = [20, 27];
pub const SECOND_COLS: [u16; 2] = [39, 46];
/// Separator between hours and minutes.
pub const HM_SEPARATOR_COL: u16 = 16;
/// Separator between minutes and seconds.
pub const MS_SEPARATOR_COL: u16 = 35;

/// Attributes applied to every panel cell in bold mode.
pub const BOLD_ATTRS: Attr = Attr::BOLD.union(Attr::SLOW_BLINK);

/// What one panel shows.
struct Panel {
    geo: Geometry,
    seconds: bool,
    date: Option<String>,
}

/// Style shared by both panels.
struct Style {
    color: CellColor,
    attrs: Attr,
    draw_box: bool,
    dots_visible: bool,
}

/// Paint the whole clock into `buf`. The caller clears the frame first.
pub fn paint<T: TimeSource>(clock: &Clock<T>, buf: &mut FrameBuffer) {
    let opts = clock.options();
    let now = clock.now();
    let style = Style {
        color: opts.fg(),
        attrs: if opts.bold { BOLD_ATTRS } else { Attr::empty() },
        draw_box: opts.draw_box,
        dots_visible: !now.is_blink_phase(opts.blink),
    };
    let hm = [split_digits(now.hour), split_digits(now.minute)];

    let primary = Panel {
        geo: clock.primary(),
        seconds: opts.seconds,
        date: opts.date.then(|| clock.date_text()),
    };
    paint_panel(buf, &primary, &style, hm, split_digits(now.second));

    if opts.seconds {
        let secondary = Panel {
            geo: clock.secondary(),
            seconds: false,
            date: None,
        };
        paint_panel(buf, &secondary, &style, hm, [0, 0]);
    }
}

fn paint_panel(
    buf: &mut FrameBuffer,
    panel: &Panel,
    style: &Style,
    [hour, minute]: [[u8; 2]; 2],
    second: [u8; 2],
) {
    let mut win = Window::new(buf, panel.geo.rect()).with_attrs(style.attrs);
    if !win.is_visible() {
        return;
    }

    if style.draw_box {
        win.draw_box(BorderChars::LIGHT, CellColor::Default);
    }

    paint_field(&mut win, HOUR_COLS, hour, style.color);
    paint_separator(&mut win, HM_SEPARATOR_COL, style);
    paint_field(&mut win, MINUTE_COLS, minute, style.color);
    if panel.seconds {
        paint_separator(&mut win, MS_SEPARATOR_COL, style);
        paint_field(&mut win, SECOND_COLS, second, style.color);
    }

    if let Some(date) = &panel.date {
        let width = u16::try_from(string_width(date)).unwrap_or(u16::MAX);
        let col = panel.geo.width.saturating_sub(width) / 2;
        win.print(panel.geo.height - 1, col, date, style.color, CellColor::Default);
    }
}

fn paint_field(win: &mut Window<'_>, cols: [u16; 2], digits: [u8; 2], color: CellColor) {
    for (col, digit) in cols.into_iter().zip(digits) {
        paint_digit(win, digit, GLYPH_TOP, col, color);
    }
}

fn paint_separator(win: &mut Window<'_>, col: u16, style: &Style) {
    for row in DOT_ROWS {
        paint_dot(win, row, col, style.color, style.dots_visible);
    }
}
