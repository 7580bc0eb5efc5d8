// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// The clock paints a whole frame every tick, but from one second to the next
// only a digit or two changes. The renderer keeps the frame it drew last and
// writes just the runs of cells that differ from it, so nothing on screen is
// erased and redrawn in place. That is what keeps the display from
// flickering.
//
// Per frame:
//
//   1. The application paints into a FrameBuffer.
//   2. render() walks each row against the stored frame and collects the
//      spans of changed columns. A missing or differently sized previous
//      frame makes every row one span, after a screen clear.
//   3. Each span goes through the Pen into an OutputBuffer, bracketed by
//      synchronized output and closed with SGR 0.
//   4. flush_to() hands the bytes to the terminal in one write.

use std::io::{self, Write};
use std::ops::Range;

use crate::ansi::{self, DecMode};
use crate::buffer::FrameBuffer;
use crate::cell::Cell;
use crate::output::{OutputBuffer, Pen};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells written to the terminal.
    pub cells_rendered: usize,
    /// Cells left alone because they matched the previous frame.
    pub cells_skipped: usize,
    /// Bytes of escape sequences and text produced.
    pub bytes_written: usize,
    /// Whether the screen was cleared first.
    pub full_redraw: bool,
}

impl RenderStats {
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

/// Maximal runs of columns where `row` differs from `prev`. Columns past
/// the end of `prev` always differ.
fn changed_spans<'a>(prev: &'a [Cell], row: &'a [Cell]) -> impl Iterator<Item = Range<usize>> + 'a {
    let differs = move |x: usize| prev.get(x) != row.get(x);
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < row.len() && !differs(x) {
            x += 1;
        }
        if x == row.len() {
            return None;
        }
        let start = x;
        while x < row.len() && differs(x) {
            x += 1;
        }
        Some(start..x)
    })
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Turns successive frames into the escape sequences that update the screen.
///
/// ```
/// use t_term::buffer::FrameBuffer;
/// use t_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(58, 7);
/// assert!(renderer.render(&frame).full_redraw);
/// assert_eq!(renderer.render(&frame).cells_rendered, 0);
/// ```
#[derive(Debug, Default)]
pub struct DiffRenderer {
    output: OutputBuffer,
    pen: Pen,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer whose first frame clears the screen and draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            pen: Pen::new(),
            previous: None,
        }
    }

    /// Produce the bytes that turn the last frame into `current`.
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        let (width, height) = (current.width(), current.height());
        let mut stats = RenderStats::default();

        if width > 0 && height > 0 {
            let previous = self
                .previous
                .take()
                .filter(|prev| prev.width() == width && prev.height() == height);
            stats.full_redraw = previous.is_none();
            stats.cells_rendered = self.draw(current, previous.as_ref());
            stats.cells_skipped = usize::from(width) * usize::from(height) - stats.cells_rendered;
            stats.bytes_written = self.output.len();
            self.previous = previous;
        }

        self.remember(current);
        stats
    }

    /// Write the changed spans of every row. Returns how many cells were written.
    fn draw(&mut self, current: &FrameBuffer, previous: Option<&FrameBuffer>) -> usize {
        let out = &mut self.output;
        ansi::set_mode(out, DecMode::SyncOutput, true).ok();
        if previous.is_none() {
            ansi::reset(out).ok();
            ansi::clear_screen(out).ok();
        }
        self.pen.begin_frame();

        let mut written = 0;
        for y in 0..current.height() {
            let Some(row) = current.row(y) else { break };
            let prev_row = previous.and_then(|p| p.row(y)).unwrap_or_default();
            for span in changed_spans(prev_row, row) {
                for (x, cell) in span.clone().zip(&row[span.clone()]) {
                    let Ok(x) = u16::try_from(x) else { break };
                    self.pen.put(out, x, y, cell);
                }
                written += span.len();
            }
        }

        // Frames always end in the default rendition.
        ansi::reset(out).ok();
        ansi::set_mode(out, DecMode::SyncOutput, false).ok();
        written
    }

    /// The bytes produced by the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Send the last render to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Forget the last frame: the next render clears the screen.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn remember(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) if prev.width() == current.width() && prev.height() == current.height() => {
                prev.copy_from(current);
            }
            slot => *slot = Some(current.clone()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
