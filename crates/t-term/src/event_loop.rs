// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: the tick-driven heartbeat of a full-screen display.
//
// One thread, one loop:
//
//   check flags → tick if the deadline passed → paint and diff-render if
//   anything changed → wait for input until the next deadline → repeat
//
// The wait is the reader's `poll()`, so keys are handled as they arrive
// and the display still ticks on schedule. There is no separate sleep.
//
// # Signals
//
// SIGINT and SIGTERM set a shutdown flag; SIGWINCH sets a resize flag. The
// handlers store into atomics and nothing else. They are installed without
// SA_RESTART, so a signal landing during the wait interrupts `poll()` and
// the loop sees the flag immediately rather than at the next tick.
//
// # Escape Sequence Timeout
//
// A lone ESC is either the Escape key or the start of a sequence. When a
// read ends with bytes pending, the loop waits briefly for the rest and
// then flushes whatever is left as literal keys.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::reader::{InputReader, Wait};
use crate::terminal::{Size, Terminal};

/// How long to wait for the rest of an escape sequence.
const ESC_TIMEOUT: Duration = Duration::from_millis(25);

// ─── Signals ─────────────────────────────────────────────────────────────────

/// Set by SIGINT / SIGTERM. Checked every loop iteration.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Set by SIGWINCH. Checked every loop iteration.
static RESIZED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_shutdown_signal(_sig: libc::c_int) {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

extern "C" fn on_resize_signal(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

fn install_handler(sig: libc::c_int, handler: extern "C" fn(libc::c_int)) -> io::Result<()> {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler as usize;
        // No SA_RESTART: the wait must return EINTR.
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        if libc::sigaction(sig, &raw const sa, std::ptr::null_mut()) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Install the SIGINT, SIGTERM, and SIGWINCH handlers.
///
/// # Errors
///
/// Returns an error if `sigaction` fails.
pub fn install_signal_handlers() -> io::Result<()> {
    install_handler(libc::SIGINT, on_shutdown_signal)?;
    install_handler(libc::SIGTERM, on_shutdown_signal)?;
    install_handler(libc::SIGWINCH, on_resize_signal)?;
    log::debug!("signal handlers installed");
    Ok(())
}

/// Whether a termination signal has been received.
#[must_use]
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// How much of the screen a tick invalidated.
///
/// Ordered so that combining two requests keeps the stronger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    /// Nothing visible changed.
    Skip,
    /// Repaint; the diff renderer rewrites only changed cells.
    Changed,
    /// Clear the screen and redraw every cell.
    Full,
}

/// Loop lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each key,
/// [`after_input`](App::after_input) once the batch is handled,
/// [`on_resize`](App::on_resize) after SIGWINCH, [`on_tick`](App::on_tick)
/// when the tick deadline passes, and [`paint`](App::paint) when anything
/// changed. `on_resize` is also called once before the first tick.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to stop the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// How much to repaint after a batch of input events.
    fn after_input(&mut self) -> Redraw {
        Redraw::Changed
    }

    /// The terminal size changed (or is being reported for the first time).
    fn on_resize(&mut self, _size: Size) {}

    /// Advance time-based state. Called once per tick interval.
    fn on_tick(&mut self) -> Redraw;

    /// Paint the current state. The buffer is cleared before each call.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Time between ticks.
    pub tick_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// ```no_run
/// use t_term::buffer::FrameBuffer;
/// use t_term::cell::Cell;
/// use t_term::event_loop::{App, EventLoop, LoopConfig, Redraw};
/// use t_term::terminal::Terminal;
///
/// struct Ticker(u64);
///
/// impl App for Ticker {
///     fn on_tick(&mut self) -> Redraw {
///         self.0 += 1;
///         Redraw::Changed
///     }
///
///     fn paint(&mut self, buf: &mut FrameBuffer) {
///         buf.put_text(0, 0, &self.0.to_string(), Cell::EMPTY);
///     }
/// }
///
/// let mut event_loop = EventLoop::new(Terminal::stdio(), LoopConfig::default());
/// event_loop.run(&mut Ticker(0))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    reader: InputReader,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
    state: LoopState,
}

impl EventLoop {
    /// A loop reading keys from and drawing to `terminal`.
    #[must_use]
    pub fn new(terminal: Terminal, config: LoopConfig) -> Self {
        let reader = InputReader::new(terminal.input_fd());
        Self::with_reader(terminal, reader, config)
    }

    /// A loop with an explicit input reader.
    #[must_use]
    pub fn with_reader(terminal: Terminal, reader: InputReader, config: LoopConfig) -> Self {
        Self {
            terminal,
            reader,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
            state: LoopState::Running,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Run until the application quits or a termination signal arrives.
    ///
    /// The terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, input, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }

        install_signal_handlers()?;
        self.terminal.enter()?;

        let result = self.run_inner(app);

        self.state = LoopState::Stopped;
        let restored = self.terminal.leave();
        result.and(restored)
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let mut size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        app.on_resize(size);

        let interval = self.config.tick_interval;
        let mut deadline = Instant::now();
        let mut redraw = Redraw::Full;

        loop {
            if shutdown_requested() {
                log::info!("termination signal received, stopping");
                return Ok(());
            }

            if RESIZED.swap(false, Ordering::Relaxed) {
                size = self.terminal.refresh_size();
                log::debug!("terminal resized to {}x{}", size.cols, size.rows);
                frame.resize(size.cols, size.rows);
                app.on_resize(size);
                redraw = Redraw::Full;
            }

            let now = Instant::now();
            if now >= deadline {
                redraw = redraw.max(app.on_tick());
                deadline += interval;
                if deadline <= now {
                    deadline = now + interval;
                }
            }

            if redraw != Redraw::Skip {
                if redraw == Redraw::Full {
                    self.renderer.force_redraw();
                }
                frame.clear();
                app.paint(&mut frame);
                let stats = self.renderer.render(&frame);
                log::trace!(
                    "rendered {}/{} cells, {} bytes",
                    stats.cells_rendered,
                    stats.total_cells(),
                    stats.bytes_written
                );
                self.renderer.flush_to(&mut self.terminal)?;
                redraw = Redraw::Skip;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let events = match self.reader.wait(remaining)? {
                Wait::Input(bytes) => self.parse_input(&bytes)?,
                Wait::Timeout => self.parser.flush().into_iter().collect(),
                Wait::Interrupted | Wait::Closed => Vec::new(),
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    log::info!("quit requested");
                    return Ok(());
                }
            }
            if !events.is_empty() {
                redraw = redraw.max(app.after_input());
            }
        }
    }

    /// Parse a chunk of input, resolving a trailing partial sequence.
    fn parse_input(&mut self, bytes: &[u8]) -> io::Result<Vec<Event>> {
        let mut events = self.parser.advance(bytes);
        if self.parser.has_pending() {
            if let Wait::Input(more) = self.reader.wait(ESC_TIMEOUT)? {
                events.extend(self.parser.advance(&more));
            }
            events.extend(self.parser.flush());
        }
        Ok(events)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::input::{KeyCode, KeyEvent};
    use std::os::unix::io::RawFd;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("t-loop-{name}-{}", std::process::id()));
        std::fs::File::create(&path).unwrap();
        path
    }

    fn pipe_with(bytes: &[u8]) -> (RawFd, RawFd) {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let n = unsafe { libc::write(fds[1], bytes.as_ptr().cast(), bytes.len()) };
        assert_eq!(usize::try_from(n).unwrap(), bytes.len());
        (fds[0], fds[1])
    }

    /// Counts ticks and paints, quits on `q`.
    #[derive(Default)]
    struct Probe {
        ticks: u32,
        paints: u32,
        resized_to: Option<Size>,
    }

    impl App for Probe {
        fn on_event(&mut self, event: &Event) -> Action {
            match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('q'),
                    ..
                }) => Action::Quit,
                Event::Key(_) => Action::Continue,
            }
        }

        fn on_resize(&mut self, size: Size) {
            self.resized_to = Some(size);
        }

        fn on_tick(&mut self) -> Redraw {
            self.ticks += 1;
            Redraw::Changed
        }

        fn paint(&mut self, buf: &mut FrameBuffer) {
            self.paints += 1;
            buf.put_text(0, 0, "tick", Cell::EMPTY);
        }
    }

    #[test]
    fn default_config_ticks_once_per_second() {
        assert_eq!(LoopConfig::default().tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn redraw_max_keeps_the_stronger_request() {
        assert_eq!(Redraw::Skip.max(Redraw::Changed), Redraw::Changed);
        assert_eq!(Redraw::Full.max(Redraw::Changed), Redraw::Full);
        assert_eq!(Redraw::Skip.max(Redraw::Skip), Redraw::Skip);
    }

    #[test]
    fn quit_key_stops_the_loop_and_restores_screen() {
        let path = scratch_file("quit");
        let terminal = Terminal::open(&path).unwrap();
        let (read_fd, write_fd) = pipe_with(b"q");
        let config = LoopConfig {
            tick_interval: Duration::from_secs(10),
        };
        let mut event_loop = EventLoop::with_reader(terminal, InputReader::new(read_fd), config);
        let mut app = Probe::default();

        let start = Instant::now();
        event_loop.run(&mut app).unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(event_loop.state(), LoopState::Stopped);
        assert_eq!(app.ticks, 1);
        assert_eq!(app.paints, 1);
        assert_eq!(app.resized_to, Some(Size::FALLBACK));

        drop(event_loop);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("tick"));
        assert!(written.ends_with("\x1b[?1049l"));

        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn stopped_loop_does_not_run_again() {
        let path = scratch_file("stopped");
        let terminal = Terminal::open(&path).unwrap();
        let (read_fd, write_fd) = pipe_with(b"q");
        let mut event_loop =
            EventLoop::with_reader(terminal, InputReader::new(read_fd), LoopConfig::default());

        let mut app = Probe::default();
        event_loop.run(&mut app).unwrap();
        event_loop.run(&mut app).unwrap();
        assert_eq!(app.ticks, 1);

        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
        std::fs::remove_file(path).unwrap();
    }
}
