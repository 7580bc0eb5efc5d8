// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, and RAII cleanup.
//
// Safety: This module uses `unsafe` for termios (tcgetattr, tcsetattr),
// ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are the POSIX
// interfaces for terminal control and there is no safe alternative.
#![allow(unsafe_code)]
//
// A Terminal is either the process's own stdio or a device opened by path
// (drawing a clock on another tty, `-f /dev/pts/3`). Raw mode, the size
// query, and all output go to that device. Entering switches to the
// alternate screen and hides the cursor; leaving (or dropping) restores
// both and the original termios.
//
// The panic hook bypasses every lock and writes a pre-built restore
// sequence straight to the output descriptor, then restores termios from
// a global backup, so a panic mid-frame still leaves a usable shell.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, Once};

use thiserror::Error;

use crate::ansi::{self, DecMode};
pub use crate::buffer::Size;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure to set up a terminal.
#[derive(Debug, Error)]
pub enum TermError {
    /// The requested terminal device could not be opened.
    #[error("'{}' couldn't be opened: {source}", .path.display())]
    OpenDevice {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the size of the terminal behind `fd` via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if `fd` is not a terminal or reports a zero size.
#[must_use]
pub fn get_size(fd: RawFd) -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    (result == 0 && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

/// Whether `fd` refers to a terminal.
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Termios to restore on panic, with the descriptor it belongs to.
static TERMIOS_BACKUP: Mutex<Option<(RawFd, libc::termios)>> = Mutex::new(None);

/// Where the panic hook writes the restore sequence.
static EMERGENCY_FD: AtomicI32 = AtomicI32::new(libc::STDOUT_FILENO);

fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSANOW, original);
            }
        }
    }
}

/// End synchronized output, reset SGR, show cursor, exit alternate screen.
///
/// The alternate screen exit comes last so the restored shell content
/// appears with no leftover clock cells.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            restore_termios_from_backup();
            original(info);
        }));
    });
}

fn emergency_restore() {
    let fd = EMERGENCY_FD.load(Ordering::Relaxed);
    unsafe {
        let _ = libc::write(
            fd,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// ```no_run
/// use std::io::Write;
/// use t_term::terminal::Terminal;
///
/// let mut term = Terminal::stdio();
/// term.enter()?;
/// write!(term, "tick")?;
/// term.flush()?;
/// // Restored on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Opened device, or `None` for stdin/stdout.
    device: Option<File>,
    original_termios: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A terminal over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::from_device(None)
    }

    /// Open a terminal device (or any writable path) for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::OpenDevice`] if the path cannot be opened.
    pub fn open(path: &Path) -> Result<Self, TermError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| TermError::OpenDevice {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("opened terminal device {}", path.display());
        Ok(Self::from_device(Some(file)))
    }

    fn from_device(device: Option<File>) -> Self {
        let mut term = Self {
            device,
            original_termios: None,
            size: Size::FALLBACK,
            active: false,
        };
        term.refresh_size();
        term
    }

    /// Descriptor keys are read from.
    #[must_use]
    pub fn input_fd(&self) -> RawFd {
        self.device
            .as_ref()
            .map_or(libc::STDIN_FILENO, AsRawFd::as_raw_fd)
    }

    /// Descriptor frames are written to.
    #[must_use]
    pub fn output_fd(&self) -> RawFd {
        self.device
            .as_ref()
            .map_or(libc::STDOUT_FILENO, AsRawFd::as_raw_fd)
    }

    /// Current terminal size (cached, refresh with [`refresh_size`](Self::refresh_size)).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size from the device. Keeps the last known size on failure.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size(self.output_fd()) {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter full-screen mode: raw input, alternate screen, hidden cursor.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        EMERGENCY_FD.store(self.output_fd(), Ordering::Relaxed);
        self.enable_raw_mode()?;

        ansi::set_mode(self, DecMode::AltScreen, true)?;
        ansi::set_mode(self, DecMode::CursorVisible, false)?;
        ansi::clear_screen(self)?;
        self.flush()?;

        self.active = true;
        log::info!("entered alternate screen ({}x{})", self.size.cols, self.size.rows);
        Ok(())
    }

    /// Leave full-screen mode and restore the terminal. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        ansi::set_mode(self, DecMode::SyncOutput, false)?;
        ansi::reset(self)?;
        ansi::set_mode(self, DecMode::CursorVisible, true)?;
        ansi::set_mode(self, DecMode::AltScreen, false)?;
        self.flush()?;

        self.disable_raw_mode()?;
        self.active = false;
        log::info!("restored normal screen");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        let fd = self.input_fd();
        if !is_tty(fd) {
            log::debug!("input is not a tty, skipping raw mode");
            return Ok(());
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some((fd, termios));
            }

            // cfmakeraw equivalent.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            let fd = self.input_fd();
            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original_termios = None;
        }
        Ok(())
    }
}

impl Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.device {
            Some(file) => file.write(buf),
            None => io::stdout().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.device {
            Some(file) => file.flush(),
            None => io::stdout().lock().flush(),
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
