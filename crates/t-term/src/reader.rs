// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Input reader: waits for tty bytes or the next tick, whichever is first.
//
// The clock is single-threaded, so instead of a background reader thread
// the loop blocks in `poll()` on the input descriptor with the time left
// until the next tick as the timeout. That one call is the loop's sleep:
//
//   - a key press wakes it early (instant response to `q`),
//   - the timeout expiring is the tick,
//   - a signal interrupts it with EINTR, so a SIGINT during the one-second
//     wait is seen right away instead of after the sleep.
//
// When the input side reaches EOF (stdin redirected from /dev/null, a
// device that hung up) the reader keeps polling with no descriptors at all.
// That is still an interruptible sleep, and it stops a dead descriptor
// from turning the loop into a busy spin.

use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Bytes requested per read. Key presses are 1-6 bytes.
const READ_BUF_SIZE: usize = 1024;

/// Outcome of one [`InputReader::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wait {
    /// Bytes arrived before the timeout.
    Input(Vec<u8>),
    /// The timeout expired with no input.
    Timeout,
    /// A signal interrupted the wait.
    Interrupted,
    /// The input reached EOF. Later waits only sleep.
    Closed,
}

/// Poll-based reader over a raw input descriptor.
pub struct InputReader {
    fd: RawFd,
    open: bool,
    buf: [u8; READ_BUF_SIZE],
}

impl InputReader {
    /// Read from `fd`. The descriptor is borrowed; the caller keeps it open.
    #[must_use]
    pub const fn new(fd: RawFd) -> Self {
        Self {
            fd,
            open: true,
            buf: [0; READ_BUF_SIZE],
        }
    }

    /// A reader with no input. Every wait is a plain interruptible sleep.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            fd: -1,
            open: false,
            buf: [0; READ_BUF_SIZE],
        }
    }

    /// Whether the input side is still open.
    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Block until input arrives, `timeout` expires, or a signal lands.
    ///
    /// # Errors
    ///
    /// Returns an error if `poll` or `read` fails for a reason other than
    /// signal interruption.
    pub fn wait(&mut self, timeout: Duration) -> io::Result<Wait> {
        let ms = timeout_ms(timeout);
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let nfds: libc::nfds_t = if self.open { 1 } else { 0 };

        // With nfds = 0 the pointer is never dereferenced.
        let ready = unsafe { libc::poll(&raw mut pfd, nfds, ms) };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(Wait::Interrupted)
            } else {
                Err(err)
            };
        }
        if ready == 0 || !self.open {
            return Ok(Wait::Timeout);
        }
        if pfd.revents & libc::POLLNVAL != 0 {
            log::debug!("input descriptor {} is invalid, detaching", self.fd);
            self.open = false;
            return Ok(Wait::Closed);
        }

        let n = unsafe { libc::read(self.fd, self.buf.as_mut_ptr().cast(), self.buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted => Ok(Wait::Interrupted),
                io::ErrorKind::WouldBlock => Ok(Wait::Timeout),
                _ => Err(err),
            };
        }
        if n == 0 {
            log::debug!("input reached EOF, detaching");
            self.open = false;
            return Ok(Wait::Closed);
        }

        let len = usize::try_from(n).unwrap_or(0);
        Ok(Wait::Input(self.buf[..len].to_vec()))
    }
}

/// Milliseconds for `poll`, rounded up so a short remainder never spins.
fn timeout_ms(timeout: Duration) -> libc::c_int {
    let ms = timeout.as_nanos().div_ceil(1_000_000);
    libc::c_int::try_from(ms).unwrap_or(libc::c_int::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
