// SPDX-License-Identifier: MIT
//
// t-term: Terminal rendering engine for t-clock.
//
// Direct terminal control through ANSI escape sequences and raw termios,
// without a TUI framework in between. A display paints into a cell grid,
// the grid is diffed against the previous frame, and only changed cells
// reach the terminal, inside synchronized output. A once-per-second clock
// therefore rewrites a couple of digits per tick and never flickers.
//
// The system-facing half (terminal, reader, event loop) is Unix-only: it
// sits on termios, ioctl, poll, and sigaction.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod input;
pub mod output;
pub mod window;

#[cfg(unix)]
pub mod event_loop;
#[cfg(unix)]
pub mod reader;
#[cfg(unix)]
pub mod terminal;
