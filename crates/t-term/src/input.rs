// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Raw tty bytes become key events. The clock binds letters, digits, Escape
// and the arrow keys, so that is all the parser reports. Every other escape
// sequence is still consumed whole, so a Home key never arrives as a stray
// `[` followed by `H`.
//
// In raw mode Ctrl-C is the byte 0x03, not SIGINT. Control bytes 0x01-0x1A
// come out as Ctrl plus the letter; ESC plus a printable byte is Alt.
//
// A read can end in the middle of a sequence or a UTF-8 character. Such a
// tail stays buffered until the next `advance`. A lone ESC is ambiguous
// until the input goes quiet, which is when `flush` turns it into Escape.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// Something the user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Whether this is Ctrl plus the letter `c`.
    #[inline]
    #[must_use]
    pub fn is_ctrl(&self, c: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Escape,
    Up,
    Down,
    Left,
    Right,
}

bitflags! {
    /// Modifier bits as xterm encodes them: the parameter is `1 + bits`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

/// Bytes in, key events out, across as many reads as a sequence needs.
#[derive(Debug, Default)]
pub struct Parser {
    pending: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(16),
        }
    }

    /// Append `data` and decode everything that is complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(data);

        let mut events = Vec::new();
        let mut rest = self.pending.as_slice();
        while !rest.is_empty() {
            match decode(rest) {
                Step::Emit(event, len) => {
                    events.push(event);
                    rest = &rest[len..];
                }
                Step::Drop(len) => rest = &rest[len..],
                Step::Wait => break,
            }
        }

        let used = self.pending.len() - rest.len();
        self.pending.drain(..used);
        events
    }

    /// Whether the last `advance` left an unfinished tail.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Give up on the unfinished tail. A tail starting with ESC was the
    /// Escape key; anything else is discarded.
    pub fn flush(&mut self) -> Option<Event> {
        let escape = self.pending.first() == Some(&ESC);
        self.pending.clear();
        escape.then_some(key(KeyCode::Escape, Modifiers::empty()))
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// What to do with the front of the pending bytes.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Report an event that used this many bytes.
    Emit(Event, usize),
    /// Throw away this many bytes.
    Drop(usize),
    /// The front is a prefix of something longer.
    Wait,
}

fn decode(bytes: &[u8]) -> Step {
    match *bytes {
        [] | [ESC] | [ESC, b'[' | b'O'] => Step::Wait,
        [ESC, b'[', ..] => csi(&bytes[2..]),
        [ESC, b'O', last, ..] => arrow(last).map_or(Step::Drop(3), |code| {
            Step::Emit(key(code, Modifiers::empty()), 3)
        }),
        [ESC, ESC, ..] => Step::Emit(key(KeyCode::Escape, Modifiers::ALT), 2),
        [ESC, b @ 0x20..=0x7E, ..] => Step::Emit(key(KeyCode::Char(char::from(b)), Modifiers::ALT), 2),
        [ESC, ..] => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
        [b @ 0x01..=0x1A, ..] => {
            Step::Emit(key(KeyCode::Char(char::from(b'a' + b - 1)), Modifiers::CTRL), 1)
        }
        [b @ 0x20..=0x7E, ..] => Step::Emit(key(KeyCode::Char(char::from(b)), Modifiers::empty()), 1),
        [lead, ..] => utf8(bytes, lead),
    }
}

/// A control sequence after its `ESC [`. Lengths count the introducer.
fn csi(body: &[u8]) -> Step {
    for (i, &b) in body.iter().enumerate() {
        let len = i + 3;
        match b {
            // Parameter and intermediate bytes.
            0x20..=0x3F => {}
            0x40..=0x7E => {
                return arrow(b).map_or(Step::Drop(len), |code| {
                    Step::Emit(key(code, modifiers(&body[..i])), len)
                });
            }
            _ => return Step::Drop(len),
        }
    }
    Step::Wait
}

const fn arrow(last: u8) -> Option<KeyCode> {
    match last {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        _ => None,
    }
}

/// Modifiers from the second parameter of `1;m`, none if absent.
fn modifiers(params: &[u8]) -> Modifiers {
    std::str::from_utf8(params)
        .ok()
        .and_then(|p| p.split(';').nth(1))
        .and_then(|m| m.parse::<u8>().ok())
        .map_or(Modifiers::empty(), |m| {
            Modifiers::from_bits_truncate(m.saturating_sub(1))
        })
}

fn utf8(bytes: &[u8], lead: u8) -> Step {
    let len = match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Step::Drop(1),
    };
    let Some(encoded) = bytes.get(..len) else {
        return Step::Wait;
    };
    std::str::from_utf8(encoded)
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Step::Drop(1), |ch| {
            Step::Emit(key(KeyCode::Char(ch), Modifiers::empty()), len)
        })
}

const fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
