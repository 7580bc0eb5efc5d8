// SPDX-License-Identifier: MIT
//
// The clock as an event-loop application.
//
// Keys map to clock commands; the clock reports how much of the screen
// each change invalidated and that becomes the loop's redraw request.

use t_core::clock::{Change, Clock, Command, Direction};
use t_core::face;
use t_core::time::TimeSource;
use t_term::buffer::{FrameBuffer, Size};
use t_term::event_loop::{Action, App, Redraw};
use t_term::input::{Event, KeyCode, KeyEvent, Modifiers};

// ─── Key Bindings ───────────────────────────────────────────────────────────

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Run(Command),
}

/// Map a key to its action. Unbound keys give `None`.
#[must_use]
pub fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.is_ctrl('c') {
        return Some(KeyAction::Quit);
    }
    if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
        return None;
    }

    let command = match key.code {
        KeyCode::Escape | KeyCode::Char('q' | 'Q') => return Some(KeyAction::Quit),
        KeyCode::Char('s') => Command::ToggleSeconds,
        KeyCode::Char('c') => Command::ToggleCenter,
        KeyCode::Char('o') => Command::ToggleBlink,
        KeyCode::Char('x') => Command::ToggleBox,
        KeyCode::Char('b') => Command::ToggleBold,
        KeyCode::Char('r') => Command::ToggleRebound,
        KeyCode::Char('d') => Command::ToggleDate,
        KeyCode::Char('p') => Command::CycleColor,
        KeyCode::Char(ch @ '0'..='7') => {
            Command::SetColor(ch.to_digit(8).and_then(|d| u8::try_from(d).ok())?)
        }
        KeyCode::Char('k') | KeyCode::Up => Command::Move(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => Command::Move(Direction::Down),
        KeyCode::Char('h') | KeyCode::Left => Command::Move(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => Command::Move(Direction::Right),
        _ => return None,
    };
    Some(KeyAction::Run(command))
}

/// Loop redraw request for a clock change.
#[must_use]
pub const fn redraw_for(change: Change) -> Redraw {
    match change {
        Change::Nothing => Redraw::Skip,
        Change::Redraw => Redraw::Changed,
        Change::FullRedraw => Redraw::Full,
    }
}

// ─── ClockApp ───────────────────────────────────────────────────────────────

pub struct ClockApp<T> {
    clock: Clock<T>,
    /// Strongest change from input since the last repaint.
    pending: Change,
}

impl<T: TimeSource> ClockApp<T> {
    #[must_use]
    pub const fn new(clock: Clock<T>) -> Self {
        Self {
            clock,
            pending: Change::Nothing,
        }
    }

    #[must_use]
    pub const fn clock(&self) -> &Clock<T> {
        &self.clock
    }
}

impl<T: TimeSource> App for ClockApp<T> {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        match key_action(key) {
            Some(KeyAction::Quit) => Action::Quit,
            Some(KeyAction::Run(command)) => {
                self.pending = self.pending.max(self.clock.apply(command));
                Action::Continue
            }
            None => Action::Continue,
        }
    }

    fn after_input(&mut self) -> Redraw {
        redraw_for(std::mem::replace(&mut self.pending, Change::Nothing))
    }

    fn on_resize(&mut self, size: Size) {
        self.clock.resize(size);
    }

    fn on_tick(&mut self) -> Redraw {
        redraw_for(self.clock.tick())
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        face::paint(&self.clock, buf);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
