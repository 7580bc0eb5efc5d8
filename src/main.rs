// SPDX-License-Identifier: MIT
//
// t-clock: a terminal clock in large block digits.
//
// This is the binary that wires the two crates together:
//
//   t-term → terminal control, frame buffer, diff rendering, input, tick loop
//   t-core → options, time, glyphs, geometry, rebound, face painting
//
// ClockApp implements t-term's App trait over a t-core Clock. Each second:
//
//   tick → read the wall clock → advance rebound → paint both panels
//        → diff against the last frame → write only the changed cells
//
// Layout (default, seconds on):
//
//   ┌────────────────────────────────────────────────────────┐
//   │ HH  HH  :  MM  MM  :  SS  SS                           │  primary
//   └────────────────────────────────────────────────────────┘
//   ┌────────────────────────────────────────────────────────┐
//   │ HH  HH  :  MM  MM                                      │  secondary
//   └────────────────────────────────────────────────────────┘

mod app;
mod cli;
mod error;

use std::env;
use std::process;

use env_logger::Env;
use t_core::clock::Clock;
use t_core::time::WallClock;
use t_term::event_loop::{EventLoop, LoopConfig};
use t_term::terminal::Terminal;

use crate::app::ClockApp;
use crate::error::AppError;

fn main() {
    // Nothing below `error` by default: log lines would land on the clock.
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let code = match run() {
        Ok(()) => 0,
        Err(err) => report(&err),
    };
    process::exit(code);
}

fn run() -> Result<(), AppError> {
    let config = cli::parse(env::args_os())?;

    let terminal = match &config.device {
        Some(path) => Terminal::open(path)?,
        None => Terminal::stdio(),
    };
    let loop_config = LoopConfig {
        tick_interval: config.options.tick,
    };
    let mut event_loop = EventLoop::new(terminal, loop_config);

    let clock = Clock::new(config.options, WallClock, event_loop.size());
    let mut app = ClockApp::new(clock);
    event_loop.run(&mut app)?;
    Ok(())
}

/// Print what went wrong and pick the exit status.
fn report(err: &AppError) -> i32 {
    match err {
        AppError::Help => println!("{}", cli::USAGE),
        AppError::Usage(e) => {
            log::debug!("argument error: {e}");
            eprintln!("{}", cli::USAGE);
        }
        AppError::Terminal(_) | AppError::Io(_) => eprintln!("t-clock: error: {err}."),
    }
    err.exit_code()
}
