// SPDX-License-Identifier: MIT
//
// Command-line parsing.
//
// Short flags only, in the classic clock's spelling. Order matters for
// `-n`: it resets the display options, so any toggle given before the last
// `-n` is discarded while toggles after it still apply. The anchor, the
// date text, and the device survive a reset.
//
// clap's own help flag is disabled so that `-h` prints the usage block
// below and exits 0; any parse error prints the same block and exits 1.
// Numeric values are parsed strictly: `-C abc` or `-a -1` is an error.
// A repeated flag is not: the last `-C`, `-a`, `-d` or `-f` wins.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use t_core::options::{Anchor, Options};

use crate::error::AppError;

/// Printed for `-h` and on any argument error.
pub const USAGE: &str = "\
Usage: t-clock [-usScbBrTnh] [-C color] [-f tty] [-d date] [-a anchor]
    -u            Use UTC time
    -s            Hide seconds
    -S            Don't blink the separators
    -c            Don't center the clock (use the anchor)
    -b            Don't draw boxes
    -B            Bold and blinking digits
    -r            Bounce the clock around the terminal
    -T            Show the date
    -n            Reset display options to defaults
    -C color      Digit color (palette index 0-255)
    -f tty        Draw on another terminal device
    -d date       Text shown instead of the date
    -a anchor     Row and column of the clock when not centered
    -h            Show this help";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "t-clock",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    #[arg(short = 'u', action = ArgAction::Count)]
    utc: u8,
    #[arg(short = 's', action = ArgAction::Count)]
    no_seconds: u8,
    #[arg(short = 'S', action = ArgAction::Count)]
    no_blink: u8,
    #[arg(short = 'c', action = ArgAction::Count)]
    no_center: u8,
    #[arg(short = 'b', action = ArgAction::Count)]
    no_box: u8,
    #[arg(short = 'B', action = ArgAction::Count)]
    bold: u8,
    #[arg(short = 'r', action = ArgAction::Count)]
    rebound: u8,
    #[arg(short = 'T', action = ArgAction::Count)]
    date: u8,
    #[arg(short = 'n', action = ArgAction::Count)]
    reset: u8,
    #[arg(short = 'h', action = ArgAction::SetTrue)]
    help: bool,
    #[arg(short = 'C', value_name = "color")]
    color: Option<u8>,
    #[arg(short = 'f', value_name = "tty")]
    device: Option<PathBuf>,
    #[arg(short = 'd', value_name = "date")]
    date_text: Option<String>,
    #[arg(short = 'a', value_name = "anchor")]
    anchor: Option<u16>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub options: Options,
    /// Terminal device to draw on instead of stdio.
    pub device: Option<PathBuf>,
}

// ─── Parsing ────────────────────────────────────────────────────────────────

/// Parse `args` (including the program name) into a [`Config`].
///
/// # Errors
///
/// [`AppError::Help`] for `-h`, [`AppError::Usage`] for anything clap
/// rejects.
pub fn parse<I, T>(args: I) -> Result<Config, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Args::command().try_get_matches_from(args)?;
    let args = Args::from_arg_matches(&matches)?;
    if args.help {
        return Err(AppError::Help);
    }

    let reset_at = last_given(&matches, "reset");
    let after_reset = |id: &str| last_given(&matches, id) > reset_at;

    let mut options = Options::default();
    if after_reset("utc") {
        options.utc = true;
    }
    if after_reset("no_seconds") {
        options.seconds = false;
    }
    if after_reset("no_blink") {
        options.blink = false;
    }
    if after_reset("no_center") {
        options.center = false;
    }
    if after_reset("no_box") {
        options.draw_box = false;
    }
    if after_reset("bold") {
        options.bold = true;
    }
    if after_reset("rebound") {
        options.rebound = true;
    }
    if after_reset("date") {
        options.date = true;
    }
    if let Some(color) = args.color.filter(|_| after_reset("color")) {
        options.color = color;
    }
    if let Some(n) = args.anchor {
        options.anchor = Anchor::both(n);
    }
    options.date_override = args.date_text;

    log::debug!("options: {options:?}, device: {:?}", args.device);
    Ok(Config {
        options,
        device: args.device,
    })
}

/// Argv index of the last time `id` was given on the command line.
fn last_given(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id).and_then(Iterator::max)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(args: &[&str]) -> Options {
        let argv = std::iter::once("t-clock").chain(args.iter().copied());
        parse(argv).unwrap().options
    }

    fn fails(args: &[&str]) -> bool {
        let argv = std::iter::once("t-clock").chain(args.iter().copied());
        matches!(parse(argv), Err(AppError::Usage(_)))
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(options(&[]), Options::default());
        let config = parse(["t-clock"]).unwrap();
        assert_eq!(config.device, None);
    }

    #[test]
    fn each_toggle() {
        let o = options(&["-u", "-s", "-S", "-c", "-b", "-B", "-r", "-T"]);
        assert!(o.utc && o.bold && o.rebound && o.date);
        assert!(!o.seconds && !o.blink && !o.center && !o.draw_box);
    }

    #[test]
    fn clustered_flags() {
        let o = options(&["-sc"]);
        assert!(!o.seconds && !o.center);
        assert!(o.blink);
    }

    #[test]
    fn values() {
        let config = parse(["t-clock", "-C", "5", "-a", "3", "-d", "today", "-f", "/dev/pts/9"])
            .unwrap();
        assert_eq!(config.options.color, 5);
        assert_eq!(config.options.anchor, Anchor::both(3));
        assert_eq!(config.options.date_override.as_deref(), Some("today"));
        assert_eq!(config.device, Some(PathBuf::from("/dev/pts/9")));
    }

    // ── -n ordering ──────────────────────────────────────────────────────

    #[test]
    fn reset_discards_earlier_toggles() {
        let o = options(&["-s", "-B", "-n"]);
        assert!(o.seconds);
        assert!(!o.bold);
    }

    #[test]
    fn toggles_after_reset_apply() {
        let o = options(&["-s", "-n", "-c"]);
        assert!(o.seconds);
        assert!(!o.center);
    }

    #[test]
    fn reset_in_a_cluster() {
        assert!(options(&["-sn"]).seconds);
        assert!(!options(&["-ns"]).seconds);
    }

    #[test]
    fn reset_color_depends_on_order() {
        assert_eq!(options(&["-C", "5", "-n"]).color, 2);
        assert_eq!(options(&["-n", "-C", "5"]).color, 5);
    }

    #[test]
    fn reset_keeps_anchor_and_date_text() {
        let o = options(&["-a", "4", "-d", "someday", "-n"]);
        assert_eq!(o.anchor, Anchor::both(4));
        assert_eq!(o.date_override.as_deref(), Some("someday"));
    }

    // ── repeats ──────────────────────────────────────────────────────────

    #[test]
    fn repeated_values_keep_the_last() {
        let config = parse(["t-clock", "-C", "1", "-C", "3", "-a", "2", "-a", "5", "-d", "x", "-d", "y"])
            .unwrap();
        assert_eq!(config.options.color, 3);
        assert_eq!(config.options.anchor, Anchor::both(5));
        assert_eq!(config.options.date_override.as_deref(), Some("y"));
    }

    #[test]
    fn repeated_color_still_follows_reset_order() {
        assert_eq!(options(&["-C", "1", "-n", "-C", "3"]).color, 3);
        assert_eq!(options(&["-C", "1", "-C", "3", "-n"]).color, 2);
    }

    #[test]
    fn repeated_toggles() {
        let o = options(&["-s", "-s", "-BB"]);
        assert!(!o.seconds && o.bold);
    }

    #[test]
    fn repeated_help_is_still_help() {
        assert!(matches!(parse(["t-clock", "-h", "-h"]), Err(AppError::Help)));
        assert!(matches!(parse(["t-clock", "-hh"]), Err(AppError::Help)));
    }

    // ── errors ───────────────────────────────────────────────────────────

    #[test]
    fn help_is_its_own_outcome() {
        assert!(matches!(parse(["t-clock", "-h"]), Err(AppError::Help)));
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        assert!(fails(&["-x"]));
        assert!(fails(&["--help"]));
        assert!(fails(&["stray"]));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(fails(&["-C", "abc"]));
        assert!(fails(&["-C", "256"]));
        assert!(fails(&["-a", "-1"]));
        assert!(fails(&["-a", "x"]));
        assert!(fails(&["-C"]));
    }

    #[test]
    fn usage_names_every_flag() {
        for flag in ["-u", "-s", "-S", "-c", "-b", "-B", "-r", "-T", "-n", "-C", "-f", "-d", "-a", "-h"] {
            assert!(USAGE.contains(flag), "{flag} missing from usage");
        }
    }
}
