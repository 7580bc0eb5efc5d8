//! Wall-clock time.
//!
//! The clock reads time through the [`TimeSource`] trait so that tests can
//! pin it. [`WallClock`] asks the OS (local zone or UTC); [`FixedTime`]
//! returns whatever it was last set to.

use std::cell::Cell;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};

/// Format of the date line.
pub const DATE_FORMAT: &str = "%F";

/// Anything that can report the current date and time.
pub trait TimeSource {
    /// The current time, in UTC if `utc` is set and local time otherwise.
    fn now(&self, utc: bool) -> NaiveDateTime;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn now(&self, utc: bool) -> NaiveDateTime {
        if utc {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        }
    }
}

/// A clock that only moves when told to. Ignores the UTC flag.
#[derive(Debug, Clone)]
pub struct FixedTime {
    at: Cell<NaiveDateTime>,
}

impl FixedTime {
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self { at: Cell::new(at) }
    }

    /// Build from calendar fields. Returns `None` for an invalid date or time.
    #[must_use]
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .map(Self::new)
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.at.set(at);
    }

    /// Move forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.at.set(self.at.get() + TimeDelta::seconds(secs));
    }
}

impl TimeSource for FixedTime {
    fn now(&self, _utc: bool) -> NaiveDateTime {
        self.at.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self, utc: bool) -> NaiveDateTime {
        (**self).now(utc)
    }
}

/// The displayed time fields plus the calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub date: NaiveDate,
}

impl ClockTime {
    #[must_use]
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        // Timelike fields are bounded (hour < 24, minute/second < 60);
        // a leap second reports second 59 with extra nanoseconds.
        let field = |v: u32| u8::try_from(v).unwrap_or(0);
        Self {
            hour: field(dt.hour()),
            minute: field(dt.minute()),
            second: field(dt.second()),
            date: dt.date(),
        }
    }

    /// The date as shown on the date line.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Whether the separators are hidden this second.
    #[inline]
    #[must_use]
    pub const fn is_blink_phase(&self, blink: bool) -> bool {
        blink && self.second % 2 == 0
    }
}

/// Split a two-digit field into `[tens, units]`.
#[inline]
#[must_use]
pub const fn split_digits(value: u8) -> [u8; 2] {
    debug_assert!(value < 100);
    [value / 10, value % 10]
}
