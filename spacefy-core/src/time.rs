//! Calendar dates, wall-clock times and the instants composed from them.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute point in time. Timezone handling belongs to the caller.
pub type Instant = NaiveDateTime;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// A date picked on its own, without a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns `None` when the triple is not a real calendar day.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn of(instant: Instant) -> Self {
        Self(instant.date())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A time of day with minute precision, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallClock(NaiveTime);

impl WallClock {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Truncates seconds and below.
    pub fn of(instant: Instant) -> Self {
        let time = instant.time();
        let truncated = time
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(time);
        Self(truncated)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for WallClock {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = NaiveTime::parse_from_str(&value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
            .map_err(|e| format!("invalid time of day '{}': {}", value, e))?;
        Self::new(parsed.hour(), parsed.minute())
            .ok_or_else(|| format!("invalid time of day '{}'", value))
    }
}

impl From<WallClock> for String {
    fn from(value: WallClock) -> Self {
        value.to_string()
    }
}

/// Combines a picked date and a picked time into one instant.
pub fn compose(date: CalendarDate, time: WallClock) -> Instant {
    date.0.and_time(time.0)
}

/// Elapsed hours from `start` to `end`. Zero when `end` is not after `start`.
pub fn hours_between(start: Instant, end: Instant) -> Decimal {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
}
