//! Recurrence specifications -- the typed rule plus the validated parse step
//! from the string form a form layer hands over.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{RecurrenceError, Result};

/// Largest number of instances a single spec may request. Larger counts are clamped.
pub const MAX_COUNT: u32 = 366;

/// Default time-of-day for a new spec (09:00).
pub const DEFAULT_START_TIME: &str = "09:00";

/// Default number of occurrences for a new spec.
pub const DEFAULT_COUNT: u32 = 10;

/// Stride rule between consecutive instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// One instance per day starting on the start date.
    Daily,
    /// One instance per week on the given weekday, aligned forward from the start date.
    Weekly(Weekday),
}

impl Pattern {
    /// Build a pattern from its name and a 0=Sunday..6=Saturday weekday index.
    ///
    /// The weekday is only consulted for `weekly`; a daily pattern ignores it
    /// even when it is out of range.
    pub fn from_parts(name: &str, weekday: Option<u8>) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Pattern::Daily),
            "weekly" => {
                let index = weekday.ok_or_else(|| {
                    RecurrenceError::InvalidWeekday("missing for weekly pattern".to_string())
                })?;
                Ok(Pattern::Weekly(weekday_from_sunday_index(index)?))
            }
            _ => Err(RecurrenceError::InvalidPattern(name.to_string())),
        }
    }

    /// Lower-case pattern name as accepted by [`Pattern::from_parts`].
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Daily => "daily",
            Pattern::Weekly(_) => "weekly",
        }
    }

    /// The weekday a weekly pattern is anchored to.
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            Pattern::Daily => None,
            Pattern::Weekly(day) => Some(*day),
        }
    }

    /// Days between consecutive instances.
    pub fn stride_days(&self) -> u64 {
        match self {
            Pattern::Daily => 1,
            Pattern::Weekly(_) => 7,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Daily => f.write_str("daily"),
            Pattern::Weekly(day) => write!(f, "weekly on {}", weekday_long_name(*day)),
        }
    }
}

/// A recurring event rule: where it starts, at what time, how it repeats, how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceSpec {
    /// First candidate date. `None` means the caller has not picked one yet.
    pub start_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub pattern: Pattern,
    /// Requested number of instances; see [`RecurrenceSpec::effective_count`].
    pub count: u32,
}

impl RecurrenceSpec {
    pub fn new(start_date: NaiveDate, start_time: NaiveTime, pattern: Pattern, count: u32) -> Self {
        Self {
            start_date: Some(start_date),
            start_time,
            pattern,
            count,
        }
    }

    /// Shorthand for a daily spec.
    pub fn daily(start_date: NaiveDate, start_time: NaiveTime, count: u32) -> Self {
        Self::new(start_date, start_time, Pattern::Daily, count)
    }

    /// Shorthand for a weekly spec on `weekday`.
    pub fn weekly(
        start_date: NaiveDate,
        start_time: NaiveTime,
        weekday: Weekday,
        count: u32,
    ) -> Self {
        Self::new(start_date, start_time, Pattern::Weekly(weekday), count)
    }

    /// The count actually used for expansion: 0 becomes 1, anything above
    /// [`MAX_COUNT`] becomes [`MAX_COUNT`].
    pub fn effective_count(&self) -> u32 {
        self.count.clamp(1, MAX_COUNT)
    }

    /// Date of the first instance.
    ///
    /// For weekly specs this is the start date moved forward, one day at a time,
    /// onto the requested weekday (no movement when it already matches).
    /// Returns `None` when there is no start date.
    pub fn aligned_start(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        let Pattern::Weekly(target) = self.pattern else {
            return Some(start);
        };

        let mut date = start;
        let mut advanced = 0u32;
        while date.weekday() != target {
            date = date.succ_opt()?;
            advanced += 1;
        }
        trace!(%start, aligned = %date, advanced, "aligned weekly start");
        Some(date)
    }

    /// Render the rule as an RFC 5545 RRULE value, e.g. `FREQ=WEEKLY;BYDAY=MO;COUNT=3`.
    ///
    /// Pair it with [`RecurrenceSpec::aligned_start`] as DTSTART to describe the
    /// same series to an iCalendar consumer.
    pub fn to_rrule(&self) -> String {
        let count = self.effective_count();
        match self.pattern {
            Pattern::Daily => format!("FREQ=DAILY;COUNT={}", count),
            Pattern::Weekly(day) => {
                format!("FREQ=WEEKLY;BYDAY={};COUNT={}", byday_code(day), count)
            }
        }
    }
}

/// String-typed spec exactly as a form supplies it. Empty strings mean "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSpec {
    /// `YYYY-MM-DD`, or empty when not chosen yet.
    pub start_date: String,
    /// `HH:MM` (seconds optional).
    pub start_time: String,
    /// `daily` or `weekly`.
    pub pattern: String,
    /// 0=Sunday..6=Saturday, weekly only.
    pub weekday: Option<u8>,
    pub count: i64,
}

impl Default for RawSpec {
    fn default() -> Self {
        Self {
            start_date: String::new(),
            start_time: DEFAULT_START_TIME.to_string(),
            pattern: "weekly".to_string(),
            weekday: Some(1),
            count: i64::from(DEFAULT_COUNT),
        }
    }
}

impl TryFrom<RawSpec> for RecurrenceSpec {
    type Error = RecurrenceError;

    fn try_from(raw: RawSpec) -> Result<Self> {
        let start_date = parse_optional_date(&raw.start_date)?;
        let start_time = parse_time(&raw.start_time)?;
        let pattern = Pattern::from_parts(&raw.pattern, raw.weekday)?;
        // Negative and oversized counts collapse into the supported range.
        let count = u32::try_from(raw.count.max(0)).unwrap_or(u32::MAX);

        Ok(Self {
            start_date,
            start_time,
            pattern,
            count,
        })
    }
}

impl FromStr for Pattern {
    type Err = RecurrenceError;

    /// Parses `daily`, or `weekly:N` with N a 0=Sunday..6=Saturday index.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((name, day)) => {
                let index = day
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| RecurrenceError::InvalidWeekday(day.to_string()))?;
                Pattern::from_parts(name, Some(index))
            }
            None => Pattern::from_parts(s, None),
        }
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| RecurrenceError::InvalidDate(s.to_string()))
}

/// Parse a date that may be left empty; empty or whitespace yields `None`.
pub fn parse_optional_date(s: &str) -> Result<Option<NaiveDate>> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(s).map(Some)
    }
}

/// Parse an `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| RecurrenceError::InvalidTime(s.to_string()))
}

/// Map a 0=Sunday..6=Saturday index onto a [`Weekday`].
pub fn weekday_from_sunday_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(RecurrenceError::InvalidWeekday(other.to_string())),
    }
}

fn byday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn weekday_long_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
