//! Calendar dates and forecast windows.
//!
//! A [`Window`] is the ordered set of dates fetched and charted together
//! around an anchor date. Month stepping keeps the anchor's day-of-month and
//! clamps it to the last day of shorter months instead of rolling over.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use wfc_utils::dates;

/// Number of months fetched on each side of the anchor.
pub const DEFAULT_HORIZON: u32 = 3;

/// A date with no time-of-day component. Always a valid Gregorian date.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| {
                ForecastError::InvalidDate(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
            })
    }

    /// Parse the canonical `YYYY-MM-DD` form.
    pub fn parse(s: &str) -> Result<Self> {
        dates::parse_date(s)
            .map(CalendarDate)
            .map_err(|_| ForecastError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s.trim())))
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
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

    fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Shift by whole months, keeping this date's day-of-month and clamping
    /// it to the target month's last day.
    pub fn shift_months(&self, delta: i32) -> Result<Self> {
        shift_months(*self, self.day(), delta)
    }

    pub fn shift_days(&self, delta: i64) -> Result<Self> {
        TimeDelta::try_days(delta)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(CalendarDate)
            .ok_or_else(|| ForecastError::InvalidDate(format!("{self} shifted by {delta} days is out of range")))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        CalendarDate(value)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(value: CalendarDate) -> Self {
        value.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dates::format_date(&self.0))
    }
}

impl FromStr for CalendarDate {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        CalendarDate::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// The service echoes dates back as datetimes ("2024-05-01T00:00:00"), so
// deserialization accepts both forms.
impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        dates::parse_date_lenient(&raw)
            .map(CalendarDate)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}

/// Step unit for window generation.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepUnit {
    Day,
    Month,
}

/// Shift `date` by `delta` months, placing the result on `day_of_month`
/// clamped to the target month's length.
fn shift_months(date: CalendarDate, day_of_month: u32, delta: i32) -> Result<CalendarDate> {
    let out_of_range = || ForecastError::InvalidDate(format!("{date} shifted by {delta} months is out of range"));
    let month_index = date.year() as i64 * 12 + date.month0() as i64 + delta as i64;
    let year = i32::try_from(month_index.div_euclid(12)).map_err(|_| out_of_range())?;
    let month = month_index.rem_euclid(12) as u32 + 1;
    let day = day_of_month.min(dates::days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(CalendarDate)
        .ok_or_else(out_of_range)
}

/// An ordered, strictly increasing sequence of dates around an anchor.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize)]
pub struct Window {
    anchor: CalendarDate,
    dates: Vec<CalendarDate>,
}

impl Window {
    pub fn anchor(&self) -> CalendarDate {
        self.anchor
    }

    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<CalendarDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<CalendarDate> {
        self.dates.last().copied()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.dates.binary_search(date).is_ok()
    }

    /// Position of `date` in the window, if present.
    pub fn position(&self, date: &CalendarDate) -> Option<usize> {
        self.dates.binary_search(date).ok()
    }

    /// The canonical `YYYY-MM-DD` strings, in window order.
    pub fn to_strings(&self) -> Vec<String> {
        self.dates.iter().map(ToString::to_string).collect()
    }
}

/// Generate the window of dates from `behind` units before `anchor` through
/// `ahead` units after it.
///
/// For [`StepUnit::Month`] every date carries the anchor's day-of-month,
/// clamped to the last day of months that are too short, so
/// `2024-01-31 ±1` yields `2023-12-31, 2024-01-31, 2024-02-29`.
pub fn generate_window(
    anchor: CalendarDate,
    behind: u32,
    ahead: u32,
    unit: StepUnit,
) -> Result<Window> {
    let day_of_month = anchor.day();
    let step = |offset: i64| -> Result<CalendarDate> {
        match unit {
            StepUnit::Month => {
                let delta = i32::try_from(offset).map_err(|_| {
                    ForecastError::InvalidDate(format!("month offset {offset} is out of range"))
                })?;
                shift_months(anchor, day_of_month, delta)
            }
            StepUnit::Day => anchor.shift_days(offset),
        }
    };

    let start = -(behind as i64);
    let end = ahead as i64;
    let mut dates = Vec::with_capacity(behind as usize + ahead as usize + 1);
    let mut offset = start;
    while offset <= end {
        dates.push(step(offset)?);
        offset += 1;
    }

    Ok(Window { anchor, dates })
}

/// Every day from `start` through `end` inclusive, anchored on `start`.
///
/// The start must fall strictly before the end.
pub fn range_window(start: CalendarDate, end: CalendarDate) -> Result<Window> {
    if start >= end {
        return Err(ForecastError::InvalidDate(
            "The start date must be before the end date.".to_string(),
        ));
    }
    let span = (end.as_naive_date() - start.as_naive_date()).num_days();
    let ahead = u32::try_from(span)
        .map_err(|_| ForecastError::InvalidDate(format!("{start}..{end} spans too many days")))?;
    generate_window(start, 0, ahead, StepUnit::Day)
}
