//! Date-window resolution for timeline paths.
//!
//! Timeline URLs carry optional `/{year}/{month}/{day}` suffixes. This module
//! turns those raw path fragments into an inclusive-start / exclusive-end
//! window over event start times, or no window at all when every fragment is
//! absent.

use thiserror::Error;
use time::{Date, Duration, Month, OffsetDateTime};

/// A half-open `[start, end)` window of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    /// Window bounds as UTC midnight timestamps, for comparison against
    /// event start times.
    pub fn start_at(&self) -> OffsetDateTime {
        self.start.midnight().assume_utc()
    }

    pub fn end_at(&self) -> OffsetDateTime {
        self.end.midnight().assume_utc()
    }

    /// Membership check: `start <= at < end`.
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        at >= self.start_at() && at < self.end_at()
    }
}

/// A path fragment did not form a valid calendar date. Handlers surface this
/// as a not-found response; it never propagates to the client as an error.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date path: {0}")]
pub struct InvalidDatePath(String);

/// Resolve optional year/month/day path fragments to a date window.
///
/// - all absent: `Ok(None)`, the caller lists every event.
/// - day present: the single day `[d, d + 1)`.
/// - month present, day absent: the full calendar month.
/// - year only: `[Jan 1, Jan 1 + 365 days)`. The offset is a fixed 365 days
///   and deliberately ignores leap years; this matches the long-standing
///   behavior of the timeline URLs.
pub fn resolve_window(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<Option<DateWindow>, InvalidDatePath> {
    let window = if let Some(day) = day {
        let date = calendar_date(year, month, Some(day))?;
        let end = advance(date, 1)?;
        Some(DateWindow { start: date, end })
    } else if month.is_some() {
        let first = calendar_date(year, month, None)?;
        let days = time::util::days_in_year_month(first.year(), first.month());
        let end = advance(first, i64::from(days))?;
        Some(DateWindow { start: first, end })
    } else if let Some(year) = year {
        let year = parse_fragment(year)?;
        let first = Date::from_calendar_date(year, Month::January, 1)
            .map_err(|_| InvalidDatePath(format!("{year}")))?;
        let end = advance(first, 365)?;
        Some(DateWindow { start: first, end })
    } else {
        None
    };

    Ok(window)
}

fn calendar_date(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<Date, InvalidDatePath> {
    let raw = format!(
        "{}-{}-{}",
        year.unwrap_or_default(),
        month.unwrap_or_default(),
        day.unwrap_or("1")
    );
    let year: i32 = parse_fragment(year.unwrap_or_default())?;
    let month: u8 = parse_fragment(month.unwrap_or_default())?;
    let day: u8 = parse_fragment(day.unwrap_or("1"))?;

    let month = Month::try_from(month).map_err(|_| InvalidDatePath(raw.clone()))?;
    Date::from_calendar_date(year, month, day).map_err(|_| InvalidDatePath(raw))
}

fn parse_fragment<T: std::str::FromStr>(raw: &str) -> Result<T, InvalidDatePath> {
    raw.parse()
        .map_err(|_| InvalidDatePath(raw.to_string()))
}

fn advance(date: Date, days: i64) -> Result<Date, InvalidDatePath> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| InvalidDatePath(date.to_string()))
}
