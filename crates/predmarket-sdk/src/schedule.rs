//! End date / end time handling for the timeline step.
//!
//! The form carries the market end as two strings, a calendar date
//! (`YYYY-MM-DD`) and a time of day (`HH:MM`), interpreted as wall-clock time
//! in the local zone.

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";
const DISPLAY_FORMAT: &str = "%b %-d, %Y at %H:%M";

pub fn parse_end_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidEndDate(format!("{s:?}: {e}")))
}

/// Accepts `HH:MM` and, as time inputs sometimes send, `HH:MM:SS`.
pub fn parse_end_time(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FORMAT_SECONDS))
        .map_err(|e| Error::InvalidEndTime(format!("{s:?}: {e}")))
}

/// Combined end instant, or `None` if either part is missing or malformed.
pub fn end_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_end_date(date).ok()?;
    let time = parse_end_time(time).ok()?;
    Some(date.and_time(time))
}

pub fn format_end(end: NaiveDateTime) -> String {
    end.format(DISPLAY_FORMAT).to_string()
}

/// Earliest date the end-date picker should offer: the day after `now`.
pub fn min_end_date(now: NaiveDateTime) -> String {
    now.date()
        .checked_add_days(Days::new(1))
        .unwrap_or(now.date())
        .format(DATE_FORMAT)
        .to_string()
}

/// Unix seconds for a local wall-clock instant. Ambiguous instants (DST fall
/// back) resolve to the earlier one.
pub fn to_unix_timestamp(end: NaiveDateTime) -> Result<i64> {
    Local
        .from_local_datetime(&end)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| Error::NonexistentLocalTime(end.to_string()))
}
