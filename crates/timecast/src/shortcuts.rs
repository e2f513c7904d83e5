//! Small calendar helpers: the next occurrence of a time or weekday,
//! midnight truncation, offsets from an anchor, and past/future checks.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday};

use crate::consts::check_range;
use crate::error::{Result, TimecastError};
use crate::resolve::{try_resolve_temporal, ResolveOptions, TemporalValue};

/// The first time `find_time` occurs strictly after `start`.
///
/// If `start` is 13:23 and `find_time` is 17:00 the result is 17:00 the same
/// day; at 19:23 it is 17:00 the next day.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the next occurrence falls after
/// year 9999.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use timecast::shortcuts::next_time;
///
/// let start = NaiveDate::from_ymd_opt(2023, 9, 2).unwrap().and_hms_opt(19, 23, 57).unwrap();
/// let happy_hour = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
///
/// assert_eq!(next_time(happy_hour, start).unwrap().to_string(), "2023-09-03 17:00:00");
/// ```
pub fn next_time(find_time: NaiveTime, start: NaiveDateTime) -> Result<NaiveDateTime> {
    let candidate = start.date().and_time(find_time);
    if candidate <= start {
        shift(candidate, TimeDelta::days(1))
    } else {
        check_range(candidate)
    }
}

/// The first time `weekday` at `find_time` (midnight if `None`) occurs
/// strictly after `start`.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if that occurrence falls after year
/// 9999.
pub fn next_weekday(
    weekday: Weekday,
    find_time: Option<NaiveTime>,
    start: NaiveDateTime,
) -> Result<NaiveDateTime> {
    let candidate = next_time(find_time.unwrap_or(NaiveTime::MIN), start)?;
    let ahead = (7 + i64::from(weekday.num_days_from_monday())
        - i64::from(candidate.weekday().num_days_from_monday()))
        % 7;
    shift(candidate, TimeDelta::days(ahead))
}

/// `anchor` (as UTC wall-clock time) moved forward by `delta`.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the result falls outside years
/// 1–9999.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use timecast::shortcuts::{ago, from_now};
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
///
/// assert_eq!(from_now(TimeDelta::weeks(1), anchor).unwrap().to_string(), "2026-02-25 12:00:00");
/// assert_eq!(ago(TimeDelta::hours(13), anchor).unwrap().to_string(), "2026-02-17 23:00:00");
/// ```
pub fn from_now(delta: TimeDelta, anchor: DateTime<Utc>) -> Result<NaiveDateTime> {
    shift(anchor.naive_utc(), delta)
}

/// `anchor` (as UTC wall-clock time) moved back by `delta`.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the result falls outside years
/// 1–9999.
pub fn ago(delta: TimeDelta, anchor: DateTime<Utc>) -> Result<NaiveDateTime> {
    shift(anchor.naive_utc(), -delta)
}

fn shift(dt: NaiveDateTime, delta: TimeDelta) -> Result<NaiveDateTime> {
    dt.checked_add_signed(delta)
        .ok_or_else(|| TimecastError::Overflow(format!("{dt} shifted by {delta} is out of range")))
        .and_then(check_range)
}

/// Truncate a date-time to midnight of the same day.
pub fn set_midnight(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Whether `value` lies before `anchor`.
///
/// # Errors
///
/// Returns [`TimecastError::Unrecognized`] if `value` cannot be resolved to a
/// date-time.
pub fn is_past(value: impl Into<TemporalValue>, anchor: DateTime<Utc>) -> Result<bool> {
    Ok(resolve_for_check(value.into(), anchor)? < anchor.naive_utc())
}

/// Whether `value` lies after `anchor`.
///
/// # Errors
///
/// Returns [`TimecastError::Unrecognized`] if `value` cannot be resolved to a
/// date-time.
pub fn is_future(value: impl Into<TemporalValue>, anchor: DateTime<Utc>) -> Result<bool> {
    Ok(resolve_for_check(value.into(), anchor)? > anchor.naive_utc())
}

fn resolve_for_check(value: TemporalValue, anchor: DateTime<Utc>) -> Result<NaiveDateTime> {
    try_resolve_temporal(&value, anchor, &ResolveOptions::default())
        .map_err(|e| TimecastError::Unrecognized(format!("{value:?} is not a date-time ({e})")))
}
