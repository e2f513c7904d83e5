//! Exact conversions between canonical date-times and numeric epoch conventions.
//!
//! Three numeric conventions are supported:
//!
//! - **Filetime**: 100-nanosecond ticks since 1601-01-01T00:00:00 (Windows `FILETIME`)
//! - **Timestamp**: possibly fractional seconds since the Unix epoch
//! - **Instant**: whole milliseconds since the Unix epoch
//!
//! All conversions are time-zone naive: the numeric value is read as UTC and
//! the resulting [`NaiveDateTime`] carries no offset. Results are validated
//! against the canonical range (years 1–9999); filetime conversions always
//! report [`TimecastError::Overflow`], timestamp and instant conversions may
//! clamp instead when the caller asks for it.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::consts::{check_range, max_datetime, min_datetime, MICROS_IN_ONE_SECOND};
use crate::error::{Result, TimecastError};

/// Seconds between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

const TICKS_PER_MICRO: i64 = 10;

// ── Filetime ────────────────────────────────────────────────────────────────

/// Convert a Windows filetime tick count to a date-time.
///
/// The tick count is divided by ten to get microseconds, rounding half to
/// even.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the result falls outside years
/// 1–9999. Filetime conversion never clamps.
///
/// # Examples
///
/// ```
/// use timecast::convert::filetime_to_datetime;
///
/// let dt = filetime_to_datetime(119_445_914_047_564_820).unwrap();
/// assert_eq!(dt.to_string(), "1979-07-06 14:03:24.756482");
/// ```
pub fn filetime_to_datetime(ticks: i64) -> Result<NaiveDateTime> {
    let unix_micros = ticks_to_micros(ticks)
        .checked_sub(FILETIME_UNIX_OFFSET_SECS * MICROS_IN_ONE_SECOND)
        .ok_or_else(|| filetime_overflow(ticks))?;

    DateTime::from_timestamp_micros(unix_micros)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| filetime_overflow(ticks))
        .and_then(check_range)
        .map_err(|_| filetime_overflow(ticks))
}

/// Convert a date-time to a Windows filetime tick count.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if `dt` lies outside years 1–9999.
pub fn datetime_to_filetime(dt: NaiveDateTime) -> Result<i64> {
    let dt = check_range(dt)?;
    dt.and_utc()
        .timestamp_micros()
        .checked_add(FILETIME_UNIX_OFFSET_SECS * MICROS_IN_ONE_SECOND)
        .and_then(|micros| micros.checked_mul(TICKS_PER_MICRO))
        .ok_or_else(|| TimecastError::Overflow(format!("{dt} has no filetime")))
}

/// Convert a date (at midnight) to a Windows filetime tick count.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if `date` lies outside years 1–9999.
pub fn date_to_filetime(date: NaiveDate) -> Result<i64> {
    datetime_to_filetime(date_to_datetime(date))
}

fn ticks_to_micros(ticks: i64) -> i64 {
    let whole = ticks.div_euclid(TICKS_PER_MICRO);
    let rem = ticks.rem_euclid(TICKS_PER_MICRO);
    if rem > 5 || (rem == 5 && whole % 2 != 0) {
        whole + 1
    } else {
        whole
    }
}

fn filetime_overflow(ticks: i64) -> TimecastError {
    TimecastError::Overflow(format!("filetime {ticks} is outside years 1-9999"))
}

// ── Timestamp ───────────────────────────────────────────────────────────────

/// Convert seconds since the Unix epoch to a date-time.
///
/// Fractional seconds are rounded to the nearest microsecond (ties to even).
///
/// # Arguments
///
/// * `seconds`: Seconds since 1970-01-01T00:00:00 UTC
/// * `clamp_on_overflow`: Return the smallest or largest canonical date-time
///   (depending on the sign of `seconds`) instead of failing
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the result falls outside years
/// 1–9999 (or `seconds` is not finite) and `clamp_on_overflow` is `false`.
pub fn timestamp_to_datetime(seconds: f64, clamp_on_overflow: bool) -> Result<NaiveDateTime> {
    let micros = (seconds * MICROS_IN_ONE_SECOND as f64).round_ties_even();
    let converted = if micros.is_finite() && micros.abs() < i64::MAX as f64 {
        DateTime::from_timestamp_micros(micros as i64).map(|dt| dt.naive_utc())
    } else {
        None
    };

    match converted.map(check_range) {
        Some(Ok(dt)) => Ok(dt),
        _ if clamp_on_overflow => Ok(clamp(seconds > 0.0)),
        Some(Err(e)) => Err(e),
        None => Err(TimecastError::Overflow(format!(
            "timestamp {seconds} is outside years 1-9999"
        ))),
    }
}

/// Convert a date-time to (fractional) seconds since the Unix epoch.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use timecast::convert::datetime_to_timestamp;
///
/// let dt = NaiveDate::from_ymd_opt(1979, 7, 6)
///     .unwrap()
///     .and_hms_opt(14, 3, 24)
///     .unwrap();
/// assert_eq!(datetime_to_timestamp(dt), 300_117_804.0);
/// ```
pub fn datetime_to_timestamp(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_micros()) / MICROS_IN_ONE_SECOND as f64
}

// ── Instant ─────────────────────────────────────────────────────────────────

/// Convert milliseconds since the Unix epoch to a date-time.
///
/// Same overflow policy as [`timestamp_to_datetime`].
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the result falls outside years
/// 1–9999 and `clamp_on_overflow` is `false`.
pub fn instant_to_datetime(millis: i64, clamp_on_overflow: bool) -> Result<NaiveDateTime> {
    match DateTime::from_timestamp_millis(millis).map(|dt| check_range(dt.naive_utc())) {
        Some(Ok(dt)) => Ok(dt),
        _ if clamp_on_overflow => Ok(clamp(millis > 0)),
        Some(Err(e)) => Err(e),
        None => Err(TimecastError::Overflow(format!(
            "instant {millis} is outside years 1-9999"
        ))),
    }
}

/// Convert a date-time to whole milliseconds since the Unix epoch.
///
/// Sub-millisecond precision is truncated toward zero, so
/// `1969-12-31T23:59:59.9995` is `0`, not `-1`.
pub fn datetime_to_instant(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_micros() / 1_000
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Combine a date with midnight.
pub fn date_to_datetime(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Shift a UTC wall-clock date-time into the local zone of the running system.
pub fn utc_to_local(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    check_range(Local.from_utc_datetime(&dt).naive_local())
}

fn clamp(positive: bool) -> NaiveDateTime {
    if positive {
        max_datetime()
    } else {
        min_datetime()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
