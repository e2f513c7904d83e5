//! Best-effort resolution of ambiguous temporal values.
//!
//! [`resolve_temporal`] takes a value of unknown shape (a date-time, a date, a
//! number, raw bytes or text) and works out which representation it most
//! likely is. Like the rest of the crate it never reads the system clock: the
//! caller passes the "now" anchor, which is used for the ±1000 year numeric
//! window and as "today" for texts that carry only a time.
//!
//! # Dispatch
//!
//! 1. A date-time is returned unchanged if it lies within years 1–9999
//! 2. A date is combined with midnight, under the same range check
//! 3. A number goes through [`classify_numeric`]
//! 4. Bytes are decoded (see [`crate::decode`]) and handled as text
//! 5. Text is tried as an integer, then a float, then against the text
//!    patterns in [`TextPatternOrder`]
//!
//! Anything that fails along the way falls back to a default: the input
//! itself for [`resolve_temporal`], a caller-supplied date-time for
//! [`resolve_temporal_or`].

use chrono::{DateTime, Local, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::check_range;
use crate::convert::{
    date_to_datetime, filetime_to_datetime, instant_to_datetime, timestamp_to_datetime,
    utc_to_local,
};
use crate::decode::decode_bytes;
use crate::error::{Result, TimecastError};
use crate::pattern::{build_datetime, match_fields, TextPattern};

/// Numbers above this are filetimes under [`NumericStrategy::FiletimeThreshold`].
pub const FILETIME_THRESHOLD: i64 = 29_999_999_999;

/// Half-width, in calendar years, of the window around "now" used by
/// [`NumericStrategy::MillenniumWindow`].
pub const WINDOW_YEARS: u32 = 1000;

// ── Input and options ───────────────────────────────────────────────────────

/// A value that may hold a date and/or time in some shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalValue {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Integer(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(value: NaiveDateTime) -> Self {
        TemporalValue::DateTime(value)
    }
}

impl From<NaiveDate> for TemporalValue {
    fn from(value: NaiveDate) -> Self {
        TemporalValue::Date(value)
    }
}

impl From<i64> for TemporalValue {
    fn from(value: i64) -> Self {
        TemporalValue::Integer(value)
    }
}

impl From<i32> for TemporalValue {
    fn from(value: i32) -> Self {
        TemporalValue::Integer(value.into())
    }
}

impl From<u32> for TemporalValue {
    fn from(value: u32) -> Self {
        TemporalValue::Integer(value.into())
    }
}

impl From<f64> for TemporalValue {
    fn from(value: f64) -> Self {
        TemporalValue::Float(value)
    }
}

impl From<Vec<u8>> for TemporalValue {
    fn from(value: Vec<u8>) -> Self {
        TemporalValue::Bytes(value)
    }
}

impl From<&[u8]> for TemporalValue {
    fn from(value: &[u8]) -> Self {
        TemporalValue::Bytes(value.to_vec())
    }
}

impl From<String> for TemporalValue {
    fn from(value: String) -> Self {
        TemporalValue::Text(value)
    }
}

impl From<&str> for TemporalValue {
    fn from(value: &str) -> Self {
        TemporalValue::Text(value.to_string())
    }
}

/// The numeric convention a bare number was judged to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    /// Seconds since the Unix epoch.
    Timestamp,
    /// Milliseconds since the Unix epoch.
    Instant,
    /// 100-nanosecond ticks since 1601-01-01.
    Filetime,
}

/// How a bare number is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericStrategy {
    /// A timestamp if it lands within ±1000 years of the anchor, else an
    /// instant if that lands within the window, else a filetime.
    ///
    /// Timestamps further than 1000 years from now come out as instants or
    /// filetimes, instants within roughly two years of 1970 come out as
    /// timestamps, and filetimes from 1600–1601 may come out as either.
    #[default]
    MillenniumWindow,
    /// A filetime above [`FILETIME_THRESHOLD`], otherwise a timestamp.
    FiletimeThreshold,
}

/// The order in which the text patterns are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPatternOrder {
    /// Day-month-year, then month-day-year, then ISO.
    #[default]
    DayFirst,
    /// ISO first, then day-month-year, then month-day-year.
    IsoFirst,
}

impl TextPatternOrder {
    pub fn patterns(self) -> [TextPattern; 3] {
        match self {
            TextPatternOrder::DayFirst => [
                TextPattern::DayMonthYear,
                TextPattern::MonthDayYear,
                TextPattern::Iso,
            ],
            TextPatternOrder::IsoFirst => [
                TextPattern::Iso,
                TextPattern::DayMonthYear,
                TextPattern::MonthDayYear,
            ],
        }
    }
}

/// Options for [`resolve_temporal_with_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Read timestamps and instants as UTC. When `false` they are shifted into
    /// the local zone, and "today" is the local date of the anchor.
    pub utc: bool,
    pub numeric: NumericStrategy,
    pub text_order: TextPatternOrder,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            utc: true,
            numeric: NumericStrategy::default(),
            text_order: TextPatternOrder::default(),
        }
    }
}

impl ResolveOptions {
    /// The behaviour of the older resolver: fixed filetime threshold, ISO
    /// pattern first.
    pub fn legacy() -> Self {
        Self {
            utc: true,
            numeric: NumericStrategy::FiletimeThreshold,
            text_order: TextPatternOrder::IsoFirst,
        }
    }
}

// ── resolve_temporal ────────────────────────────────────────────────────────

/// Resolve a value to a date-time, handing the value back unchanged on failure.
///
/// Uses [`ResolveOptions::default`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timecast::resolve::{resolve_temporal, TemporalValue};
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
///
/// let dt = resolve_temporal(119_445_914_047_564_820_i64, anchor).unwrap();
/// assert_eq!(dt.to_string(), "1979-07-06 14:03:24.756482");
///
/// let rejected = resolve_temporal("gobbledygook", anchor).unwrap_err();
/// assert_eq!(rejected, TemporalValue::Text("gobbledygook".to_string()));
/// ```
pub fn resolve_temporal(
    value: impl Into<TemporalValue>,
    anchor: DateTime<Utc>,
) -> std::result::Result<NaiveDateTime, TemporalValue> {
    resolve_temporal_with_options(value, anchor, &ResolveOptions::default())
}

/// Resolve a value to a date-time with options, handing the value back
/// unchanged on failure.
pub fn resolve_temporal_with_options(
    value: impl Into<TemporalValue>,
    anchor: DateTime<Utc>,
    options: &ResolveOptions,
) -> std::result::Result<NaiveDateTime, TemporalValue> {
    let value = value.into();
    match try_resolve_temporal(&value, anchor, options) {
        Ok(dt) => Ok(dt),
        Err(e) => {
            tracing::debug!(error = %e, "passing temporal value through unresolved");
            Err(value)
        }
    }
}

/// Resolve a value to a date-time, returning `default` on failure.
pub fn resolve_temporal_or(
    value: impl Into<TemporalValue>,
    default: NaiveDateTime,
    anchor: DateTime<Utc>,
) -> NaiveDateTime {
    resolve_temporal(value, anchor).unwrap_or(default)
}

/// Resolve a value to a date-time, reporting why it failed.
///
/// # Errors
///
/// - [`TimecastError::Decode`] if bytes could not be decoded
/// - [`TimecastError::Overflow`] if a number converts, or a date-time or date
///   lies, outside years 1–9999
/// - [`TimecastError::InvalidDatetime`] if a pattern matched impossible fields
/// - [`TimecastError::Unrecognized`] if no interpretation applies
pub fn try_resolve_temporal(
    value: &TemporalValue,
    anchor: DateTime<Utc>,
    options: &ResolveOptions,
) -> Result<NaiveDateTime> {
    match value {
        TemporalValue::DateTime(dt) => check_range(*dt),
        TemporalValue::Date(date) => check_range(date_to_datetime(*date)),
        TemporalValue::Integer(n) => resolve_number(Number::Integer(*n), anchor, options),
        TemporalValue::Float(n) => resolve_number(Number::Float(*n), anchor, options),
        TemporalValue::Bytes(bytes) => {
            let text = decode_bytes(bytes)?;
            resolve_text(&text, anchor, options)
        }
        TemporalValue::Text(text) => resolve_text(text, anchor, options),
    }
}

// ── Numbers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Float(n) => n,
        }
    }
}

/// Decide which numeric convention `n` is most likely in.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timecast::resolve::{classify_numeric, NumericKind, NumericStrategy};
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
/// let window = NumericStrategy::MillenniumWindow;
///
/// assert_eq!(classify_numeric(1.7e9, anchor, window), NumericKind::Timestamp);
/// assert_eq!(classify_numeric(1.7e12, anchor, window), NumericKind::Instant);
/// assert_eq!(classify_numeric(1.2e17, anchor, window), NumericKind::Filetime);
/// ```
pub fn classify_numeric(n: f64, anchor: DateTime<Utc>, strategy: NumericStrategy) -> NumericKind {
    match strategy {
        NumericStrategy::MillenniumWindow => {
            let (lo, hi) = millennium_window(anchor);
            if lo < n && n < hi {
                NumericKind::Timestamp
            } else if lo * 1000.0 < n && n < hi * 1000.0 {
                NumericKind::Instant
            } else {
                NumericKind::Filetime
            }
        }
        NumericStrategy::FiletimeThreshold => {
            if n > FILETIME_THRESHOLD as f64 {
                NumericKind::Filetime
            } else {
                NumericKind::Timestamp
            }
        }
    }
}

/// Timestamps (in seconds) 1000 calendar years before and after `anchor`.
fn millennium_window(anchor: DateTime<Utc>) -> (f64, f64) {
    let span = Months::new(12 * WINDOW_YEARS);
    let seconds = |dt: DateTime<Utc>| dt.timestamp_micros() as f64 / 1e6;
    let lo = anchor
        .checked_sub_months(span)
        .map_or(f64::NEG_INFINITY, seconds);
    let hi = anchor
        .checked_add_months(span)
        .map_or(f64::INFINITY, seconds);
    (lo, hi)
}

fn resolve_number(n: Number, anchor: DateTime<Utc>, options: &ResolveOptions) -> Result<NaiveDateTime> {
    let kind = classify_numeric(n.as_f64(), anchor, options.numeric);
    tracing::debug!(?kind, number = n.as_f64(), "classified numeric value");

    let dt = match (kind, n) {
        (NumericKind::Timestamp, n) => timestamp_to_datetime(n.as_f64(), false)?,
        (NumericKind::Instant, Number::Integer(millis)) => instant_to_datetime(millis, false)?,
        (NumericKind::Instant, Number::Float(millis)) => timestamp_to_datetime(millis / 1000.0, false)?,
        (NumericKind::Filetime, Number::Integer(ticks)) => return filetime_to_datetime(ticks),
        (NumericKind::Filetime, Number::Float(ticks)) => {
            return filetime_to_datetime(float_ticks(ticks)?);
        }
    };

    if options.utc {
        Ok(dt)
    } else {
        utc_to_local(dt)
    }
}

fn float_ticks(ticks: f64) -> Result<i64> {
    let rounded = ticks.round_ties_even();
    if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(TimecastError::Overflow(format!(
            "filetime {ticks} is outside years 1-9999"
        )))
    }
}

// ── Text ────────────────────────────────────────────────────────────────────

fn resolve_text(text: &str, anchor: DateTime<Utc>, options: &ResolveOptions) -> Result<NaiveDateTime> {
    let text = text.trim();

    if let Ok(n) = text.parse::<i64>() {
        return resolve_number(Number::Integer(n), anchor, options);
    }
    if let Ok(n) = text.parse::<f64>() {
        return resolve_number(Number::Float(n), anchor, options);
    }

    let today = if options.utc {
        anchor.date_naive()
    } else {
        anchor.with_timezone(&Local).date_naive()
    };

    for pattern in options.text_order.patterns() {
        let Some(fields) = match_fields(text, pattern) else {
            continue;
        };
        if let Some(dt) = build_datetime(&fields, today)? {
            tracing::debug!(?pattern, "text matched");
            return Ok(dt);
        }
    }

    Err(TimecastError::Unrecognized(format!("'{text}'")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
