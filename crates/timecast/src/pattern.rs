//! Fixed-field text patterns for date-times.
//!
//! Resolution happens in two stages so each can be tested on its own:
//!
//! 1. [`match_fields`] runs a pattern and produces a [`DateTimeFields`] record
//!    in which every component is optional.
//! 2. [`build_datetime`] fills in the blanks (today's date, midnight) and
//!    constructs the canonical date-time.
//!
//! The patterns are forgiving:
//!
//! - Date parts may be separated by `-`, `/`, `\`, `.`, `,` or a space
//! - Time parts may be separated by `:`, `.`, `,` or a space
//! - Date and time halves may be separated by `T`, `t`, `@`, a space, or nothing
//! - Numbers do not have to be zero-padded (`"2013-1-2T3:4:5"` is fine)
//! - Only a prefix of the text has to match; trailing text is ignored
//!
//! The fractional group takes up to six digits and uses them verbatim as a
//! microsecond count, so `"…:59,999999"` is 999999 µs and `"…:59.5"` is 5 µs.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimecastError};

const TIME_SUFFIX: &str = r"(?:[ @Tt]?(?:(?P<hour>2[0-3]|[01]?[0-9])[ .:,](?P<minute>[0-5]?[0-9]))?(?:[ .:,](?P<second>[0-5]?[0-9])(?:[ .:,](?P<fraction>[0-9]{0,6}))?)?)?";

static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<day>3[01]|[012]?[0-9])[- /.,\\](?P<month>1[012]|0?[0-9])[- /.,\\](?P<year>[12][0189][0-9]{{2}}){TIME_SUFFIX}"
    ))
    .expect("valid regex")
});

static MONTH_DAY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<month>1[012]|0?[0-9])[- /.,\\](?P<day>3[01]|[012]?[0-9])[- /.,\\](?P<year>[12][0189][0-9]{{2}}){TIME_SUFFIX}"
    ))
    .expect("valid regex")
});

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?P<year>0{{0,3}}[1-9][0-9]{{0,3}})[- /.,\\](?P<month>1[012]|0?[0-9])[- /.,\\](?P<day>3[01]|[012]?[0-9]))?{TIME_SUFFIX}"
    ))
    .expect("valid regex")
});

/// One of the built-in text patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPattern {
    /// `31.12.1999 23:59:59`, day first. The year must start with 10, 11, 18, 19,
    /// 20, 21, 28 or 29.
    DayMonthYear,
    /// `12/31/1999 23:59:59`, month first. Same years as [`TextPattern::DayMonthYear`].
    MonthDayYear,
    /// `1999-12-31T23:59:59`, year first. Years 1-9999; the date half is optional.
    Iso,
}

impl TextPattern {
    pub fn regex(self) -> &'static Regex {
        match self {
            TextPattern::DayMonthYear => &DAY_MONTH_YEAR_RE,
            TextPattern::MonthDayYear => &MONTH_DAY_YEAR_RE,
            TextPattern::Iso => &ISO_RE,
        }
    }
}

/// Date-time components found by a pattern. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateTimeFields {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub microsecond: Option<u32>,
}

impl DateTimeFields {
    /// Year, month and day are all present.
    pub fn has_date(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some()
    }

    /// Hour and minute are both present.
    pub fn has_time(&self) -> bool {
        self.hour.is_some() && self.minute.is_some()
    }

    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            year: capture(caps, "year"),
            month: capture(caps, "month"),
            day: capture(caps, "day"),
            hour: capture(caps, "hour"),
            minute: capture(caps, "minute"),
            second: capture(caps, "second"),
            microsecond: capture(caps, "fraction"),
        }
    }
}

fn capture<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Run a built-in pattern against `text`.
///
/// Returns `None` when the pattern does not match the start of the (trimmed)
/// text or matches without finding a single component.
pub fn match_fields(text: &str, pattern: TextPattern) -> Option<DateTimeFields> {
    match_regex(text, pattern.regex())
}

fn match_regex(text: &str, regex: &Regex) -> Option<DateTimeFields> {
    let caps = regex.captures(text.trim())?;
    if caps.get(0).map_or(true, |m| m.start() != 0) {
        return None;
    }
    let fields = DateTimeFields::from_captures(&caps);
    (fields != DateTimeFields::default()).then_some(fields)
}

/// Build a date-time from matched fields.
///
/// The date half comes from year/month/day when all three are present,
/// otherwise it is `today`. The time half comes from hour/minute (seconds and
/// microseconds default to zero) when both are present, otherwise midnight.
/// Returns `Ok(None)` when neither half was found.
///
/// # Errors
///
/// Returns [`TimecastError::InvalidDatetime`] if the date fields do not form a
/// calendar date (e.g. February 30th) or the time fields are out of range.
pub fn build_datetime(fields: &DateTimeFields, today: NaiveDate) -> Result<Option<NaiveDateTime>> {
    let date = match (fields.year, fields.month, fields.day) {
        (Some(y), Some(m), Some(d)) => Some(NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
            TimecastError::InvalidDatetime(format!("{y:04}-{m:02}-{d:02} is not a calendar date"))
        })?),
        _ => None,
    };

    let time = match (fields.hour, fields.minute) {
        (Some(h), Some(mi)) => {
            let s = fields.second.unwrap_or(0);
            let us = fields.microsecond.unwrap_or(0);
            Some(NaiveTime::from_hms_micro_opt(h, mi, s, us).ok_or_else(|| {
                TimecastError::InvalidDatetime(format!("{h:02}:{mi:02}:{s:02}.{us:06} is not a time"))
            })?)
        }
        _ => None,
    };

    if date.is_none() && time.is_none() {
        return Ok(None);
    }
    Ok(Some(
        date.unwrap_or(today).and_time(time.unwrap_or(NaiveTime::MIN)),
    ))
}

/// Parse `text` with a caller-supplied regex.
///
/// The regex uses the named groups `year`, `month`, `day`, `hour`, `minute`,
/// `second` and `fraction`; any of them may be absent. Like the built-in
/// patterns, it must match at the start of the trimmed text.
///
/// # Errors
///
/// Returns [`TimecastError::InvalidDatetime`] if the matched fields are out of
/// range (see [`build_datetime`]).
pub fn regex_to_datetime(text: &str, regex: &Regex, today: NaiveDate) -> Result<Option<NaiveDateTime>> {
    match match_regex(text, regex) {
        Some(fields) => build_datetime(&fields, today),
        None => Ok(None),
    }
}

/// Parse an ISO(-ish) `year-month-day[Thour:minute[:second[.fraction]]]` text.
///
/// # Errors
///
/// Returns [`TimecastError::InvalidDatetime`] if the matched fields are out of
/// range (see [`build_datetime`]).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use timecast::pattern::isostr_to_datetime;
///
/// let today = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
/// let dt = isostr_to_datetime("2013-1-2T3:4:5", today).unwrap().unwrap();
/// assert_eq!(dt.to_string(), "2013-01-02 03:04:05");
/// ```
pub fn isostr_to_datetime(text: &str, today: NaiveDate) -> Result<Option<NaiveDateTime>> {
    regex_to_datetime(text, TextPattern::Iso.regex(), today)
}

// ── Tests ───────────────────────────────────────────────────────────────────
