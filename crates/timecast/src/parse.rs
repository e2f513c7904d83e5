//! Parsers for written-out durations, relative words and date ranges.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;

use crate::consts::{
    MICROS_IN_ONE_SECOND, SECONDS_IN_ONE_DAY, SECONDS_IN_ONE_HOUR, SECONDS_IN_ONE_MINUTE,
};
use crate::error::{Result, TimecastError};

static PERIOD_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([+-]?(?:[0-9]+(?:\.(?:[0-9]+)?)?|\.[0-9]+))\s*([a-z]+)\s*")
        .expect("valid regex")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<year>0{0,3}[1-9][0-9]{0,3})[- /.,\\](?P<month>1[012]|0?[0-9])[- /.,\\](?P<day>3[01]|[012]?[0-9])")
        .expect("valid regex")
});

/// A unit keyword accepted by [`parse_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DeltaUnit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DeltaUnit {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "w" | "wk" | "wks" | "week" | "weeks" => Some(DeltaUnit::Weeks),
            "d" | "day" | "days" => Some(DeltaUnit::Days),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(DeltaUnit::Hours),
            "m" | "i" | "min" | "mins" | "minute" | "minutes" => Some(DeltaUnit::Minutes),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(DeltaUnit::Seconds),
            _ => None,
        }
    }

    fn seconds(self) -> i64 {
        match self {
            DeltaUnit::Weeks => 7 * SECONDS_IN_ONE_DAY,
            DeltaUnit::Days => SECONDS_IN_ONE_DAY,
            DeltaUnit::Hours => SECONDS_IN_ONE_HOUR,
            DeltaUnit::Minutes => SECONDS_IN_ONE_MINUTE,
            DeltaUnit::Seconds => 1,
        }
    }
}

// ── Durations ───────────────────────────────────────────────────────────────

/// Parse a written-out duration such as `"2 days, 7.5 hrs and 10 mins"` or
/// `"2d-7.3h10m"`.
///
/// Every number (optionally signed, optionally decimal) is paired with the
/// word that follows it. Recognised units and their aliases:
///
/// | Unit | Aliases |
/// |---|---|
/// | weeks | `w`, `wk`, `wks`, `week` |
/// | days | `d`, `day` |
/// | hours | `h`, `hr`, `hrs`, `hour` |
/// | minutes | `m`, `i`, `min`, `mins`, `minute` |
/// | seconds | `s`, `sec`, `secs`, `second` |
///
/// Matching is case-insensitive and whitespace is optional. When a unit
/// appears more than once, the last value wins. The total is rounded to the
/// nearest microsecond.
///
/// # Errors
///
/// Returns [`TimecastError::InvalidDuration`] if the text holds no
/// number-word pair, a word is not a unit, or the total is out of range.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use timecast::parse::parse_delta;
///
/// assert_eq!(parse_delta("12days").unwrap(), TimeDelta::days(12));
/// assert_eq!(parse_delta("2h34m").unwrap(), TimeDelta::minutes(2 * 60 + 34));
/// assert_eq!(parse_delta("-1.5 hours").unwrap(), TimeDelta::minutes(-90));
/// assert!(parse_delta("3 bears").is_err());
/// ```
pub fn parse_delta(text: &str) -> Result<TimeDelta> {
    let mut values: BTreeMap<DeltaUnit, f64> = BTreeMap::new();

    for caps in PERIOD_PART_RE.captures_iter(text.trim()) {
        let number = &caps[1];
        let keyword = caps[2].to_lowercase();
        let unit = DeltaUnit::from_keyword(&keyword).ok_or_else(|| {
            TimecastError::InvalidDuration(format!("unknown unit '{keyword}' in '{text}'"))
        })?;
        let value: f64 = number.parse().map_err(|_| {
            TimecastError::InvalidDuration(format!("bad number '{number}' in '{text}'"))
        })?;
        values.insert(unit, value);
    }

    if values.is_empty() {
        return Err(TimecastError::InvalidDuration(format!("no duration in '{text}'")));
    }

    let micros: f64 = values
        .iter()
        .map(|(unit, value)| value * (unit.seconds() * MICROS_IN_ONE_SECOND) as f64)
        .sum::<f64>()
        .round_ties_even();

    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(TimecastError::InvalidDuration(format!("'{text}' is out of range")));
    }
    Ok(TimeDelta::microseconds(micros as i64))
}

/// Parse a written-out duration, returning `default` if it cannot be parsed.
///
/// The usual default is [`TimeDelta::zero`].
pub fn parse_delta_or(text: &str, default: TimeDelta) -> TimeDelta {
    parse_delta(text).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "falling back to default duration");
        default
    })
}

// ── Relative words and ranges ───────────────────────────────────────────────

/// Resolve `now`, `today`, `yesterday` or `tomorrow` against `anchor`.
///
/// `now` and `today` both give the anchor itself. Anything else gives `None`.
pub fn parse_relative(text: &str, anchor: DateTime<Utc>) -> Option<NaiveDateTime> {
    let now = anchor.naive_utc();
    match text.trim().to_lowercase().as_str() {
        "now" | "today" => Some(now),
        "yesterday" => now.checked_sub_signed(TimeDelta::days(1)),
        "tomorrow" => now.checked_add_signed(TimeDelta::days(1)),
        _ => None,
    }
}

/// Find exactly two ISO dates in `text`, e.g. `"1969-08-15 to 1969-08-18"`.
///
/// The dates are returned in the order they appear; no ordering between them
/// is enforced. Returns `None` for fewer or more than two dates, or if either
/// is not a calendar date.
pub fn parse_date_range(text: &str) -> Option<(NaiveDate, NaiveDate)> {
    let dates: Vec<Option<NaiveDate>> = DATE_RE
        .captures_iter(text.trim())
        .map(|caps| {
            NaiveDate::from_ymd_opt(
                caps["year"].parse().ok()?,
                caps["month"].parse().ok()?,
                caps["day"].parse().ok()?,
            )
        })
        .collect();

    match dates.as_slice() {
        [Some(from), Some(to)] => Some((*from, *to)),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
