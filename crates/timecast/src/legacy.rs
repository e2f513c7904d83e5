//! Entry points kept for callers of the older date-time API.
//!
//! New code should use [`crate::resolve`], [`crate::split`] and
//! [`crate::convert`] directly. Where the older name is just another name for
//! a current function it is re-exported under that name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday};
use serde_json::{Map, Value};

use crate::error::{Result, TimecastError};
use crate::format::{
    delta_to_str, human_readable_delta_with_options, Elapsed, FormatOptions, HumanizeOptions,
};
use crate::resolve::{resolve_temporal_with_options, ResolveOptions, TemporalValue};
use crate::shortcuts::{self, next_time, next_weekday};
use crate::split::{split_duration, DurationUnit, SplitOptions};

pub use crate::convert::{datetime_to_filetime, filetime_to_datetime};
pub use crate::format::{serialize, to_str};
pub use crate::parse::{
    parse_date_range as str_to_2dates, parse_delta as str_to_timedelta,
    parse_relative as str_to_relative_datetime,
};
pub use crate::pattern::{isostr_to_datetime, regex_to_datetime};
pub use crate::shortcuts::{ago as dt_ago, from_now as dt_from_now, set_midnight as dt_midnight};

/// Resolve a value the way the older API did: numbers above
/// 29,999,999,999 are filetimes, and ISO text is tried before day-first and
/// month-first text.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timecast::legacy::any_to_datetime;
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
/// let dt = any_to_datetime("10.12.2013", anchor).unwrap();
/// assert_eq!(dt.to_string(), "0010-12-20 00:00:00");
/// ```
pub fn any_to_datetime(
    value: impl Into<TemporalValue>,
    anchor: DateTime<Utc>,
) -> std::result::Result<NaiveDateTime, TemporalValue> {
    resolve_temporal_with_options(value, anchor, &ResolveOptions::legacy())
}

/// Split a duration into a JSON object.
///
/// The object always has `1st` and `2nd` (the two largest non-zero units, or
/// `null`), `is_past`, `days`, `hours`, `minutes` and `seconds`. `years`,
/// `months` and `weeks` appear only when non-zero.
pub fn split_delta(delta: TimeDelta, options: &SplitOptions) -> Map<String, Value> {
    let split = split_duration(delta, options);
    let unit_name = |unit: Option<DurationUnit>| unit.map_or(Value::Null, |u| u.name().into());

    let mut parts = Map::new();
    parts.insert("1st".to_string(), unit_name(split.largest()));
    parts.insert("2nd".to_string(), unit_name(split.second_largest()));
    parts.insert("is_past".to_string(), split.is_past.into());
    for unit in [DurationUnit::Years, DurationUnit::Months, DurationUnit::Weeks] {
        let value = split.value(unit);
        if value != 0 {
            parts.insert(unit.name().to_string(), value.into());
        }
    }
    for unit in [
        DurationUnit::Days,
        DurationUnit::Hours,
        DurationUnit::Minutes,
        DurationUnit::Seconds,
    ] {
        parts.insert(unit.name().to_string(), split.value(unit).into());
    }
    parts
}

/// Whole seconds since the Unix epoch, rounded down.
pub fn datetime_to_timestamp(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

/// A duration as undirected text: `"5 years"`, `"a few seconds"`.
pub fn deltastr(delta: TimeDelta) -> String {
    delta_to_str(delta)
}

/// How far `value` is from `anchor`, as undirected text.
///
/// Unlike [`crate::format::human_readable_delta`] there is no `"in …"` or
/// `"… ago"`, so the sign of the difference is lost. An unresolvable value
/// gives an empty string.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use timecast::legacy::ago;
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
/// let last_week = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
/// assert_eq!(ago(last_week, anchor), "1 week");
/// ```
pub fn ago(value: impl Into<Elapsed>, anchor: DateTime<Utc>) -> String {
    let options = HumanizeOptions {
        format: FormatOptions::undirected(),
        ..HumanizeOptions::default()
    };
    human_readable_delta_with_options(value, anchor, &options)
}

/// [`next_time`] with the arguments the other way round.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] past year 9999.
pub fn find_earliest_time_after_datetime(
    dt: NaiveDateTime,
    time: NaiveTime,
) -> Result<NaiveDateTime> {
    next_time(time, dt)
}

/// [`next_weekday`] with the start first and a required time of day.
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] past year 9999.
pub fn find_earliest_time_and_weekday_after_datetime(
    dt: NaiveDateTime,
    time_of_day: NaiveTime,
    weekday: Weekday,
) -> Result<NaiveDateTime> {
    next_weekday(weekday, Some(time_of_day), dt)
}

/// The date `days` and `weeks` after `anchor` (in UTC).
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the date falls outside
/// years 1–9999.
pub fn date_from_now(days: i64, weeks: i64, anchor: DateTime<Utc>) -> Result<NaiveDate> {
    shortcuts::from_now(days_and_weeks(days, weeks)?, anchor).map(|dt| dt.date())
}

/// The date `days` and `weeks` before `anchor` (in UTC).
///
/// # Errors
///
/// Returns [`TimecastError::Overflow`] if the date falls outside
/// years 1–9999.
pub fn date_ago(days: i64, weeks: i64, anchor: DateTime<Utc>) -> Result<NaiveDate> {
    shortcuts::ago(days_and_weeks(days, weeks)?, anchor).map(|dt| dt.date())
}

fn days_and_weeks(days: i64, weeks: i64) -> Result<TimeDelta> {
    weeks
        .checked_mul(7)
        .and_then(|w| w.checked_add(days))
        .and_then(TimeDelta::try_days)
        .ok_or_else(|| TimecastError::Overflow(format!("{weeks} weeks and {days} days")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_legacy_any_to_datetime() {
        let dt = any_to_datetime(100_000_000_000_i64, anchor()).unwrap();
        assert_eq!(dt.to_string(), "1601-01-01 02:46:40");

        let dt = any_to_datetime("2013-06-10T12:13:14", anchor()).unwrap();
        assert_eq!(dt.to_string(), "2013-06-10 12:13:14");

        assert!(any_to_datetime("gobbledygook", anchor()).is_err());
    }

    #[test]
    fn test_legacy_split_delta() {
        let parts = split_delta(
            TimeDelta::days(2002) + TimeDelta::seconds(20_000),
            &SplitOptions::default(),
        );
        assert_eq!(
            Value::Object(parts),
            json!({
                "1st": "years",
                "2nd": "months",
                "is_past": false,
                "years": 5,
                "months": 5,
                "weeks": 3,
                "days": 2,
                "hours": 5,
                "minutes": 33,
                "seconds": 20,
            })
        );
    }

    #[test]
    fn test_legacy_split_delta_omits_zero_large_units() {
        let parts = split_delta(TimeDelta::seconds(-90), &SplitOptions::default());
        assert_eq!(
            Value::Object(parts),
            json!({
                "1st": "minutes",
                "2nd": "seconds",
                "is_past": true,
                "days": 0,
                "hours": 0,
                "minutes": 1,
                "seconds": 30,
            })
        );

        let parts = split_delta(TimeDelta::zero(), &SplitOptions::default());
        assert_eq!(parts["1st"], Value::Null);
        assert_eq!(parts["2nd"], Value::Null);
    }

    // ── Older names ─────────────────────────────────────────────────────

    #[test]
    fn test_legacy_deltastr() {
        assert_eq!(
            deltastr(TimeDelta::days(366) + TimeDelta::seconds(20_000)),
            "1 year and 5 hours"
        );
        assert_eq!(deltastr(TimeDelta::seconds(-90)), "1 minute");
        assert_eq!(deltastr(TimeDelta::seconds(59)), "a few seconds");
    }

    #[test]
    fn test_legacy_ago_is_undirected() {
        let yesterday = NaiveDate::from_ymd_opt(2026, 2, 17).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        assert_eq!(ago(yesterday, anchor()), "1 day");
        assert_eq!(ago(tomorrow, anchor()), "1 day");
        assert_eq!(ago(TimeDelta::hours(-5), anchor()), "5 hours");
        assert_eq!(ago("gobbledygook", anchor()), "");
    }

    #[test]
    fn test_legacy_find_earliest_time() {
        // 2015-05-29 is a Friday
        let start = NaiveDate::from_ymd_opt(2015, 5, 29)
            .unwrap()
            .and_hms_opt(19, 23, 57)
            .unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(
            find_earliest_time_after_datetime(start, five).unwrap().to_string(),
            "2015-05-30 17:00:00"
        );
        assert_eq!(
            find_earliest_time_and_weekday_after_datetime(start, five, Weekday::Mon)
                .unwrap()
                .to_string(),
            "2015-06-01 17:00:00"
        );
        assert_eq!(
            find_earliest_time_and_weekday_after_datetime(start, five, Weekday::Fri)
                .unwrap()
                .to_string(),
            "2015-06-05 17:00:00"
        );
    }

    #[test]
    fn test_legacy_date_from_now_and_ago() {
        assert_eq!(
            date_from_now(3, 1, anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            date_ago(18, 0, anchor()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );
        assert_eq!(date_ago(0, 0, anchor()).unwrap(), anchor().date_naive());
        assert!(date_from_now(0, 500_000, anchor()).is_err());
        assert!(date_ago(i64::MAX, i64::MAX, anchor()).is_err());
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(str_to_timedelta("2h").unwrap(), TimeDelta::hours(2));
        assert_eq!(to_str(TimeDelta::seconds(90)), "90.0");
        let dt = dt_from_now(TimeDelta::days(1), anchor()).unwrap();
        assert_eq!(dt_midnight(dt).to_string(), "2026-02-19 00:00:00");
        let dt = dt_ago(TimeDelta::days(1), anchor()).unwrap();
        assert_eq!(dt.to_string(), "2026-02-17 12:00:00");
        assert_eq!(datetime_to_filetime(filetime_to_datetime(0).unwrap()), Ok(0));
    }

    #[test]
    fn test_legacy_datetime_to_timestamp() {
        let dt = NaiveDate::from_ymd_opt(1979, 7, 6)
            .unwrap()
            .and_hms_micro_opt(14, 3, 24, 999_999)
            .unwrap();
        assert_eq!(datetime_to_timestamp(dt), 300_117_804);

        let dt = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 500_000)
            .unwrap();
        assert_eq!(datetime_to_timestamp(dt), -1);
    }
}
