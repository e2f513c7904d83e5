//! Approximate decomposition of a duration into calendar units.
//!
//! A duration has no calendar anchor, so years and months are measured with
//! their mean lengths ([`DAYS_IN_MEAN_YEAR`], [`DAYS_IN_MEAN_MONTH`]). The
//! split is greedy: each unit takes as many whole multiples as fit and hands
//! the remainder down to the next smaller unit. Sub-second precision is
//! dropped.

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DAYS_IN_MEAN_MONTH, DAYS_IN_MEAN_YEAR, DAYS_IN_WEEK, MICROS_IN_ONE_SECOND,
    SECONDS_IN_ONE_DAY, SECONDS_IN_ONE_HOUR, SECONDS_IN_ONE_MINUTE,
};
use crate::format::{format_duration, FormatOptions};

/// A unit of a [`DurationSplit`], ordered largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 7] = [
        DurationUnit::Years,
        DurationUnit::Months,
        DurationUnit::Weeks,
        DurationUnit::Days,
        DurationUnit::Hours,
        DurationUnit::Minutes,
        DurationUnit::Seconds,
    ];

    /// Plural name, e.g. `"weeks"`.
    pub fn name(self) -> &'static str {
        match self {
            DurationUnit::Years => "years",
            DurationUnit::Months => "months",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Days => "days",
            DurationUnit::Hours => "hours",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Seconds => "seconds",
        }
    }

    /// Singular name, e.g. `"week"`.
    pub fn singular(self) -> &'static str {
        let name = self.name();
        &name[..name.len() - 1]
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the optional large units take part in a split.
///
/// A disabled unit passes its share down to the next enabled one, so with
/// `include_weeks: false` a 10-day duration splits into 10 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    pub include_weeks: bool,
    pub include_months: bool,
    pub include_years: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            include_weeks: true,
            include_months: true,
            include_years: true,
        }
    }
}

/// A duration decomposed into non-negative unit counts.
///
/// `years`, `months` and `weeks` are `None` when their unit was disabled.
/// `field_order` lists the units with non-zero counts, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationSplit {
    /// The duration was negative. The counts themselves are always positive.
    pub is_past: bool,
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub field_order: Vec<DurationUnit>,
}

impl DurationSplit {
    /// Split `delta` with every unit enabled.
    pub fn new(delta: TimeDelta) -> Self {
        split_duration(delta, &SplitOptions::default())
    }

    /// The count for `unit`, zero for a disabled unit.
    pub fn value(&self, unit: DurationUnit) -> i64 {
        match unit {
            DurationUnit::Years => self.years.unwrap_or(0),
            DurationUnit::Months => self.months.unwrap_or(0),
            DurationUnit::Weeks => self.weeks.unwrap_or(0),
            DurationUnit::Days => self.days,
            DurationUnit::Hours => self.hours,
            DurationUnit::Minutes => self.minutes,
            DurationUnit::Seconds => self.seconds,
        }
    }

    /// `"<count> <unit>"`, with the unit singular when the count is exactly 1.
    pub fn render(&self, unit: DurationUnit) -> String {
        let value = self.value(unit);
        let name = if value == 1 { unit.singular() } else { unit.name() };
        format!("{value} {name}")
    }

    /// The largest unit with a non-zero count.
    pub fn largest(&self) -> Option<DurationUnit> {
        self.field_order.first().copied()
    }

    /// The second largest unit with a non-zero count.
    pub fn second_largest(&self) -> Option<DurationUnit> {
        self.field_order.get(1).copied()
    }

    /// True when every count is zero (the duration was under a second).
    pub fn is_empty(&self) -> bool {
        self.field_order.is_empty()
    }
}

impl From<TimeDelta> for DurationSplit {
    fn from(delta: TimeDelta) -> Self {
        DurationSplit::new(delta)
    }
}

impl fmt::Display for DurationSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self, &FormatOptions::default()))
    }
}

/// Break a duration into `(days, seconds, microseconds)`.
///
/// `seconds` is always in `0..86_400` and `microseconds` in `0..1_000_000`;
/// only `days` carries the sign. One second and a half before zero is
/// `(-1, 86_398, 500_000)`.
pub fn normalize(delta: TimeDelta) -> (i64, i64, i64) {
    let mut secs = delta.num_seconds();
    let mut nanos = i64::from(delta.subsec_nanos());
    if nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    let micros = nanos / (1_000_000_000 / MICROS_IN_ONE_SECOND);
    (
        secs.div_euclid(SECONDS_IN_ONE_DAY),
        secs.rem_euclid(SECONDS_IN_ONE_DAY),
        micros,
    )
}

/// Split a duration into years, months, weeks, days, hours, minutes and
/// seconds.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use timecast::split::{split_duration, DurationUnit, SplitOptions};
///
/// let delta = TimeDelta::days(2002) + TimeDelta::seconds(20_000);
/// let split = split_duration(delta, &SplitOptions::default());
///
/// assert_eq!(split.years, Some(5));
/// assert_eq!(split.months, Some(5));
/// assert_eq!(split.weeks, Some(3));
/// assert_eq!((split.days, split.hours, split.minutes, split.seconds), (2, 5, 33, 20));
/// assert_eq!(split.largest(), Some(DurationUnit::Years));
/// ```
pub fn split_duration(delta: TimeDelta, options: &SplitOptions) -> DurationSplit {
    let is_past = delta < TimeDelta::zero();
    let magnitude = if is_past { -delta } else { delta };
    let (days, in_day_seconds, _) = normalize(magnitude);

    let mut days = days as f64;
    let mut take_days = |enabled: bool, size: f64| -> Option<i64> {
        if !enabled {
            return None;
        }
        let count = days.div_euclid(size);
        days = days.rem_euclid(size);
        Some(count as i64)
    };

    let years = take_days(options.include_years, DAYS_IN_MEAN_YEAR);
    let months = take_days(options.include_months, DAYS_IN_MEAN_MONTH);
    let weeks = take_days(options.include_weeks, DAYS_IN_WEEK);
    let days = days as i64;

    let hours = in_day_seconds / SECONDS_IN_ONE_HOUR;
    let rest = in_day_seconds % SECONDS_IN_ONE_HOUR;
    let minutes = rest / SECONDS_IN_ONE_MINUTE;
    let seconds = rest % SECONDS_IN_ONE_MINUTE;

    let mut split = DurationSplit {
        is_past,
        years,
        months,
        weeks,
        days,
        hours,
        minutes,
        seconds,
        field_order: Vec::new(),
    };
    split.field_order = DurationUnit::ALL
        .into_iter()
        .filter(|&unit| split.value(unit) != 0)
        .collect();
    split
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn split(days: i64, seconds: i64) -> DurationSplit {
        DurationSplit::new(TimeDelta::days(days) + TimeDelta::seconds(seconds))
    }

    // ── normalize tests ─────────────────────────────────────────────────

    #[test]
    fn test_normalize_positive() {
        let delta = TimeDelta::days(3) + TimeDelta::seconds(5) + TimeDelta::microseconds(7);
        assert_eq!(normalize(delta), (3, 5, 7));
    }

    #[test]
    fn test_normalize_negative_borrows_from_days() {
        assert_eq!(normalize(TimeDelta::seconds(-1)), (-1, 86_399, 0));
        assert_eq!(normalize(TimeDelta::milliseconds(-1_500)), (-1, 86_398, 500_000));
        assert_eq!(normalize(TimeDelta::days(-2)), (-2, 0, 0));
    }

    // ── split_duration tests ────────────────────────────────────────────

    #[test]
    fn test_split_every_unit() {
        let s = split(2002, 20_000);
        assert!(!s.is_past);
        assert_eq!(
            (s.years, s.months, s.weeks),
            (Some(5), Some(5), Some(3))
        );
        assert_eq!((s.days, s.hours, s.minutes, s.seconds), (2, 5, 33, 20));
        assert_eq!(s.field_order, DurationUnit::ALL.to_vec());
    }

    #[test]
    fn test_split_skips_zero_units_in_field_order() {
        let s = split(366, 20_000);
        assert_eq!(s.years, Some(1));
        assert_eq!(s.months, Some(0));
        assert_eq!(s.weeks, Some(0));
        assert_eq!(s.days, 0);
        assert_eq!(
            s.field_order,
            vec![
                DurationUnit::Years,
                DurationUnit::Hours,
                DurationUnit::Minutes,
                DurationUnit::Seconds
            ]
        );
        assert_eq!(s.largest(), Some(DurationUnit::Years));
        assert_eq!(s.second_largest(), Some(DurationUnit::Hours));
    }

    #[test]
    fn test_split_negative_is_past() {
        let s = split(0, -90);
        assert!(s.is_past);
        assert_eq!((s.minutes, s.seconds), (1, 30));

        let s = split(-3, -7_200);
        assert!(s.is_past);
        assert_eq!((s.days, s.hours), (3, 2));
    }

    #[test]
    fn test_split_disabled_units_pass_quota_down() {
        let options = SplitOptions {
            include_weeks: false,
            include_months: false,
            include_years: false,
        };
        let s = split_duration(TimeDelta::days(400), &options);
        assert_eq!((s.years, s.months, s.weeks), (None, None, None));
        assert_eq!(s.days, 400);
        assert_eq!(s.field_order, vec![DurationUnit::Days]);

        let options = SplitOptions {
            include_months: false,
            ..Default::default()
        };
        let s = split_duration(TimeDelta::days(400), &options);
        assert_eq!(s.years, Some(1));
        assert_eq!(s.months, None);
        // 34.7575 days left over
        assert_eq!(s.weeks, Some(4));
        assert_eq!(s.days, 6);
    }

    #[test]
    fn test_split_drops_subseconds() {
        let s = DurationSplit::new(TimeDelta::milliseconds(999));
        assert!(s.is_empty());
        assert_eq!(s.largest(), None);
        assert_eq!(s.second_largest(), None);

        let s = DurationSplit::new(TimeDelta::milliseconds(-2_500));
        assert!(s.is_past);
        assert_eq!(s.seconds, 2);
    }

    #[test]
    fn test_split_render_singular() {
        let s = split(8, 3_660);
        assert_eq!(s.render(DurationUnit::Weeks), "1 week");
        assert_eq!(s.render(DurationUnit::Days), "1 day");
        assert_eq!(s.render(DurationUnit::Hours), "1 hour");
        assert_eq!(s.render(DurationUnit::Minutes), "1 minute");
        assert_eq!(s.render(DurationUnit::Seconds), "0 seconds");
    }

    #[test]
    fn test_split_display_uses_default_format() {
        assert_eq!(split(2, 3_600).to_string(), "in 2 days");
        assert_eq!(split(0, -90).to_string(), "1 minute ago");
        assert_eq!(split(0, 0).to_string(), "no time at all");
    }

    #[test]
    fn test_split_serializes() {
        let json = serde_json::to_value(split(1, 60)).unwrap();
        assert_eq!(json["days"], 1);
        assert_eq!(json["minutes"], 1);
        assert_eq!(json["years"], 0);
        assert_eq!(json["field_order"], serde_json::json!(["days", "minutes"]));
    }

    #[test]
    fn test_split_options_from_json() {
        let options: SplitOptions = serde_json::from_str(r#"{"include_weeks": false}"#).unwrap();
        assert!(!options.include_weeks);
        assert!(options.include_months);
        assert!(options.include_years);
    }
}
