//! Human-readable rendering of durations and date-times.
//!
//! [`format_duration`] turns a [`DurationSplit`] into phrases like
//! `"in 3 weeks"`, `"1 year and 7 months"` or `"a few seconds ago"`.
//! [`human_readable_delta`] does the same for a date-time, measuring the
//! distance to an explicit "now" anchor. [`serialize`] and [`to_str`] give
//! the plain ISO or seconds form of dates, times and durations.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::resolve::{resolve_temporal_with_options, ResolveOptions, TemporalValue};
use crate::split::{DurationSplit, DurationUnit};

/// Options for [`format_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Most units to render. Values below 1 are treated as 1.
    pub max_fields: usize,
    /// Render seconds like any other unit. When `false`, seconds are dropped
    /// after larger units and a seconds-only duration reads as
    /// `seconds_only_text`.
    pub include_seconds: bool,
    /// `(future, past)` templates; `{}` is replaced by the rendered units.
    /// `None` leaves the text undecorated.
    pub directionals: Option<(String, String)>,
    /// Text for a duration under one second. Directionals are not applied.
    pub no_time_text: String,
    pub seconds_only_text: String,
    /// Stop descending into smaller units once a rendered count exceeds this.
    /// `None` or `Some(0)` disables the check.
    pub halting_threshold: Option<i64>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_fields: 2,
            include_seconds: false,
            directionals: Some(("in {}".to_string(), "{} ago".to_string())),
            no_time_text: "no time at all".to_string(),
            seconds_only_text: "a few seconds".to_string(),
            halting_threshold: Some(1),
        }
    }
}

impl FormatOptions {
    /// Defaults without the `"in …"` / `"… ago"` decoration.
    pub fn undirected() -> Self {
        Self {
            directionals: None,
            ..Self::default()
        }
    }
}

/// Render a duration split as text.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use timecast::format::{format_duration, FormatOptions};
/// use timecast::split::DurationSplit;
///
/// let split = DurationSplit::new(TimeDelta::days(366) + TimeDelta::seconds(20_000));
/// assert_eq!(format_duration(&split, &FormatOptions::default()), "in 1 year and 5 hours");
///
/// let options = FormatOptions {
///     max_fields: 7,
///     include_seconds: true,
///     halting_threshold: None,
///     ..FormatOptions::default()
/// };
/// assert_eq!(
///     format_duration(&split, &options),
///     "in 1 year, 5 hours, 33 minutes and 20 seconds"
/// );
/// ```
pub fn format_duration(split: &DurationSplit, options: &FormatOptions) -> String {
    if split.is_empty() {
        return options.no_time_text.clone();
    }

    let text = render_units(split, options);
    match &options.directionals {
        Some((future, past)) => {
            let template = if split.is_past { past } else { future };
            template.replacen("{}", &text, 1)
        }
        None => text,
    }
}

fn render_units(split: &DurationSplit, options: &FormatOptions) -> String {
    if split.largest() == Some(DurationUnit::Seconds) {
        return if options.include_seconds {
            split.render(DurationUnit::Seconds)
        } else {
            options.seconds_only_text.clone()
        };
    }

    let mut units: Vec<DurationUnit> = split
        .field_order
        .iter()
        .copied()
        .take(options.max_fields.max(1))
        .collect();
    if !options.include_seconds && units.last() == Some(&DurationUnit::Seconds) {
        units.pop();
    }

    let threshold = options.halting_threshold.filter(|&t| t != 0);
    let mut parts = Vec::with_capacity(units.len());
    for unit in units {
        parts.push(split.render(unit));
        if threshold.is_some_and(|t| split.value(unit) > t) {
            break;
        }
    }

    match parts.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Render a duration without directionals: `"5 years"`, `"1 year and 5 hours"`,
/// `"a few seconds"`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use timecast::format::delta_to_str;
///
/// assert_eq!(delta_to_str(TimeDelta::seconds(360)), "6 minutes");
/// assert_eq!(delta_to_str(TimeDelta::seconds(90)), "1 minute");
/// assert_eq!(delta_to_str(TimeDelta::seconds(59)), "a few seconds");
/// ```
pub fn delta_to_str(delta: TimeDelta) -> String {
    format_duration(&DurationSplit::new(delta), &FormatOptions::undirected())
}

/// Seconds in a duration, with microsecond precision.
pub fn total_seconds(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// ISO 8601 text for a date-time: `2013-06-10T12:13:14`, with a six-digit
/// fraction only when the microseconds are non-zero.
pub fn to_iso_string(dt: NaiveDateTime) -> String {
    dt.format(&iso_layout("%Y-%m-%dT%H:%M:%S", dt.nanosecond()))
        .to_string()
}

fn iso_layout(whole_seconds: &'static str, nanos: u32) -> String {
    if nanos / 1_000 == 0 {
        whole_seconds.to_string()
    } else {
        format!("{whole_seconds}%.6f")
    }
}

// ── serialize ───────────────────────────────────────────────────────────────

/// A date, time, date-time or duration to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalObject {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Delta(TimeDelta),
}

impl From<NaiveDateTime> for TemporalObject {
    fn from(value: NaiveDateTime) -> Self {
        TemporalObject::DateTime(value)
    }
}

impl From<NaiveDate> for TemporalObject {
    fn from(value: NaiveDate) -> Self {
        TemporalObject::Date(value)
    }
}

impl From<NaiveTime> for TemporalObject {
    fn from(value: NaiveTime) -> Self {
        TemporalObject::Time(value)
    }
}

impl From<TimeDelta> for TemporalObject {
    fn from(value: TimeDelta) -> Self {
        TemporalObject::Delta(value)
    }
}

/// The serialized form of a [`TemporalObject`]: ISO text, or seconds for a
/// duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Serialized {
    Text(String),
    Seconds(f64),
}

impl fmt::Display for Serialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Serialized::Text(text) => f.write_str(text),
            // Debug keeps the trailing `.0` on whole numbers
            Serialized::Seconds(seconds) => write!(f, "{seconds:?}"),
        }
    }
}

/// ISO text for date-times, dates and times; total seconds for durations.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime, TimeDelta};
/// use timecast::format::{serialize, Serialized};
///
/// let date = NaiveDate::from_ymd_opt(2013, 6, 10).unwrap();
/// assert_eq!(serialize(date), Serialized::Text("2013-06-10".to_string()));
///
/// let time = NaiveTime::from_hms_micro_opt(8, 5, 0, 250).unwrap();
/// assert_eq!(serialize(time), Serialized::Text("08:05:00.000250".to_string()));
///
/// assert_eq!(serialize(TimeDelta::minutes(-3)), Serialized::Seconds(-180.0));
/// ```
pub fn serialize(value: impl Into<TemporalObject>) -> Serialized {
    match value.into() {
        TemporalObject::DateTime(dt) => Serialized::Text(to_iso_string(dt)),
        TemporalObject::Date(date) => Serialized::Text(date.format("%Y-%m-%d").to_string()),
        TemporalObject::Time(time) => Serialized::Text(
            time.format(&iso_layout("%H:%M:%S", time.nanosecond()))
                .to_string(),
        ),
        TemporalObject::Delta(delta) => Serialized::Seconds(total_seconds(delta)),
    }
}

/// [`serialize`] as a string. Durations read like `"90.0"`.
pub fn to_str(value: impl Into<TemporalObject>) -> String {
    serialize(value).to_string()
}

// ── human_readable_delta ────────────────────────────────────────────────────

/// Something that describes a distance in time.
#[derive(Debug, Clone, PartialEq)]
pub enum Elapsed {
    /// Formatted as is.
    Delta(TimeDelta),
    /// A time of day on the anchor's date.
    Time(NaiveTime),
    /// Compared with the anchor's date in whole days.
    Date(NaiveDate),
    /// Resolved to a date-time first. A [`TemporalValue::Date`] is compared in
    /// whole days like [`Elapsed::Date`].
    Temporal(TemporalValue),
}

impl From<TimeDelta> for Elapsed {
    fn from(value: TimeDelta) -> Self {
        Elapsed::Delta(value)
    }
}

impl From<NaiveTime> for Elapsed {
    fn from(value: NaiveTime) -> Self {
        Elapsed::Time(value)
    }
}

impl From<NaiveDate> for Elapsed {
    fn from(value: NaiveDate) -> Self {
        Elapsed::Date(value)
    }
}

impl From<TemporalValue> for Elapsed {
    fn from(value: TemporalValue) -> Self {
        Elapsed::Temporal(value)
    }
}

impl From<NaiveDateTime> for Elapsed {
    fn from(value: NaiveDateTime) -> Self {
        Elapsed::Temporal(value.into())
    }
}

impl From<&str> for Elapsed {
    fn from(value: &str) -> Self {
        Elapsed::Temporal(value.into())
    }
}

/// Options for [`human_readable_delta_with_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeOptions {
    /// Measure against the anchor in UTC. When `false` the anchor is moved to
    /// the local zone first.
    pub utc: bool,
    /// Returned when the value cannot be resolved.
    pub default: String,
    pub format: FormatOptions,
}

impl Default for HumanizeOptions {
    fn default() -> Self {
        Self {
            utc: true,
            default: String::new(),
            format: FormatOptions::default(),
        }
    }
}

/// Describe how far `value` is from `anchor`: `"in 3 weeks"`, `"2 days ago"`.
///
/// The elapsed time is `value - now`, so a value before the anchor is
/// negative and reads `"… ago"`. Older callers that subtracted the other
/// way round must flip the sign of a bare [`TimeDelta`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use timecast::format::human_readable_delta;
///
/// let anchor = Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap();
///
/// assert_eq!(human_readable_delta(TimeDelta::seconds(-90), anchor), "1 minute ago");
/// assert_eq!(human_readable_delta("2026-02-20T13:00:00", anchor), "in 2 days");
/// assert_eq!(human_readable_delta("whenever", anchor), "");
/// ```
pub fn human_readable_delta(value: impl Into<Elapsed>, anchor: DateTime<Utc>) -> String {
    human_readable_delta_with_options(value, anchor, &HumanizeOptions::default())
}

/// Describe how far `value` is from `anchor`, with options.
pub fn human_readable_delta_with_options(
    value: impl Into<Elapsed>,
    anchor: DateTime<Utc>,
    options: &HumanizeOptions,
) -> String {
    let now = if options.utc {
        anchor.naive_utc()
    } else {
        anchor.with_timezone(&Local).naive_local()
    };

    let delta = match value.into() {
        Elapsed::Delta(delta) => delta,
        Elapsed::Time(time) => now.date().and_time(time) - now,
        Elapsed::Date(date) | Elapsed::Temporal(TemporalValue::Date(date)) => date - now.date(),
        Elapsed::Temporal(value) => {
            let resolve_options = ResolveOptions {
                utc: options.utc,
                ..ResolveOptions::default()
            };
            match resolve_temporal_with_options(value, anchor, &resolve_options) {
                Ok(dt) => dt - now,
                Err(_) => return options.default.clone(),
            }
        }
    };

    format_duration(&DurationSplit::new(delta), &options.format)
}

// ── Tests ───────────────────────────────────────────────────────────────────
