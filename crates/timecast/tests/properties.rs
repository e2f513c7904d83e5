use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use timecast::consts::{DAYS_IN_MEAN_MONTH, DAYS_IN_MEAN_YEAR, SECONDS_IN_ONE_DAY};
use timecast::split::normalize;
use timecast::{
    datetime_to_filetime, datetime_to_instant, datetime_to_timestamp, filetime_to_datetime,
    instant_to_datetime, parse_delta, resolve_temporal, split_duration, timestamp_to_datetime,
    SplitOptions, TemporalValue,
};

/// Microseconds since the Unix epoch of 0001-01-01 and 9999-12-31T23:59:59.999999.
const MIN_MICROS: i64 = -62_135_596_800_000_000;
const MAX_MICROS: i64 = 253_402_300_799_999_999;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 18, 12, 0, 0).unwrap()
}

fn from_micros(micros: i64) -> NaiveDateTime {
    DateTime::from_timestamp_micros(micros).unwrap().naive_utc()
}

fn any_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (MIN_MICROS..=MAX_MICROS).prop_map(from_micros)
}

proptest! {
    // ── Conversions ─────────────────────────────────────────────────────

    #[test]
    fn filetime_round_trip(micros in MIN_MICROS..=MAX_MICROS) {
        let ticks = datetime_to_filetime(from_micros(micros)).unwrap();
        prop_assert_eq!(datetime_to_filetime(filetime_to_datetime(ticks).unwrap()), Ok(ticks));
    }

    #[test]
    fn datetime_filetime_round_trip(dt in any_datetime()) {
        prop_assert_eq!(filetime_to_datetime(datetime_to_filetime(dt).unwrap()), Ok(dt));
    }

    #[test]
    fn timestamp_round_trip_near_epoch(micros in -2_000_000_000_000_000_i64..2_000_000_000_000_000) {
        let dt = from_micros(micros);
        prop_assert_eq!(timestamp_to_datetime(datetime_to_timestamp(dt), false).unwrap(), dt);
    }

    #[test]
    fn timestamp_round_trip_whole_seconds(seconds in MIN_MICROS / 1_000_000..=MAX_MICROS / 1_000_000) {
        let dt = from_micros(seconds * 1_000_000);
        prop_assert_eq!(timestamp_to_datetime(datetime_to_timestamp(dt), false).unwrap(), dt);
    }

    #[test]
    fn instant_round_trip(millis in MIN_MICROS / 1_000..=MAX_MICROS / 1_000) {
        let dt = instant_to_datetime(millis, false).unwrap();
        prop_assert_eq!(datetime_to_instant(dt), millis);
    }

    #[test]
    fn instant_truncates_toward_zero(micros in MIN_MICROS..=MAX_MICROS) {
        let millis = datetime_to_instant(from_micros(micros));
        prop_assert!((micros - millis * 1_000).abs() < 1_000);
        prop_assert!(millis == 0 || millis.signum() == micros.signum());
        prop_assert!(millis.abs() * 1_000 <= micros.abs());
    }

    // ── Resolver ────────────────────────────────────────────────────────

    #[test]
    fn resolve_is_idempotent(dt in any_datetime()) {
        let once = resolve_temporal(dt, anchor()).unwrap();
        prop_assert_eq!(once, dt);
        prop_assert_eq!(resolve_temporal(once, anchor()).unwrap(), once);
    }

    #[test]
    fn resolve_timestamps_inside_window(seconds in -29_000_000_000_i64..33_000_000_000) {
        let expected = timestamp_to_datetime(seconds as f64, false).unwrap();
        prop_assert_eq!(resolve_temporal(seconds, anchor()), Ok(expected));
    }

    #[test]
    fn resolve_instants_inside_window(millis in 34_000_000_000_i64..33_000_000_000_000) {
        let expected = instant_to_datetime(millis, false).unwrap();
        prop_assert_eq!(resolve_temporal(millis, anchor()), Ok(expected));
    }

    #[test]
    fn resolve_filetimes_outside_window(micros in -11_000_000_000_000_000_i64..=MAX_MICROS) {
        // 1621 onwards: far enough from 1601 that the tick count exceeds the instant window
        let dt = from_micros(micros);
        let ticks = datetime_to_filetime(dt).unwrap();
        prop_assert_eq!(resolve_temporal(ticks, anchor()), Ok(dt));
    }

    #[test]
    fn resolve_failure_echoes_input(text in "[a-z]{1,12}") {
        prop_assume!(!matches!(text.as_str(), "inf" | "infinity" | "nan"));
        prop_assert_eq!(
            resolve_temporal(text.as_str(), anchor()),
            Err(TemporalValue::Text(text.clone()))
        );
    }

    // ── Splitting ───────────────────────────────────────────────────────

    #[test]
    fn split_counts_approximate_the_duration(seconds in -100_000_000_000_i64..100_000_000_000) {
        let delta = TimeDelta::seconds(seconds);
        let split = split_duration(delta, &SplitOptions::default());

        let years = split.years.unwrap_or(0);
        let months = split.months.unwrap_or(0);
        let weeks = split.weeks.unwrap_or(0);
        for value in [years, months, weeks, split.days, split.hours, split.minutes, split.seconds] {
            prop_assert!(value >= 0);
        }
        prop_assert_eq!(split.is_past, seconds < 0);

        let (days, in_day, _) = normalize(TimeDelta::seconds(seconds.abs()));
        prop_assert_eq!(split.hours * 3_600 + split.minutes * 60 + split.seconds, in_day);

        let rebuilt_days = years as f64 * DAYS_IN_MEAN_YEAR
            + months as f64 * DAYS_IN_MEAN_MONTH
            + weeks as f64 * 7.0
            + split.days as f64;
        prop_assert!(rebuilt_days <= days as f64 + 1e-6);
        prop_assert!(rebuilt_days > days as f64 - 1.0);
        prop_assert_eq!(days * SECONDS_IN_ONE_DAY + in_day, seconds.abs());
    }

    #[test]
    fn parse_delta_whole_seconds(seconds in -1_000_000_000_i64..1_000_000_000) {
        prop_assert_eq!(parse_delta(&format!("{seconds}s")).unwrap(), TimeDelta::seconds(seconds));
    }
}
