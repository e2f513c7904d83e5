//! Calendar constants and the representable date-time range.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{Result, TimecastError};

/// Every 400 years hold 97 leap years: (303 * 365 + 97 * 366) / 400.
pub const DAYS_IN_MEAN_YEAR: f64 = 365.2425;
/// Mean year / 12.
pub const DAYS_IN_MEAN_MONTH: f64 = 30.436875;
pub const DAYS_IN_WEEK: f64 = 7.0;

pub const SECONDS_IN_ONE_MINUTE: i64 = 60;
pub const SECONDS_IN_ONE_HOUR: i64 = 3_600;
pub const SECONDS_IN_ONE_DAY: i64 = 86_400;

pub const MICROS_IN_ONE_SECOND: i64 = 1_000_000;

/// Earliest year a canonical date-time may carry.
pub const MIN_YEAR: i32 = 1;
/// Latest year a canonical date-time may carry.
pub const MAX_YEAR: i32 = 9999;

/// `0001-01-01T00:00:00`, the smallest canonical date-time.
pub fn min_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1)
        .and_then(|d| d.and_hms_micro_opt(0, 0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// `9999-12-31T23:59:59.999999`, the largest canonical date-time.
pub fn max_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31)
        .and_then(|d| d.and_hms_micro_opt(23, 59, 59, 999_999))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Reject date-times outside years 1–9999.
///
/// chrono represents a much wider range than the canonical one, so every
/// conversion funnels its result through here.
pub(crate) fn check_range(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    if (MIN_YEAR..=MAX_YEAR).contains(&dt.year()) {
        Ok(dt)
    } else {
        Err(TimecastError::Overflow(format!(
            "{dt} is outside years {MIN_YEAR}-{MAX_YEAR}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        assert_eq!(min_datetime().to_string(), "0001-01-01 00:00:00");
        assert_eq!(max_datetime().to_string(), "9999-12-31 23:59:59.999999");
        assert!(check_range(min_datetime()).is_ok());
        assert!(check_range(max_datetime()).is_ok());
    }

    #[test]
    fn test_range_rejects_year_10000() {
        let dt = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = check_range(dt).unwrap_err().to_string();
        assert!(err.contains("Out of range"), "got: {err}");
    }

    #[test]
    fn test_mean_month_is_twelfth_of_mean_year() {
        assert!((DAYS_IN_MEAN_MONTH * 12.0 - DAYS_IN_MEAN_YEAR).abs() < 1e-9);
    }
}
