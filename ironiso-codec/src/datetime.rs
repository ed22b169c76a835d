/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Reconstruction of partial date/time fields.
//!
//! Date fields carry two-digit groups and omit the year, the date, or both.
//! The missing parts come from the current instant seen in the field's
//! timezone. A result that lands too far in the future is assumed to belong
//! to the previous year.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, TimeDelta, Utc};
use ironiso_core::FieldType;
use std::time::Duration;
use tracing::debug;

/// Two-digit years below this belong to the 2000s, the rest to the 1900s.
pub const CENTURY_PIVOT: i32 = 50;

/// Expands a two-digit year around [`CENTURY_PIVOT`].
#[inline]
#[must_use]
pub const fn expand_year(yy: i32) -> i32 {
    if yy < CENTURY_PIVOT { 2000 + yy } else { 1900 + yy }
}

/// Builds the instant a date field denotes, before the future tolerance.
///
/// `groups` holds the field's two-digit groups in wire order.
///
/// # Errors
/// Returns a reason if the groups do not name a real calendar instant, or if
/// `field_type` is not a date type.
pub fn reconstruct(
    field_type: FieldType,
    groups: &[i32],
    now: DateTime<Utc>,
    timezone: FixedOffset,
) -> Result<DateTime<FixedOffset>, String> {
    let expected = field_type.fixed_length().unwrap_or(0) / 2;
    if !field_type.is_date() || groups.len() != expected {
        return Err(format!("{} groups do not form a {field_type} value", groups.len()));
    }

    let today = now.with_timezone(&timezone).date_naive();
    let g = |index: usize| groups[index];

    let (date, (hour, minute, second)) = match field_type {
        FieldType::Date12 => (
            calendar_date(expand_year(g(0)), g(1), g(2))?,
            (g(3), g(4), g(5)),
        ),
        FieldType::Date10 => (calendar_date(today.year(), g(0), g(1))?, (g(2), g(3), g(4))),
        FieldType::Date4 => (calendar_date(today.year(), g(0), g(1))?, (0, 0, 0)),
        FieldType::DateExp => (calendar_date(expand_year(g(0)), g(1), 1)?, (0, 0, 0)),
        _ => (today, (g(0), g(1), g(2))),
    };

    let naive = date
        .and_hms_opt(component(hour)?, component(minute)?, component(second)?)
        .ok_or_else(|| format!("no such time {hour:02}:{minute:02}:{second:02}"))?;
    naive
        .and_local_timezone(timezone)
        .single()
        .ok_or_else(|| format!("{naive} has no instant at {timezone}"))
}

fn component(value: i32) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("negative component {value}"))
}

fn calendar_date(year: i32, month: i32, day: i32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(year, component(month)?, component(day)?)
        .ok_or_else(|| format!("no such date {year:04}-{month:02}-{day:02}"))
}

/// Moves `value` back one year if it lies more than `tolerance` after `now`.
///
/// A February 29 without a counterpart in the previous year becomes
/// February 28.
#[must_use]
pub fn apply_future_tolerance(
    value: DateTime<FixedOffset>,
    now: DateTime<Utc>,
    tolerance: Duration,
) -> DateTime<FixedOffset> {
    let ahead = value.with_timezone(&Utc) - now;
    let tolerance = TimeDelta::from_std(tolerance).unwrap_or(TimeDelta::MAX);
    if ahead <= tolerance {
        return value;
    }

    match value.checked_sub_months(Months::new(12)) {
        Some(previous) => {
            debug!(
                %value,
                %previous,
                ahead_ms = ahead.num_milliseconds(),
                "date beyond future tolerance, using previous year"
            );
            previous
        }
        None => value,
    }
}

/// Reconstructs a date field and applies the future tolerance.
///
/// # Errors
/// Returns a reason if the groups do not name a real calendar instant.
pub fn resolve(
    field_type: FieldType,
    groups: &[i32],
    now: DateTime<Utc>,
    timezone: FixedOffset,
    tolerance: Duration,
) -> Result<DateTime<FixedOffset>, String> {
    reconstruct(field_type, groups, now, timezone)
        .map(|value| apply_future_tolerance(value, now, tolerance))
}

/// Renders date groups back to their digit text.
#[must_use]
pub fn group_digits(groups: &[i32]) -> String {
    groups.iter().map(|g| format!("{g:02}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    const TOLERANCE: Duration = Duration::from_millis(900_000);

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_century_pivot() {
        assert_eq!(expand_year(0), 2000);
        assert_eq!(expand_year(49), 2049);
        assert_eq!(expand_year(50), 1950);
        assert_eq!(expand_year(99), 1999);
    }

    #[test]
    fn test_reconstruct_date12() {
        let value = reconstruct(FieldType::Date12, &[73, 1, 26, 4, 15, 0], now(), utc()).unwrap();
        assert_eq!(value.year(), 1973);
        assert_eq!(value.month(), 1);
        assert_eq!(value.day(), 26);
        assert_eq!((value.hour(), value.minute(), value.second()), (4, 15, 0));
    }

    #[test]
    fn test_reconstruct_date10_uses_current_year() {
        let value = reconstruct(FieldType::Date10, &[3, 5, 8, 30, 45], now(), utc()).unwrap();
        assert_eq!(value.year(), 2026);
        assert_eq!((value.month(), value.day()), (3, 5));
        assert_eq!((value.hour(), value.minute(), value.second()), (8, 30, 45));
    }

    #[test]
    fn test_reconstruct_date4_is_midnight() {
        let value = reconstruct(FieldType::Date4, &[10, 16], now(), utc()).unwrap();
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!((value.hour(), value.minute(), value.second()), (0, 0, 0));
    }

    #[test]
    fn test_reconstruct_date_exp() {
        let value = reconstruct(FieldType::DateExp, &[29, 12], now(), utc()).unwrap();
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2029, 12, 1).unwrap());
    }

    #[test]
    fn test_reconstruct_time_uses_today() {
        let value = reconstruct(FieldType::Time, &[9, 5, 7], now(), utc()).unwrap();
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!((value.hour(), value.minute(), value.second()), (9, 5, 7));
    }

    #[test]
    fn test_reconstruct_rejects_invalid_components() {
        assert!(reconstruct(FieldType::Date4, &[13, 1], now(), utc()).is_err());
        assert!(reconstruct(FieldType::Date4, &[2, 30], now(), utc()).is_err());
        assert!(reconstruct(FieldType::Time, &[24, 0, 0], now(), utc()).is_err());
        assert!(reconstruct(FieldType::Time, &[-1, 0, 0], now(), utc()).is_err());
        assert!(reconstruct(FieldType::Numeric, &[1, 2], now(), utc()).is_err());
        assert!(reconstruct(FieldType::Date4, &[1, 2, 3], now(), utc()).is_err());
    }

    #[test]
    fn test_tolerance_keeps_near_future() {
        let ahead = now() + TimeDelta::seconds(50);
        let value = ahead.with_timezone(&utc());
        assert_eq!(apply_future_tolerance(value, now(), TOLERANCE), value);
    }

    #[test]
    fn test_tolerance_keeps_past() {
        let past = (now() - TimeDelta::days(300)).with_timezone(&utc());
        assert_eq!(apply_future_tolerance(past, now(), TOLERANCE), past);
    }

    #[test]
    fn test_tolerance_rolls_back_far_future() {
        let ahead = (now() + TimeDelta::minutes(20)).with_timezone(&utc());
        let value = apply_future_tolerance(ahead, now(), TOLERANCE);
        assert_eq!(value.year(), 2025);
        assert_eq!(value.month(), ahead.month());
        assert_eq!(value.day(), ahead.day());
        assert_eq!(value.time(), ahead.time());
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let edge = (now() + TimeDelta::milliseconds(900_000)).with_timezone(&utc());
        assert_eq!(apply_future_tolerance(edge, now(), TOLERANCE), edge);
    }

    #[test]
    fn test_rollback_from_leap_day() {
        let now = Utc.with_ymd_and_hms(2028, 2, 1, 0, 0, 0).unwrap();
        let leap = reconstruct(FieldType::Date4, &[2, 29], now, utc()).unwrap();
        let value = apply_future_tolerance(leap, now, TOLERANCE);
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
    }

    #[test]
    fn test_time_near_midnight_uses_local_date() {
        // 05:30 UTC is 23:30 of the previous day at GMT-6.
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 5, 30, 0).unwrap();
        let gmt_minus_six = FixedOffset::west_opt(6 * 3600).unwrap();

        let value = resolve(FieldType::Time, &[23, 35, 0], now, gmt_minus_six, TOLERANCE).unwrap();
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        assert_eq!(value.with_timezone(&Utc), Utc.with_ymd_and_hms(2026, 10, 16, 5, 35, 0).unwrap());
    }

    #[test]
    fn test_date_exp_a_year_ahead_rolls_back() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let value = resolve(FieldType::DateExp, &[27, 10], now, utc(), TOLERANCE).unwrap();
        assert_eq!(value.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(&[7, 30, 12]), "073012");
        assert_eq!(group_digits(&[]), "");
    }
}
