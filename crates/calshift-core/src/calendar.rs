//! Month arithmetic on calendar fields.
//!
//! Whenever a shift lands on a day the target month does not have, the day
//! is moved backwards to the last day of that month.

use crate::error::CalendarError;
use crate::point::CalendarPoint;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Clamps `day` to the length of the given month.
///
/// Days outside 1..=31 are passed through unchanged.
pub fn normalise_day(year: i32, month: u32, day: u32) -> u32 {
    if day <= 28 {
        return day;
    }

    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 if day == 31 => 30,
        _ => day,
    }
}

pub fn shift_months<P: CalendarPoint>(point: P, months: i64) -> Result<P, CalendarError> {
    let index = i64::from(point.month0())
        .checked_add(months)
        .ok_or(CalendarError::OutOfRange)?;
    let year = i64::from(point.year()) + index.div_euclid(12);
    let year = i32::try_from(year).map_err(|_| CalendarError::OutOfRange)?;
    let month = u32::try_from(index.rem_euclid(12) + 1).map_err(|_| CalendarError::OutOfRange)?;
    let day = normalise_day(year, month, point.day());

    point.with_ymd(year, month, day)
}

pub fn shift_years<P: CalendarPoint>(point: P, years: i64) -> Result<P, CalendarError> {
    let months = years.checked_mul(12).ok_or(CalendarError::OutOfRange)?;
    shift_months(point, months)
}

pub fn with_day<P: CalendarPoint>(point: P, day: u32) -> Result<P, CalendarError> {
    let day = normalise_day(point.year(), point.month(), day);
    point.with_ymd(point.year(), point.month(), day)
}

pub fn with_month<P: CalendarPoint>(point: P, month: u32) -> Result<P, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }

    shift_months(point, i64::from(month) - i64::from(point.month()))
}

pub fn with_year<P: CalendarPoint>(point: P, year: i32) -> Result<P, CalendarError> {
    shift_years(point, i64::from(year) - i64::from(point.year()))
}
