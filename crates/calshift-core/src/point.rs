use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::CalendarError;

const SECONDS_PER_DAY: i64 = 86_400;

/// A date or date-time value that calendar arithmetic can be applied to.
///
/// Implementations keep any time-of-day untouched when the calendar fields
/// are replaced.
pub trait CalendarPoint: Datelike + Copy + Ord {
    fn with_ymd(&self, year: i32, month: u32, day: u32) -> Result<Self, CalendarError>;

    fn checked_add_duration(&self, duration: TimeDelta) -> Result<Self, CalendarError>;

    fn duration_since(&self, earlier: &Self) -> TimeDelta;
}

impl CalendarPoint for NaiveDate {
    fn with_ymd(&self, year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        build_date(year, month, day)
    }

    /// Dates only move by whole days: the duration is floored to days first.
    fn checked_add_duration(&self, duration: TimeDelta) -> Result<Self, CalendarError> {
        let days = TimeDelta::try_days(whole_days(duration)).ok_or(CalendarError::OutOfRange)?;
        self.checked_add_signed(days).ok_or(CalendarError::OutOfRange)
    }

    fn duration_since(&self, earlier: &Self) -> TimeDelta {
        self.signed_duration_since(*earlier)
    }
}

impl CalendarPoint for NaiveDateTime {
    fn with_ymd(&self, year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        Ok(build_date(year, month, day)?.and_time(self.time()))
    }

    fn checked_add_duration(&self, duration: TimeDelta) -> Result<Self, CalendarError> {
        self.checked_add_signed(duration).ok_or(CalendarError::OutOfRange)
    }

    fn duration_since(&self, earlier: &Self) -> TimeDelta {
        self.signed_duration_since(*earlier)
    }
}

/// Whole days in `duration`, rounded toward negative infinity.
pub fn whole_days(duration: TimeDelta) -> i64 {
    let seconds = duration.num_seconds() - i64::from(duration.subsec_nanos() < 0);
    seconds.div_euclid(SECONDS_PER_DAY)
}

fn build_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    if !(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) {
        return Err(CalendarError::OutOfRange);
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarError::InvalidDate { year, month, day })
}
