use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::calendar::shift_months;
use crate::error::CalendarError;
use crate::point::{whole_days, CalendarPoint};

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;

/// A relative shift made of whole calendar months plus an exact duration.
///
/// The two parts are kept apart: a month is never converted into a number
/// of days, and a duration never rolls over into months. Adding a delta to
/// a point shifts the months first (clamping to month ends) and then adds
/// the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    total_months: i64,
    duration: TimeDelta,
}

/// Named components of a [`Delta`], summed when built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeltaParts {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
    pub microseconds: i64,
    pub nanoseconds: i64,
    #[serde(skip)]
    pub duration: Option<TimeDelta>,
}

impl DeltaParts {
    pub fn build(self) -> Result<Delta, CalendarError> {
        let total_months = self
            .years
            .checked_mul(12)
            .and_then(|months| months.checked_add(self.months))
            .ok_or(CalendarError::OutOfRange)?;

        let nanos: i128 = [
            (self.weeks, NANOS_PER_WEEK),
            (self.days, NANOS_PER_DAY),
            (self.hours, NANOS_PER_HOUR),
            (self.minutes, NANOS_PER_MINUTE),
            (self.seconds, NANOS_PER_SECOND),
            (self.milliseconds, NANOS_PER_MILLI),
            (self.microseconds, NANOS_PER_MICRO),
            (self.nanoseconds, 1),
        ]
        .into_iter()
        .map(|(value, unit)| i128::from(value) * unit)
        .sum();

        let mut duration = duration_from_nanos(nanos)?;
        if let Some(extra) = self.duration {
            duration = duration
                .checked_add(&extra)
                .ok_or(CalendarError::OutOfRange)?;
        }

        Ok(Delta {
            total_months,
            duration,
        })
    }
}

impl Delta {
    pub const fn new(total_months: i64, duration: TimeDelta) -> Self {
        Self {
            total_months,
            duration,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0, TimeDelta::zero())
    }

    pub const fn from_months(months: i64) -> Self {
        Self::new(months, TimeDelta::zero())
    }

    pub fn from_years(years: i64) -> Result<Self, CalendarError> {
        DeltaParts {
            years,
            ..DeltaParts::default()
        }
        .build()
    }

    pub const fn from_duration(duration: TimeDelta) -> Self {
        Self::new(0, duration)
    }

    pub const fn total_months(&self) -> i64 {
        self.total_months
    }

    pub const fn duration(&self) -> TimeDelta {
        self.duration
    }

    /// Whole years in the month part, rounded toward negative infinity.
    pub fn years(&self) -> i64 {
        self.total_months.div_euclid(12)
    }

    /// Months left over after [`Delta::years`]; always in `0..12`.
    pub fn months(&self) -> i64 {
        self.total_months.rem_euclid(12)
    }

    /// Whole days in the duration part, rounded toward negative infinity.
    pub fn days(&self) -> i64 {
        whole_days(self.duration)
    }

    pub fn is_zero(&self) -> bool {
        self.total_months == 0 && self.duration.is_zero()
    }

    pub fn checked_neg(self) -> Result<Self, CalendarError> {
        let total_months = self
            .total_months
            .checked_neg()
            .ok_or(CalendarError::OutOfRange)?;
        Ok(Self::new(total_months, -self.duration))
    }

    pub fn checked_add(self, other: Delta) -> Result<Self, CalendarError> {
        let total_months = self
            .total_months
            .checked_add(other.total_months)
            .ok_or(CalendarError::OutOfRange)?;
        let duration = self
            .duration
            .checked_add(&other.duration)
            .ok_or(CalendarError::OutOfRange)?;
        Ok(Self::new(total_months, duration))
    }

    pub fn checked_add_duration(self, duration: TimeDelta) -> Result<Self, CalendarError> {
        let duration = self
            .duration
            .checked_add(&duration)
            .ok_or(CalendarError::OutOfRange)?;
        Ok(Self::new(self.total_months, duration))
    }

    pub fn checked_sub(self, other: Delta) -> Result<Self, CalendarError> {
        self.checked_add(other.checked_neg()?)
    }

    pub fn checked_mul(self, n: i64) -> Result<Self, CalendarError> {
        let total_months = self
            .total_months
            .checked_mul(n)
            .ok_or(CalendarError::OutOfRange)?;
        let nanos = total_nanos(self.duration)
            .checked_mul(i128::from(n))
            .ok_or(CalendarError::OutOfRange)?;
        Ok(Self::new(total_months, duration_from_nanos(nanos)?))
    }

    /// Divides both parts by `n`, each rounded toward negative infinity.
    /// A month cannot be split exactly, so this is the only division offered.
    pub fn floor_div(self, n: i32) -> Result<Self, CalendarError> {
        if n == 0 {
            return Err(CalendarError::DivisionByZero);
        }
        let total_months = floor_div_i128(i128::from(self.total_months), i128::from(n));
        let total_months = i64::try_from(total_months).map_err(|_| CalendarError::OutOfRange)?;
        Ok(Self::new(total_months, floor_div_duration(self.duration, n)?))
    }

    /// Shifts `point` by the month part, then by the duration.
    pub fn checked_add_to<P: CalendarPoint>(self, point: P) -> Result<P, CalendarError> {
        let shifted = shift_months(point, self.total_months)?;
        shifted.checked_add_duration(self.duration)
    }

    pub fn checked_sub_from<P: CalendarPoint>(self, point: P) -> Result<P, CalendarError> {
        self.checked_neg()?.checked_add_to(point)
    }
}

pub(crate) fn floor_div_duration(duration: TimeDelta, n: i32) -> Result<TimeDelta, CalendarError> {
    if n == 0 {
        return Err(CalendarError::DivisionByZero);
    }
    duration_from_nanos(floor_div_i128(total_nanos(duration), i128::from(n)))
}

fn floor_div_i128(lhs: i128, rhs: i128) -> i128 {
    let quotient = lhs / rhs;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        quotient - 1
    } else {
        quotient
    }
}

fn total_nanos(duration: TimeDelta) -> i128 {
    i128::from(duration.num_seconds()) * NANOS_PER_SECOND + i128::from(duration.subsec_nanos())
}

fn duration_from_nanos(nanos: i128) -> Result<TimeDelta, CalendarError> {
    let seconds =
        i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).map_err(|_| CalendarError::OutOfRange)?;
    let subsec =
        u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).map_err(|_| CalendarError::OutOfRange)?;
    TimeDelta::new(seconds, subsec).ok_or(CalendarError::OutOfRange)
}

impl Default for Delta {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<TimeDelta> for Delta {
    fn from(duration: TimeDelta) -> Self {
        Self::from_duration(duration)
    }
}

impl PartialEq<TimeDelta> for Delta {
    fn eq(&self, other: &TimeDelta) -> bool {
        self.total_months == 0 && self.duration == *other
    }
}

impl PartialEq<Delta> for TimeDelta {
    fn eq(&self, other: &Delta) -> bool {
        other == self
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Delta(months={}, duration={})",
            self.total_months, self.duration
        )
    }
}

impl Neg for Delta {
    type Output = Delta;

    fn neg(self) -> Delta {
        self.checked_neg().expect("`-Delta` overflowed")
    }
}

impl Add for Delta {
    type Output = Delta;

    fn add(self, rhs: Delta) -> Delta {
        self.checked_add(rhs).expect("`Delta + Delta` overflowed")
    }
}

impl Sub for Delta {
    type Output = Delta;

    fn sub(self, rhs: Delta) -> Delta {
        self.checked_sub(rhs).expect("`Delta - Delta` overflowed")
    }
}

impl Add<TimeDelta> for Delta {
    type Output = Delta;

    fn add(self, rhs: TimeDelta) -> Delta {
        self.checked_add_duration(rhs)
            .expect("`Delta + TimeDelta` overflowed")
    }
}

impl Sub<TimeDelta> for Delta {
    type Output = Delta;

    fn sub(self, rhs: TimeDelta) -> Delta {
        self.checked_add_duration(-rhs)
            .expect("`Delta - TimeDelta` overflowed")
    }
}

impl Add<Delta> for TimeDelta {
    type Output = Delta;

    fn add(self, rhs: Delta) -> Delta {
        rhs + self
    }
}

impl Sub<Delta> for TimeDelta {
    type Output = Delta;

    fn sub(self, rhs: Delta) -> Delta {
        -rhs + self
    }
}

impl Mul<i32> for Delta {
    type Output = Delta;

    fn mul(self, rhs: i32) -> Delta {
        self.checked_mul(i64::from(rhs))
            .expect("`Delta * i32` overflowed")
    }
}

impl Mul<Delta> for i32 {
    type Output = Delta;

    fn mul(self, rhs: Delta) -> Delta {
        rhs * self
    }
}

macro_rules! point_ops {
    ($($point:ty),*) => {$(
        impl Add<Delta> for $point {
            type Output = $point;

            fn add(self, rhs: Delta) -> $point {
                rhs.checked_add_to(self)
                    .expect("date arithmetic out of range")
            }
        }

        impl Add<$point> for Delta {
            type Output = $point;

            fn add(self, rhs: $point) -> $point {
                rhs + self
            }
        }

        impl Sub<Delta> for $point {
            type Output = $point;

            fn sub(self, rhs: Delta) -> $point {
                rhs.checked_sub_from(self)
                    .expect("date arithmetic out of range")
            }
        }
    )*};
}

point_ops!(NaiveDate, NaiveDateTime);
