//! Arithmetic between values whose kinds are only known at runtime.
//!
//! The operator impls on [`Delta`] cover every combination that makes sense
//! when both sides are known statically. [`Operand`] is for callers holding a
//! mix of deltas, plain durations and points: every pairing is listed
//! explicitly and the ones without a calendar meaning return an error.

use chrono::TimeDelta;

use crate::delta::{floor_div_duration, Delta};
use crate::error::CalendarError;
use crate::point::CalendarPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<P> {
    Delta(Delta),
    Duration(TimeDelta),
    Point(P),
}

impl<P> From<Delta> for Operand<P> {
    fn from(delta: Delta) -> Self {
        Operand::Delta(delta)
    }
}

impl<P> From<TimeDelta> for Operand<P> {
    fn from(duration: TimeDelta) -> Self {
        Operand::Duration(duration)
    }
}

impl<P: CalendarPoint> Operand<P> {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Delta(_) => "delta",
            Operand::Duration(_) => "duration",
            Operand::Point(_) => "point",
        }
    }

    pub fn into_delta(self) -> Option<Delta> {
        match self {
            Operand::Delta(delta) => Some(delta),
            Operand::Duration(duration) => Some(Delta::from_duration(duration)),
            Operand::Point(_) => None,
        }
    }

    pub fn into_point(self) -> Option<P> {
        match self {
            Operand::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, CalendarError> {
        match (self, rhs) {
            (Operand::Delta(lhs), Operand::Delta(rhs)) => lhs.checked_add(rhs).map(Operand::Delta),
            (Operand::Delta(delta), Operand::Duration(duration))
            | (Operand::Duration(duration), Operand::Delta(delta)) => {
                delta.checked_add_duration(duration).map(Operand::Delta)
            }
            (Operand::Duration(lhs), Operand::Duration(rhs)) => lhs
                .checked_add(&rhs)
                .map(Operand::Duration)
                .ok_or(CalendarError::OutOfRange),
            (Operand::Point(point), Operand::Delta(delta))
            | (Operand::Delta(delta), Operand::Point(point)) => {
                delta.checked_add_to(point).map(Operand::Point)
            }
            (Operand::Point(point), Operand::Duration(duration))
            | (Operand::Duration(duration), Operand::Point(point)) => {
                point.checked_add_duration(duration).map(Operand::Point)
            }
            (lhs @ Operand::Point(_), rhs @ Operand::Point(_)) => Err(mismatch("+", &lhs, &rhs)),
        }
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, CalendarError> {
        match (self, rhs) {
            (Operand::Point(lhs), Operand::Point(rhs)) => {
                Ok(Operand::Duration(lhs.duration_since(&rhs)))
            }
            (Operand::Delta(_) | Operand::Duration(_), Operand::Point(_)) => Err(
                CalendarError::UnsupportedOperation("a calendar point cannot be subtracted"),
            ),
            (lhs, rhs) => lhs.checked_add(rhs.checked_neg()?),
        }
    }

    pub fn checked_neg(self) -> Result<Self, CalendarError> {
        match self {
            Operand::Delta(delta) => delta.checked_neg().map(Operand::Delta),
            Operand::Duration(duration) => Ok(Operand::Duration(-duration)),
            Operand::Point(_) => Err(CalendarError::UnsupportedOperation(
                "a calendar point cannot be negated",
            )),
        }
    }

    pub fn checked_mul(self, n: i32) -> Result<Self, CalendarError> {
        match self {
            Operand::Delta(delta) => delta.checked_mul(i64::from(n)).map(Operand::Delta),
            Operand::Duration(duration) => duration
                .checked_mul(n)
                .map(Operand::Duration)
                .ok_or(CalendarError::OutOfRange),
            Operand::Point(_) => Err(scalar_mismatch("*", &self)),
        }
    }

    pub fn checked_floor_div(self, n: i32) -> Result<Self, CalendarError> {
        match self {
            Operand::Delta(delta) => delta.floor_div(n).map(Operand::Delta),
            Operand::Duration(duration) => floor_div_duration(duration, n).map(Operand::Duration),
            Operand::Point(_) => Err(scalar_mismatch("//", &self)),
        }
    }

    /// Exact division. Only plain durations support it.
    pub fn checked_div(self, n: i32) -> Result<Self, CalendarError> {
        match self {
            Operand::Delta(_) => Err(CalendarError::UnsupportedOperation(
                "a delta cannot be divided exactly, use floor division",
            )),
            Operand::Duration(duration) => duration
                .checked_div(n)
                .map(Operand::Duration)
                .ok_or(CalendarError::DivisionByZero),
            Operand::Point(_) => Err(scalar_mismatch("/", &self)),
        }
    }

    /// Equality across kinds. Unrelated kinds compare unequal.
    pub fn eq_loose(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Delta(lhs), Operand::Delta(rhs)) => lhs == rhs,
            (Operand::Delta(delta), Operand::Duration(duration))
            | (Operand::Duration(duration), Operand::Delta(delta)) => delta == duration,
            (Operand::Duration(lhs), Operand::Duration(rhs)) => lhs == rhs,
            (Operand::Point(lhs), Operand::Point(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

fn mismatch<P: CalendarPoint>(
    op: &'static str,
    lhs: &Operand<P>,
    rhs: &Operand<P>,
) -> CalendarError {
    CalendarError::TypeMismatch {
        op,
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}

fn scalar_mismatch<P: CalendarPoint>(op: &'static str, lhs: &Operand<P>) -> CalendarError {
    CalendarError::TypeMismatch {
        op,
        lhs: lhs.kind(),
        rhs: "integer",
    }
}
