//! Calendar-aware deltas and recurring date sequences.
//!
//! A [`Delta`] combines whole months with an exact [`chrono::TimeDelta`].
//! Adding one to a date shifts the month first, clamping to the end of
//! shorter months, then adds the duration.

pub mod calendar;
pub mod delta;
mod difference;
pub mod error;
pub mod operand;
pub mod point;
pub mod rules;

pub use calendar::{
    is_leap_year, normalise_day, shift_months, shift_years, with_day, with_month, with_year,
};
pub use delta::{Delta, DeltaParts};
pub use error::CalendarError;
pub use operand::Operand;
pub use point::CalendarPoint;
pub use rules::*;
