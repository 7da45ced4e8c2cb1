pub mod cadence;
pub mod recurrence;

pub use cadence::{daily, hourly, minutely, monthly, secondly, weekly, yearly, Cadence};
pub use recurrence::{iterator, Recurrence, RecurrenceRule};
