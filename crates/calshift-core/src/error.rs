use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("month {0} should be between 1 and 12")]
    InvalidMonth(u32),
    #[error("rolling day {0} should be between 1 and 31")]
    InvalidDay(u32),
    #[error("no such date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("unknown cadence: {0}")]
    InvalidCadence(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("unsupported operand kinds for {op}: {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("date arithmetic out of range")]
    OutOfRange,
}
