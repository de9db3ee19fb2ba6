//! Error types for recurrence-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Invalid recurrence pattern (expected daily or weekly): {0}")]
    InvalidPattern(String),

    #[error("Invalid weekday (expected 0=Sunday..6=Saturday): {0}")]
    InvalidWeekday(String),
}

pub type Result<T> = std::result::Result<T, RecurrenceError>;
