use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while building patterns or querying occurrences.
///
/// Well-formed patterns that simply never match (an `UNTIL` before the series
/// start, `COUNT=0`, a month day that no included month has) are not errors;
/// they produce empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid interval: {0} (must be at least 1)")]
    InvalidInterval(u32),

    #[error("Invalid window: end {end} is before start {start}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid month day: {0} (must be within 1..=31)")]
    InvalidMonthDay(u32),

    #[error("Invalid until: {0} (must be a whole second)")]
    InvalidUntil(NaiveDateTime),

    #[error("Invalid event span: end {end} is before start {start}")]
    InvalidSpan {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported recurrence rule part: {0}")]
    Unsupported(String),
}

pub type RecurrenceResult<T> = std::result::Result<T, RecurrenceError>;
