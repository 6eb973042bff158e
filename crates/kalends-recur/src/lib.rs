//! Recurrence-occurrence engine.
//!
//! Expands a [`RecurrencePattern`] anchored at an event's start into concrete
//! occurrences within a half-open query window, and resolves per-event
//! questions ("does this event occur on day D?", "what occurs in [A, B)?")
//! against the event's own span and exception dates.
//!
//! All instants are naive wall-clock values; time zones are the caller's
//! concern. Every operation is a pure function of its arguments, and all
//! public types are `Send + Sync`.

pub mod calendar;
pub mod error;
pub mod generate;
pub mod pattern;
pub mod resolve;

pub use error::{RecurrenceError, RecurrenceResult};
pub use generate::generate;
pub use pattern::{Frequency, RecurrenceEnd, RecurrencePattern, RecurrencePatternBuilder, Weekday};
pub use resolve::{Event, occurrences_in_range, occurs_on_date};
