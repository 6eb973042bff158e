//! Occurrence resolution for a single event.
//!
//! Combines generated occurrences with the event's own span and its
//! exception dates. Exception dates win over everything else, including the
//! event's own span.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};
use crate::generate::generate;
use crate::pattern::RecurrencePattern;

/// An event as seen by the resolver: its own span, an optional recurrence
/// pattern anchored at `start`, and the calendar days it is suppressed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<RecurrencePattern>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    exception_dates: BTreeSet<NaiveDate>,
}

impl Event {
    /// ## Summary
    /// Creates a non-recurring event spanning `start..=end`.
    ///
    /// ## Errors
    /// Returns [`RecurrenceError::InvalidSpan`] if `end` precedes `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> RecurrenceResult<Self> {
        if end < start {
            return Err(RecurrenceError::InvalidSpan { start, end });
        }
        Ok(Self {
            start,
            end,
            recurrence: None,
            exception_dates: BTreeSet::new(),
        })
    }

    /// Replaces the recurrence pattern; the event's start becomes the series anchor.
    #[must_use]
    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurrence = Some(pattern);
        self
    }

    /// Adds calendar days on which the event is suppressed.
    #[must_use]
    pub fn with_exception_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.exception_dates.extend(dates);
        self
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub const fn recurrence(&self) -> Option<&RecurrencePattern> {
        self.recurrence.as_ref()
    }

    #[must_use]
    pub const fn exception_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.exception_dates
    }

    fn spans_day(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    fn is_excepted(&self, at: NaiveDateTime) -> bool {
        self.exception_dates.contains(&at.date())
    }
}

/// ## Summary
/// Reports whether `event` occurs on the calendar day `date`.
///
/// An exception date always yields `false`. Otherwise the event occurs if
/// `date` lies within its own span, or if its recurrence pattern produces an
/// occurrence during that day.
///
/// ## Errors
/// Propagates generator errors; none arise for a well-formed event.
///
/// ## Side Effects
/// None - pure function.
pub fn occurs_on_date(event: &Event, date: NaiveDate) -> RecurrenceResult<bool> {
    if event.exception_dates.contains(&date) {
        return Ok(false);
    }
    if event.spans_day(date) {
        return Ok(true);
    }
    let Some(pattern) = &event.recurrence else {
        return Ok(false);
    };

    let day_start = date.and_time(NaiveTime::MIN);
    let day_end = date
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
    let occurrences = generate(pattern, event.start, day_start, day_end)?;
    Ok(!occurrences.is_empty())
}

/// ## Summary
/// Lists the instants at which `event` occurs within `[range_start, range_end)`.
///
/// The event's own instance is reported at its start instant when that instant
/// lies in the range. An instance already under way at `range_start` belongs to
/// the earlier range, so adjacent ranges never report the same instance;
/// [`occurs_on_date`] still covers every day of the span. Recurring
/// occurrences come from [`generate`]. Anything on an exception day is
/// dropped, and the result is ascending without duplicates.
///
/// ## Errors
/// Returns [`RecurrenceError::InvalidWindow`] if `range_end` precedes `range_start`.
///
/// ## Side Effects
/// None - pure function.
pub fn occurrences_in_range(
    event: &Event,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> RecurrenceResult<Vec<NaiveDateTime>> {
    if range_end < range_start {
        return Err(RecurrenceError::InvalidWindow {
            start: range_start,
            end: range_end,
        });
    }

    let mut occurrences = match &event.recurrence {
        Some(pattern) => generate(pattern, event.start, range_start, range_end)?,
        None => Vec::new(),
    };
    if (range_start..range_end).contains(&event.start) {
        occurrences.push(event.start);
    }

    occurrences.retain(|at| !event.is_excepted(*at));
    occurrences.sort_unstable();
    occurrences.dedup();
    Ok(occurrences)
}

/// Unvalidated wire shape of an event; `end` defaults to `start`.
#[derive(Deserialize)]
struct EventRecord {
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    #[serde(default)]
    recurrence: Option<RecurrencePattern>,
    #[serde(default)]
    exception_dates: BTreeSet<NaiveDate>,
}

impl TryFrom<EventRecord> for Event {
    type Error = RecurrenceError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let mut event = Self::new(record.start, record.end.unwrap_or(record.start))?
            .with_exception_dates(record.exception_dates);
        event.recurrence = record.recurrence;
        Ok(event)
    }
}
