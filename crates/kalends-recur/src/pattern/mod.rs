//! Recurrence pattern value types.
//!
//! A [`RecurrencePattern`] is immutable once built. Every constructor path
//! (the builder, deserialization and RRULE text parsing) validates through
//! [`RecurrencePatternBuilder::build`], so a pattern held by the generator is
//! always well formed.

mod rrule;

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the RFC 5545 `FREQ` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week, ordered by ISO 8601 number (Monday = 1 … Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            "SU" => Self::Sunday,
            _ => return None,
        })
    }

    /// ISO 8601 weekday number, 1 (Monday) through 7 (Sunday).
    #[must_use]
    pub const fn iso_number(self) -> u8 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
            Self::Sunday => 7,
        }
    }

    /// Returns the weekday for an ISO 8601 number, if it is within 1..=7.
    #[must_use]
    pub const fn from_iso_number(number: u8) -> Option<Self> {
        Some(match number {
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            6 => Self::Saturday,
            7 => Self::Sunday,
            _ => return None,
        })
    }

    /// Days since the Monday that starts this weekday's ISO week.
    #[must_use]
    pub const fn days_from_monday(self) -> u8 {
        self.iso_number() - 1
    }

    /// Returns all weekdays in ISO order (Monday through Sunday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(wd: Weekday) -> Self {
        match wd {
            Weekday::Monday => Self::Mon,
            Weekday::Tuesday => Self::Tue,
            Weekday::Wednesday => Self::Wed,
            Weekday::Thursday => Self::Thu,
            Weekday::Friday => Self::Fri,
            Weekday::Saturday => Self::Sat,
            Weekday::Sunday => Self::Sun,
        }
    }
}

/// How a series terminates. Exactly one variant is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceEnd {
    /// The series repeats forever.
    #[default]
    Never,
    /// The series stops at or before this instant (inclusive).
    Until(NaiveDateTime),
    /// The series stops after this many occurrences, counted from the series
    /// start regardless of any query window.
    Count(u32),
}

/// An immutable recurrence rule.
///
/// The series anchor (the owning event's start) is not part of the pattern;
/// it is supplied to the generator alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PatternRecord")]
pub struct RecurrencePattern {
    frequency: Frequency,
    interval: NonZeroU32,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    by_weekday: BTreeSet<Weekday>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    by_month_day: BTreeSet<u8>,
    end: RecurrenceEnd,
}

impl RecurrencePattern {
    /// Starts building a pattern with the given frequency, interval 1 and no end.
    #[must_use]
    pub fn builder(frequency: Frequency) -> RecurrencePatternBuilder {
        RecurrencePatternBuilder::new(frequency)
    }

    /// Every day, forever.
    #[must_use]
    pub fn daily() -> Self {
        Self::unfiltered(Frequency::Daily)
    }

    /// Every week on the anchor's weekday, forever.
    #[must_use]
    pub fn weekly() -> Self {
        Self::unfiltered(Frequency::Weekly)
    }

    /// Every month on the anchor's day of month, forever.
    #[must_use]
    pub fn monthly() -> Self {
        Self::unfiltered(Frequency::Monthly)
    }

    /// Every year on the anchor's month and day, forever.
    #[must_use]
    pub fn yearly() -> Self {
        Self::unfiltered(Frequency::Yearly)
    }

    fn unfiltered(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: NonZeroU32::MIN,
            by_weekday: BTreeSet::new(),
            by_month_day: BTreeSet::new(),
            end: RecurrenceEnd::Never,
        }
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval.get()
    }

    /// Weekday filter, ascending ISO order. Only consulted for weekly patterns.
    #[must_use]
    pub const fn by_weekday(&self) -> &BTreeSet<Weekday> {
        &self.by_weekday
    }

    /// Month-day filter, ascending. Only consulted for monthly and yearly patterns.
    #[must_use]
    pub const fn by_month_day(&self) -> &BTreeSet<u8> {
        &self.by_month_day
    }

    #[must_use]
    pub const fn end(&self) -> RecurrenceEnd {
        self.end
    }

    /// ## Summary
    /// Returns a copy of this pattern with a different termination rule.
    ///
    /// ## Errors
    /// Returns [`RecurrenceError::InvalidUntil`] if an `UNTIL` instant carries
    /// sub-second precision.
    pub fn with_end(&self, end: RecurrenceEnd) -> RecurrenceResult<Self> {
        self.to_builder().end(end).build()
    }

    /// ## Summary
    /// Returns a copy of this pattern with a different interval.
    ///
    /// ## Errors
    /// Returns [`RecurrenceError::InvalidInterval`] if `interval` is zero.
    pub fn with_interval(&self, interval: u32) -> RecurrenceResult<Self> {
        self.to_builder().interval(interval).build()
    }

    /// Returns a builder pre-populated with this pattern's values.
    #[must_use]
    pub fn to_builder(&self) -> RecurrencePatternBuilder {
        RecurrencePatternBuilder {
            frequency: self.frequency,
            interval: self.interval.get(),
            by_weekday: self.by_weekday.clone(),
            by_month_day: self.by_month_day.clone(),
            end: self.end,
        }
    }
}

/// Builder for [`RecurrencePattern`].
#[derive(Debug, Clone)]
pub struct RecurrencePatternBuilder {
    frequency: Frequency,
    interval: u32,
    by_weekday: BTreeSet<Weekday>,
    by_month_day: BTreeSet<u8>,
    end: RecurrenceEnd,
}

impl RecurrencePatternBuilder {
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_weekday: BTreeSet::new(),
            by_month_day: BTreeSet::new(),
            end: RecurrenceEnd::Never,
        }
    }

    #[must_use]
    pub const fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Adds weekdays to the weekday filter.
    #[must_use]
    pub fn by_weekday(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.by_weekday.extend(weekdays);
        self
    }

    /// Adds days (1-31) to the month-day filter.
    #[must_use]
    pub fn by_month_day(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.by_month_day.extend(days);
        self
    }

    #[must_use]
    pub const fn end(mut self, end: RecurrenceEnd) -> Self {
        self.end = end;
        self
    }

    #[must_use]
    pub const fn count(self, count: u32) -> Self {
        self.end(RecurrenceEnd::Count(count))
    }

    #[must_use]
    pub const fn until(self, until: NaiveDateTime) -> Self {
        self.end(RecurrenceEnd::Until(until))
    }

    /// ## Summary
    /// Validates and freezes the pattern.
    ///
    /// ## Errors
    /// - [`RecurrenceError::InvalidInterval`] if the interval is zero.
    /// - [`RecurrenceError::InvalidMonthDay`] if a month day is outside 1..=31.
    /// - [`RecurrenceError::InvalidUntil`] if `UNTIL` has a fractional second,
    ///   which the `RRULE` text form cannot carry.
    pub fn build(self) -> RecurrenceResult<RecurrencePattern> {
        let interval =
            NonZeroU32::new(self.interval).ok_or(RecurrenceError::InvalidInterval(self.interval))?;

        if let Some(&day) = self.by_month_day.iter().find(|d| !(1..=31).contains(*d)) {
            return Err(RecurrenceError::InvalidMonthDay(u32::from(day)));
        }
        if let RecurrenceEnd::Until(until) = self.end
            && until.nanosecond() != 0
        {
            return Err(RecurrenceError::InvalidUntil(until));
        }

        Ok(RecurrencePattern {
            frequency: self.frequency,
            interval,
            by_weekday: self.by_weekday,
            by_month_day: self.by_month_day,
            end: self.end,
        })
    }
}

/// Unvalidated wire shape of a pattern.
#[derive(Deserialize)]
struct PatternRecord {
    frequency: Frequency,
    #[serde(default = "default_interval")]
    interval: u32,
    #[serde(default)]
    by_weekday: BTreeSet<Weekday>,
    #[serde(default)]
    by_month_day: BTreeSet<u8>,
    #[serde(default)]
    end: RecurrenceEnd,
}

const fn default_interval() -> u32 {
    1
}

impl TryFrom<PatternRecord> for RecurrencePattern {
    type Error = RecurrenceError;

    fn try_from(record: PatternRecord) -> Result<Self, Self::Error> {
        RecurrencePatternBuilder::new(record.frequency)
            .interval(record.interval)
            .by_weekday(record.by_weekday)
            .by_month_day(record.by_month_day)
            .end(record.end)
            .build()
    }
}
