//! Agenda files: a JSON array of named events resolved through the engine.
//!
//! ```json
//! [
//!   { "name": "Standup", "start": "2024-01-01T09:00:00", "end": "2024-01-01T09:15:00",
//!     "recurrence": "FREQ=WEEKLY;BYDAY=MO,WE,FR", "exceptions": ["2024-01-03"] },
//!   { "name": "Rent", "start": "2024-01-01T00:00:00",
//!     "recurrence": { "frequency": "monthly", "by_month_day": [1] } }
//! ]
//! ```

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use kalends_recur::{Event, RecurrencePattern, occurrences_in_range, occurs_on_date};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Wire shape of one agenda entry; `end` defaults to `start`.
#[derive(Debug, Deserialize)]
struct AgendaEntry {
    name: String,
    start: NaiveDateTime,
    #[serde(default)]
    end: Option<NaiveDateTime>,
    #[serde(default)]
    recurrence: Option<RecurrenceSource>,
    #[serde(default)]
    exceptions: Vec<NaiveDate>,
}

/// A recurrence written either as `RRULE` text or as a structured pattern.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecurrenceSource {
    Rule(String),
    Pattern(serde_json::Value),
}

impl RecurrenceSource {
    fn into_pattern(self) -> Result<RecurrencePattern, String> {
        match self {
            Self::Rule(text) => text
                .parse::<RecurrencePattern>()
                .map_err(|err| err.to_string()),
            Self::Pattern(value) => serde_json::from_value(value).map_err(|err| err.to_string()),
        }
    }
}

impl TryFrom<AgendaEntry> for NamedEvent {
    type Error = AppError;

    fn try_from(entry: AgendaEntry) -> AppResult<Self> {
        let name = entry.name;
        let invalid = |reason: String| AppError::InvalidEvent {
            name: name.clone(),
            reason,
        };

        let mut event = Event::new(entry.start, entry.end.unwrap_or(entry.start))
            .map_err(|err| invalid(err.to_string()))?
            .with_exception_dates(entry.exceptions);
        if let Some(source) = entry.recurrence {
            event = event.with_recurrence(source.into_pattern().map_err(invalid)?);
        }

        Ok(Self { name, event })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEvent {
    pub name: String,
    pub event: Event,
}

/// One line of a range listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaItem<'a> {
    pub at: NaiveDateTime,
    pub name: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct Agenda {
    events: Vec<NamedEvent>,
}

impl Agenda {
    /// ## Summary
    /// Parses an agenda from JSON text.
    ///
    /// ## Errors
    /// Returns [`AppError::Json`] for malformed JSON and [`AppError::InvalidEvent`]
    /// for an entry whose span or recurrence is invalid.
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        let entries: Vec<AgendaEntry> = serde_json::from_str(text)?;
        let events = entries
            .into_iter()
            .map(NamedEvent::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { events })
    }

    /// ## Summary
    /// Reads and parses the agenda file at `path`.
    ///
    /// ## Errors
    /// Returns [`AppError::Io`] if the file cannot be read, otherwise as
    /// [`Agenda::from_json_str`].
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let agenda = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), events = agenda.events.len(), "Agenda loaded");
        Ok(agenda)
    }

    #[must_use]
    pub fn events(&self) -> &[NamedEvent] {
        &self.events
    }

    /// ## Summary
    /// Lists every occurrence of every event within `[from, to)`, ascending.
    /// Occurrences at the same instant keep the agenda's order.
    ///
    /// ## Errors
    /// Returns [`AppError::RecurrenceError`] if `to` precedes `from`.
    pub fn occurrences(&self, from: NaiveDateTime, to: NaiveDateTime) -> AppResult<Vec<AgendaItem<'_>>> {
        let mut items = Vec::new();
        for named in &self.events {
            let occurrences = occurrences_in_range(&named.event, from, to)?;
            items.extend(occurrences.into_iter().map(|at| AgendaItem {
                at,
                name: named.name.as_str(),
            }));
        }
        items.sort_by_key(|item| item.at);
        Ok(items)
    }

    /// ## Summary
    /// Names of the events that occur on `date`, in agenda order.
    ///
    /// ## Errors
    /// Propagates resolver errors; none arise for a parsed agenda.
    pub fn events_on(&self, date: NaiveDate) -> AppResult<Vec<&str>> {
        let mut names = Vec::new();
        for named in &self.events {
            if occurs_on_date(&named.event, date)? {
                names.push(named.name.as_str());
            }
        }
        Ok(names)
    }
}
