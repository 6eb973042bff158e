//! Command-line arguments for the `kalends` binary.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use kalends_core::config::Settings;

use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const INSTANT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Parser)]
#[command(name = "kalends")]
#[command(about = "Lists occurrences of recurring events")]
#[command(version)]
pub struct Args {
    /// Start of the listed range (inclusive), as a date or date-time
    #[arg(long, value_parser = parse_instant, requires = "to")]
    pub from: Option<NaiveDateTime>,

    /// End of the listed range (exclusive), as a date or date-time
    #[arg(long, value_parser = parse_instant, requires = "from")]
    pub to: Option<NaiveDateTime>,

    /// List the events occurring on a single day instead of a range
    #[arg(long, value_parser = parse_date, conflicts_with_all = ["from", "to"])]
    pub on: Option<NaiveDate>,

    /// Agenda file path (overrides config)
    #[arg(long)]
    pub agenda: Option<PathBuf>,
}

/// What the user asked to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Range {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    Day(NaiveDate),
}

impl Args {
    /// ## Summary
    /// Resolves the arguments into a query. No window is ever inferred.
    ///
    /// ## Errors
    /// Returns [`AppError::InvalidArguments`] if neither a range nor a day was given,
    /// or if the range ends before it starts.
    pub fn query(&self) -> AppResult<Query> {
        match (self.on, self.from, self.to) {
            (Some(day), _, _) => Ok(Query::Day(day)),
            (None, Some(from), Some(to)) if to < from => Err(AppError::InvalidArguments(format!(
                "--to {to} is before --from {from}"
            ))),
            (None, Some(from), Some(to)) => Ok(Query::Range { from, to }),
            _ => Err(AppError::InvalidArguments(
                "pass either --from and --to, or --on".to_string(),
            )),
        }
    }

    #[must_use]
    pub fn agenda_path(&self, settings: &Settings) -> PathBuf {
        self.agenda
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.agenda.path))
    }
}

/// Accepts a bare date (midnight) or a date-time with minute or second precision.
fn parse_instant(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    INSTANT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS], got {value:?}"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| format!("expected YYYY-MM-DD, got {value:?}: {err}"))
}
