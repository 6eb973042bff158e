//! Plain-text rendering of agenda listings.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Days, NaiveDate};
use kalends_core::config::{DisplayConfig, WeekStart};

use crate::agenda::AgendaItem;
use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const WEEK_HEADER_FORMAT: &str = "%a %Y-%m-%d";

/// ## Summary
/// Renders a range listing, one `date time  name` line per occurrence, with a
/// header line whenever a new week (per `display.week_start`) begins.
///
/// ## Errors
/// Returns [`AppError::InvalidTimeFormat`] if `display.time_format` is not a
/// valid strftime pattern.
pub fn render_range(items: &[AgendaItem<'_>], display: &DisplayConfig) -> AppResult<String> {
    check_time_format(&display.time_format)?;
    let fmt_error = |_err: std::fmt::Error| AppError::InvalidTimeFormat(display.time_format.clone());

    let mut out = String::new();
    let mut current_week = None;
    for item in items {
        let week = week_containing(item.at.date(), display.week_start);
        if current_week != Some(week) {
            if current_week.is_some() {
                out.push('\n');
            }
            writeln!(out, "Week of {}", week.format(WEEK_HEADER_FORMAT)).map_err(fmt_error)?;
            current_week = Some(week);
        }
        writeln!(
            out,
            "{} {}  {}",
            item.at.format(DATE_FORMAT),
            item.at.format(&display.time_format),
            item.name
        )
        .map_err(fmt_error)?;
    }
    Ok(out)
}

/// Renders the names of the events occurring on one day, one per line.
#[must_use]
pub fn render_day(names: &[&str]) -> String {
    names.iter().fold(String::new(), |mut out, name| {
        out.push_str(name);
        out.push('\n');
        out
    })
}

fn check_time_format(format: &str) -> AppResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(AppError::InvalidTimeFormat(format.to_string()));
    }
    Ok(())
}

/// First day of the display week containing `date`.
fn week_containing(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let first = match week_start {
        WeekStart::Monday => chrono::Weekday::Mon,
        WeekStart::Saturday => chrono::Weekday::Sat,
        WeekStart::Sunday => chrono::Weekday::Sun,
    };
    let back = date.weekday().days_since(first);
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}
