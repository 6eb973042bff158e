//! RFC 5545 `RRULE` text form for the supported pattern subset.
//!
//! Supported parts: `FREQ`, `INTERVAL`, `BYDAY` (plain weekdays), `BYMONTHDAY`
//! (positive days), `COUNT`, `UNTIL` and `WKST=MO`. `UNTIL` is written as a
//! floating date-time; patterns never hold a fractional-second `UNTIL`, so the
//! text form round-trips.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Frequency, RecurrenceEnd, RecurrencePattern, RecurrencePatternBuilder, Weekday};
use crate::error::{RecurrenceError, RecurrenceResult};

const UNTIL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UNTIL_DATE_FORMAT: &str = "%Y%m%d";

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("FREQ={}", self.frequency)];

        if self.interval() != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        match self.end {
            RecurrenceEnd::Never => {}
            RecurrenceEnd::Until(until) => {
                parts.push(format!("UNTIL={}", until.format(UNTIL_FORMAT)));
            }
            RecurrenceEnd::Count(count) => parts.push(format!("COUNT={count}")),
        }

        if !self.by_weekday.is_empty() {
            let s: Vec<_> = self.by_weekday.iter().map(ToString::to_string).collect();
            parts.push(format!("BYDAY={}", s.join(",")));
        }

        if !self.by_month_day.is_empty() {
            let s: Vec<_> = self.by_month_day.iter().map(ToString::to_string).collect();
            parts.push(format!("BYMONTHDAY={}", s.join(",")));
        }

        write!(f, "{}", parts.join(";"))
    }
}

impl FromStr for RecurrencePattern {
    type Err = RecurrenceError;

    /// Parses an `RRULE` value, with or without the `RRULE:` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim();
        let body = body
            .strip_prefix("RRULE:")
            .or_else(|| body.strip_prefix("rrule:"))
            .unwrap_or(body);

        let mut draft = RuleDraft::default();
        for part in body.split(';').filter(|part| !part.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RecurrenceError::ParseError(format!("missing '=' in {part:?}")))?;
            draft.apply(key, value)?;
        }
        draft.finish()
    }
}

#[derive(Default)]
struct RuleDraft {
    frequency: Option<Frequency>,
    interval: Option<u32>,
    end: Option<RecurrenceEnd>,
    by_weekday: Vec<Weekday>,
    by_month_day: Vec<u8>,
}

impl RuleDraft {
    fn apply(&mut self, key: &str, value: &str) -> RecurrenceResult<()> {
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                self.frequency = Some(Frequency::parse(value).ok_or_else(|| {
                    RecurrenceError::Unsupported(format!("FREQ={value}"))
                })?);
            }
            "INTERVAL" => self.interval = Some(parse_number(key, value)?),
            "COUNT" => self.set_end(RecurrenceEnd::Count(parse_number(key, value)?))?,
            "UNTIL" => self.set_end(RecurrenceEnd::Until(parse_until(value)?))?,
            "WKST" => {
                if Weekday::parse(value) != Some(Weekday::Monday) {
                    return Err(RecurrenceError::Unsupported(format!("WKST={value}")));
                }
            }
            "BYDAY" => {
                for item in value.split(',') {
                    let weekday = Weekday::parse(item.trim()).ok_or_else(|| {
                        RecurrenceError::Unsupported(format!("BYDAY={item}"))
                    })?;
                    self.by_weekday.push(weekday);
                }
            }
            "BYMONTHDAY" => {
                for item in value.split(',') {
                    let day: i32 = parse_number("BYMONTHDAY", item)?;
                    if day < 0 {
                        return Err(RecurrenceError::Unsupported(format!("BYMONTHDAY={day}")));
                    }
                    let day = u8::try_from(day)
                        .map_err(|_err| RecurrenceError::InvalidMonthDay(day.unsigned_abs()))?;
                    self.by_month_day.push(day);
                }
            }
            other => return Err(RecurrenceError::Unsupported(other.to_string())),
        }
        Ok(())
    }

    fn set_end(&mut self, end: RecurrenceEnd) -> RecurrenceResult<()> {
        if self.end.is_some() {
            return Err(RecurrenceError::ParseError(
                "COUNT and UNTIL are mutually exclusive".to_string(),
            ));
        }
        self.end = Some(end);
        Ok(())
    }

    fn finish(self) -> RecurrenceResult<RecurrencePattern> {
        let frequency = self
            .frequency
            .ok_or_else(|| RecurrenceError::ParseError("missing FREQ".to_string()))?;

        RecurrencePatternBuilder::new(frequency)
            .interval(self.interval.unwrap_or(1))
            .by_weekday(self.by_weekday)
            .by_month_day(self.by_month_day)
            .end(self.end.unwrap_or_default())
            .build()
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> RecurrenceResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_err| RecurrenceError::ParseError(format!("invalid {key} value {value:?}")))
}

/// `UNTIL` as a floating date-time, a UTC-suffixed date-time read as wall
/// clock, or a bare date that is inclusive through the end of that day.
fn parse_until(value: &str) -> RecurrenceResult<NaiveDateTime> {
    let value = value.trim();
    let value = value.strip_suffix('Z').unwrap_or(value);

    if value.contains('T') {
        return NaiveDateTime::parse_from_str(value, UNTIL_FORMAT)
            .map_err(|err| RecurrenceError::ParseError(format!("invalid UNTIL {value:?}: {err}")));
    }

    let date = NaiveDate::parse_from_str(value, UNTIL_DATE_FORMAT)
        .map_err(|err| RecurrenceError::ParseError(format!("invalid UNTIL {value:?}: {err}")))?;
    Ok(date.and_time(end_of_day()))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
