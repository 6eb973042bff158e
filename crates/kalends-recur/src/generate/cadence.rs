//! Period arithmetic for each frequency.
//!
//! A series is a sequence of *periods* (a run of `interval` days, an included
//! ISO week, or an included month) numbered from 0 at the anchor. Each period
//! yields its candidate dates in ascending order. The anchor is always
//! candidate 0 of period 0, whether or not the filters select its own day.
//! Candidates before the anchor belong to no series and carry no index.

use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::{
    MONTH_CYCLE, ceil_div, date_from_parts, days_in_month, gcd, month_index, periodic_sum,
    split_month_index,
};
use crate::pattern::{Frequency, RecurrencePattern, Weekday};

#[derive(Debug, Clone)]
pub(super) enum Cadence {
    Daily {
        anchor: NaiveDate,
        step: u64,
    },
    Weekly {
        anchor: NaiveDate,
        week_start: NaiveDate,
        step: u64,
        offsets: Vec<u8>,
        first_period_count: u64,
    },
    /// Monthly and yearly series; a yearly step is twelve months.
    Monthly {
        anchor: NaiveDate,
        anchor_month: i64,
        step: u64,
        days: MonthDays,
        first_period_count: u64,
    },
}

/// Sorted day-of-month filter with precomputed counts per month length.
#[derive(Debug, Clone)]
pub(super) struct MonthDays {
    days: Vec<u8>,
    /// `by_length[n]` counts the days that exist in a month of `28 + n` days.
    by_length: [u64; 4],
}

impl MonthDays {
    fn new(days: Vec<u8>) -> Self {
        let mut by_length = [0; 4];
        for (slot, length) in by_length.iter_mut().zip(28u8..=31) {
            *slot = days.iter().filter(|&&d| d <= length).count() as u64;
        }
        Self { days, by_length }
    }

    fn count_in(&self, year: i64, month: u32) -> u64 {
        let length = days_in_month(year, month);
        self.by_length[(length - 28) as usize]
    }
}

impl Cadence {
    pub(super) fn new(pattern: &RecurrencePattern, anchor: NaiveDate) -> Self {
        let interval = u64::from(pattern.interval());
        match pattern.frequency() {
            Frequency::Daily => Self::Daily {
                anchor,
                step: interval,
            },
            Frequency::Weekly => Self::weekly(pattern, anchor, interval),
            Frequency::Monthly => Self::monthly(pattern, anchor, interval),
            Frequency::Yearly => Self::monthly(pattern, anchor, interval.saturating_mul(12)),
        }
    }

    fn weekly(pattern: &RecurrencePattern, anchor: NaiveDate, step: u64) -> Self {
        let anchor_weekday = Weekday::from(anchor.weekday());
        let offsets: Vec<u8> = if pattern.by_weekday().is_empty() {
            vec![anchor_weekday.days_from_monday()]
        } else {
            pattern
                .by_weekday()
                .iter()
                .map(|wd| wd.days_from_monday())
                .collect()
        };
        let anchor_offset = anchor_weekday.days_from_monday();
        let first_period_count = 1 + offsets.iter().filter(|&&o| o > anchor_offset).count() as u64;
        let week_start = anchor
            .checked_sub_days(Days::new(u64::from(anchor_offset)))
            .unwrap_or(anchor);

        Self::Weekly {
            anchor,
            week_start,
            step,
            offsets,
            first_period_count,
        }
    }

    fn monthly(pattern: &RecurrencePattern, anchor: NaiveDate, step: u64) -> Self {
        let days: Vec<u8> = if pattern.by_month_day().is_empty() {
            #[expect(clippy::cast_possible_truncation, reason = "day of month is at most 31")]
            let day = anchor.day() as u8;
            vec![day]
        } else {
            pattern.by_month_day().iter().copied().collect()
        };
        let anchor_length = days_in_month(i64::from(anchor.year()), anchor.month());
        let first_period_count = 1 + days
            .iter()
            .filter(|&&d| u32::from(d) > anchor.day() && u32::from(d) <= anchor_length)
            .count() as u64;

        Self::Monthly {
            anchor,
            anchor_month: month_index(anchor),
            step,
            days: MonthDays::new(days),
            first_period_count,
        }
    }

    /// The first period that can contain a candidate on or after `date`.
    /// `date` must not precede the anchor.
    pub(super) fn first_period_on_or_after(&self, date: NaiveDate) -> u64 {
        match self {
            Self::Daily { anchor, step } => ceil_div(days_between(*anchor, date), *step),
            Self::Weekly {
                week_start, step, ..
            } => ceil_div(days_between(*week_start, date) / 7, *step),
            Self::Monthly {
                anchor_month, step, ..
            } => {
                let months = u64::try_from(month_index(date) - anchor_month).unwrap_or(0);
                ceil_div(months, *step)
            }
        }
    }

    /// Number of series occurrences in periods `0..period`, in closed form.
    pub(super) fn occurrences_before(&self, period: u64) -> u64 {
        if period == 0 {
            return 0;
        }
        match self {
            Self::Daily { .. } => period,
            Self::Weekly {
                offsets,
                first_period_count,
                ..
            } => first_period_count.saturating_add((period - 1).saturating_mul(offsets.len() as u64)),
            Self::Monthly {
                anchor_month,
                step,
                days,
                first_period_count,
                ..
            } => {
                let cycle = MONTH_CYCLE / gcd(*step % MONTH_CYCLE, MONTH_CYCLE);
                let later = periodic_sum(period - 1, cycle, |k| {
                    let offset = ((k % cycle) * (*step % MONTH_CYCLE)) % MONTH_CYCLE;
                    #[expect(clippy::cast_possible_wrap, reason = "offset is below MONTH_CYCLE")]
                    let (year, month) = split_month_index(anchor_month + offset as i64);
                    days.count_in(year, month)
                });
                first_period_count.saturating_add(later)
            }
        }
    }

    /// First calendar day covered by `period`, or `None` past chrono's range.
    pub(super) fn period_start(&self, period: u64) -> Option<NaiveDate> {
        match self {
            Self::Daily { anchor, step } => anchor.checked_add_days(Days::new(period.checked_mul(*step)?)),
            Self::Weekly {
                week_start, step, ..
            } => week_start.checked_add_days(Days::new(period.checked_mul(*step)?.checked_mul(7)?)),
            Self::Monthly {
                anchor_month, step, ..
            } => {
                let (year, month) = period_month(*anchor_month, *step, period)?;
                date_from_parts(year, month, 1)
            }
        }
    }

    /// Candidate dates of `period` in ascending order; `start` is `period_start(period)`.
    pub(super) fn dates_in(&self, period: u64, start: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = self.filtered_dates(period, start);
        if period == 0
            && let Err(position) = dates.binary_search(&self.anchor())
        {
            dates.insert(position, self.anchor());
        }
        dates
    }

    fn anchor(&self) -> NaiveDate {
        match self {
            Self::Daily { anchor, .. } | Self::Weekly { anchor, .. } | Self::Monthly { anchor, .. } => {
                *anchor
            }
        }
    }

    fn filtered_dates(&self, period: u64, start: NaiveDate) -> Vec<NaiveDate> {
        match self {
            Self::Daily { .. } => vec![start],
            Self::Weekly { offsets, .. } => offsets
                .iter()
                .filter_map(|&o| start.checked_add_days(Days::new(u64::from(o))))
                .collect(),
            Self::Monthly {
                anchor_month,
                step,
                days,
                ..
            } => {
                let Some((year, month)) = period_month(*anchor_month, *step, period) else {
                    return Vec::new();
                };
                days.days
                    .iter()
                    .filter_map(|&d| date_from_parts(year, month, u32::from(d)))
                    .collect()
            }
        }
    }
}

/// `(year, month)` of a monthly period.
fn period_month(anchor_month: i64, step: u64, period: u64) -> Option<(i64, u32)> {
    let offset = i64::try_from(period.checked_mul(step)?).ok()?;
    Some(split_month_index(anchor_month.checked_add(offset)?))
}

fn days_between(from: NaiveDate, to: NaiveDate) -> u64 {
    u64::try_from((to - from).num_days()).unwrap_or(0)
}
