//! Occurrence generation over a half-open query window.

mod cadence;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{RecurrenceError, RecurrenceResult};
use crate::pattern::{RecurrenceEnd, RecurrencePattern};
use cadence::Cadence;

/// ## Summary
/// Expands `pattern`, anchored at `series_start`, into the occurrences that
/// fall within `[window_start, window_end)`.
///
/// The result is strictly ascending, every instant carries `series_start`'s
/// time of day, and `COUNT`/`UNTIL` are applied against the whole series
/// rather than the window. The first candidate period and its global index
/// are located arithmetically, so the cost depends on the window, not on how
/// far the window lies from the series start.
///
/// `series_start` itself is always occurrence 0, even when a weekly or monthly
/// filter does not select its weekday or day; later occurrences are the dates
/// the filters select. Nothing before `series_start` is an occurrence.
///
/// ## Errors
///
/// Returns [`RecurrenceError::InvalidWindow`] if `window_end` precedes
/// `window_start`. An `UNTIL` before the series start or `COUNT=0` is not an
/// error and yields an empty sequence.
///
/// ## Side Effects
///
/// None - this is a pure function.
pub fn generate(
    pattern: &RecurrencePattern,
    series_start: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> RecurrenceResult<Vec<NaiveDateTime>> {
    if window_end < window_start {
        return Err(RecurrenceError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }

    let end = pattern.end();
    let lower = window_start.max(series_start);
    let mut occurrences = Vec::new();

    if lower >= window_end {
        return Ok(occurrences);
    }
    match end {
        RecurrenceEnd::Count(0) => return Ok(occurrences),
        RecurrenceEnd::Until(until) if until < lower => return Ok(occurrences),
        RecurrenceEnd::Never | RecurrenceEnd::Count(_) | RecurrenceEnd::Until(_) => {}
    }

    let time = series_start.time();
    let anchor = series_start.date();
    let Some(first_date) = first_date_at_or_after(lower, time) else {
        return Ok(occurrences);
    };
    let last_date = match end {
        RecurrenceEnd::Until(until) => window_end.date().min(until.date()),
        RecurrenceEnd::Never | RecurrenceEnd::Count(_) => window_end.date(),
    };

    let cadence = Cadence::new(pattern, anchor);
    let mut period = cadence.first_period_on_or_after(first_date);
    let mut index = match end {
        RecurrenceEnd::Count(_) => cadence.occurrences_before(period),
        RecurrenceEnd::Never | RecurrenceEnd::Until(_) => 0,
    };

    tracing::trace!(
        frequency = %pattern.frequency(),
        interval = pattern.interval(),
        first_period = period,
        first_index = index,
        "Seeking occurrence window"
    );

    'periods: loop {
        let Some(start) = cadence.period_start(period) else {
            break;
        };
        if start > last_date {
            break;
        }

        for date in cadence.dates_in(period, start) {
            if date < anchor {
                continue;
            }
            let position = index;
            index = index.saturating_add(1);
            if date < first_date {
                continue;
            }

            let at = date.and_time(time);
            let past_end = match end {
                RecurrenceEnd::Never => false,
                RecurrenceEnd::Count(count) => position >= u64::from(count),
                RecurrenceEnd::Until(until) => at > until,
            };
            if past_end || at >= window_end {
                tracing::trace!(position, stop = %at, "Occurrence window exhausted");
                break 'periods;
            }
            occurrences.push(at);
        }

        period += 1;
    }

    Ok(occurrences)
}

/// Earliest date whose `time` instant is not before `lower`.
fn first_date_at_or_after(lower: NaiveDateTime, time: NaiveTime) -> Option<NaiveDate> {
    if lower.time() <= time {
        Some(lower.date())
    } else {
        lower.date().succ_opt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Frequency, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        at(y, m, d, 0, 0)
    }

    fn dates(occurrences: &[NaiveDateTime]) -> Vec<NaiveDate> {
        occurrences.iter().map(NaiveDateTime::date).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_count() {
        let pattern = RecurrencePattern::daily().with_end(RecurrenceEnd::Count(5)).unwrap();
        let out = generate(&pattern, day(2024, 1, 1), day(2024, 1, 1), day(2024, 1, 31)).unwrap();

        assert_eq!(
            dates(&out),
            (1..=5).map(|d| ymd(2024, 1, d)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_daily_interval_seeks_into_window() {
        let pattern = RecurrencePattern::daily().with_interval(3).unwrap();
        let out = generate(&pattern, at(2024, 1, 1, 9, 30), day(2024, 1, 10), day(2024, 1, 17)).unwrap();

        assert_eq!(
            out,
            vec![at(2024, 1, 10, 9, 30), at(2024, 1, 13, 9, 30), at(2024, 1, 16, 9, 30)]
        );
    }

    #[test]
    fn test_weekly_by_weekday() {
        let pattern = RecurrencePattern::builder(Frequency::Weekly)
            .by_weekday([Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
            .count(6)
            .build()
            .unwrap();
        let out = generate(&pattern, day(2024, 1, 1), day(2024, 1, 1), day(2024, 1, 31)).unwrap();

        assert_eq!(
            dates(&out),
            vec![
                ymd(2024, 1, 1),
                ymd(2024, 1, 3),
                ymd(2024, 1, 5),
                ymd(2024, 1, 8),
                ymd(2024, 1, 10),
                ymd(2024, 1, 12),
            ]
        );
    }

    #[test]
    fn test_weekly_excludes_days_before_anchor_in_first_week() {
        let pattern = RecurrencePattern::builder(Frequency::Weekly)
            .by_weekday([Weekday::Monday, Weekday::Thursday])
            .build()
            .unwrap();
        // Wednesday anchor: the Monday of the same week is not part of the series.
        let out = generate(&pattern, day(2024, 1, 3), day(2024, 1, 1), day(2024, 1, 9)).unwrap();

        assert_eq!(dates(&out), vec![ymd(2024, 1, 3), ymd(2024, 1, 4), ymd(2024, 1, 8)]);
    }

    #[test]
    fn test_biweekly_count_in_later_window() {
        let pattern = RecurrencePattern::builder(Frequency::Weekly)
            .interval(2)
            .by_weekday([Weekday::Tuesday, Weekday::Thursday])
            .count(5)
            .build()
            .unwrap();
        // Series: Jan 2, Jan 4, Jan 16, Jan 18, Jan 30.
        let out = generate(&pattern, day(2024, 1, 2), day(2024, 1, 17), day(2024, 3, 1)).unwrap();

        assert_eq!(dates(&out), vec![ymd(2024, 1, 18), ymd(2024, 1, 30)]);
    }

    #[test]
    fn test_monthly_anchor_day() {
        let pattern = RecurrencePattern::monthly().with_end(RecurrenceEnd::Count(3)).unwrap();
        let out = generate(&pattern, day(2024, 1, 15), day(2024, 1, 1), day(2024, 12, 31)).unwrap();

        assert_eq!(
            dates(&out),
            vec![ymd(2024, 1, 15), ymd(2024, 2, 15), ymd(2024, 3, 15)]
        );
    }

    #[test]
    fn test_monthly_skips_short_months() {
        let pattern = RecurrencePattern::monthly();
        let out = generate(&pattern, day(2024, 1, 31), day(2024, 1, 1), day(2024, 8, 1)).unwrap();

        assert_eq!(
            dates(&out),
            vec![
                ymd(2024, 1, 31),
                ymd(2024, 3, 31),
                ymd(2024, 5, 31),
                ymd(2024, 7, 31),
            ]
        );
    }

    #[test]
    fn test_monthly_count_skipped_days_do_not_consume_count() {
        let pattern = RecurrencePattern::monthly().with_end(RecurrenceEnd::Count(3)).unwrap();
        let out = generate(&pattern, day(2024, 1, 31), day(2024, 4, 1), day(2025, 1, 1)).unwrap();

        // Jan 31, Mar 31, May 31 are the three occurrences.
        assert_eq!(dates(&out), vec![ymd(2024, 5, 31)]);
    }

    #[test_log::test]
    fn test_anchor_outside_filter_counts_as_first_occurrence() {
        let pattern: RecurrencePattern = "FREQ=WEEKLY;BYDAY=TU;COUNT=2".parse().unwrap();
        let anchor = at(2024, 1, 1, 12, 0); // Monday
        let out = generate(&pattern, anchor, day(2024, 1, 1), day(2024, 2, 1)).unwrap();

        assert_eq!(out, vec![anchor, at(2024, 1, 2, 12, 0)]);

        // A window after the anchor still sees the count already spent on it.
        let later = generate(&pattern, anchor, day(2024, 1, 2), day(2024, 2, 1)).unwrap();
        assert_eq!(later, vec![at(2024, 1, 2, 12, 0)]);
    }

    #[test]
    fn test_monthly_never_matching_day_terminates() {
        let pattern = RecurrencePattern::builder(Frequency::Monthly)
            .interval(12)
            .by_month_day([30])
            .build()
            .unwrap();
        let out = generate(&pattern, day(2023, 2, 1), day(2023, 1, 1), day(2123, 1, 1)).unwrap();

        // Only the anchor: no February has a 30th.
        assert_eq!(dates(&out), vec![ymd(2023, 2, 1)]);
    }

    #[test]
    fn test_yearly_leap_day_skipped() {
        let pattern = RecurrencePattern::yearly();
        let out = generate(&pattern, day(2024, 2, 29), day(2024, 1, 1), day(2033, 1, 1)).unwrap();

        assert_eq!(dates(&out), vec![ymd(2024, 2, 29), ymd(2028, 2, 29), ymd(2032, 2, 29)]);
    }

    #[test]
    fn test_yearly_by_month_day_uses_anchor_month() {
        let pattern = RecurrencePattern::builder(Frequency::Yearly)
            .interval(2)
            .by_month_day([1, 20])
            .build()
            .unwrap();
        let out = generate(&pattern, day(2024, 6, 10), day(2024, 1, 1), day(2027, 1, 1)).unwrap();

        assert_eq!(
            dates(&out),
            vec![ymd(2024, 6, 10), ymd(2024, 6, 20), ymd(2026, 6, 1), ymd(2026, 6, 20)]
        );
    }

    #[test]
    fn test_until_is_inclusive() {
        let pattern = RecurrencePattern::daily()
            .with_end(RecurrenceEnd::Until(at(2024, 1, 3, 8, 0)))
            .unwrap();
        let out = generate(&pattern, at(2024, 1, 1, 8, 0), day(2024, 1, 1), day(2024, 2, 1)).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out.last(), Some(&at(2024, 1, 3, 8, 0)));
    }

    #[test]
    fn test_until_before_window_is_empty() {
        let pattern = RecurrencePattern::daily()
            .with_end(RecurrenceEnd::Until(day(2024, 1, 5)))
            .unwrap();
        let out = generate(&pattern, day(2024, 1, 1), day(2024, 2, 1), day(2024, 2, 29)).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_until_before_series_start_is_empty() {
        let pattern = RecurrencePattern::daily()
            .with_end(RecurrenceEnd::Until(day(2023, 12, 1)))
            .unwrap();
        let out = generate(&pattern, day(2024, 1, 1), day(2023, 1, 1), day(2025, 1, 1)).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_count_zero_is_empty() {
        let pattern = RecurrencePattern::daily().with_end(RecurrenceEnd::Count(0)).unwrap();
        let out = generate(&pattern, day(2024, 1, 1), day(2024, 1, 1), day(2024, 2, 1)).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = generate(
            &RecurrencePattern::daily(),
            day(2024, 1, 1),
            day(2024, 2, 1),
            day(2024, 1, 1),
        );

        assert_eq!(
            result,
            Err(RecurrenceError::InvalidWindow {
                start: day(2024, 2, 1),
                end: day(2024, 1, 1),
            })
        );
    }

    #[test]
    fn test_empty_window_is_empty() {
        let out = generate(&RecurrencePattern::daily(), day(2024, 1, 1), day(2024, 1, 5), day(2024, 1, 5)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_window_end_is_exclusive() {
        let out = generate(&RecurrencePattern::daily(), at(2024, 1, 1, 10, 0), day(2024, 1, 1), at(2024, 1, 3, 10, 0)).unwrap();
        assert_eq!(out, vec![at(2024, 1, 1, 10, 0), at(2024, 1, 2, 10, 0)]);
    }

    #[test]
    fn test_window_start_after_time_of_day_moves_to_next_day() {
        let out = generate(&RecurrencePattern::daily(), at(2024, 1, 1, 10, 0), at(2024, 1, 5, 10, 1), day(2024, 1, 7)).unwrap();
        assert_eq!(out, vec![at(2024, 1, 6, 10, 0)]);
    }

    #[test]
    fn test_distant_window_with_large_count() {
        let pattern = RecurrencePattern::daily().with_end(RecurrenceEnd::Count(1_000_000)).unwrap();
        let series_start = day(2000, 1, 1);
        // Index 999_999 is 2000-01-01 + 999_999 days.
        let last = series_start + chrono::TimeDelta::days(999_999);
        let out = generate(&pattern, series_start, last - chrono::TimeDelta::days(2), last + chrono::TimeDelta::days(5)).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out.last(), Some(&last));
    }
}
