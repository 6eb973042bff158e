use chrono::NaiveDateTime;
use kalends_recur::{RecurrencePattern, generate};

pub struct OccurrenceCase {
    pub name: &'static str,
    pub rrule: &'static str,
    pub series_start: &'static str,
    pub window_start: &'static str,
    pub window_end: &'static str,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
}

#[expect(clippy::too_many_lines)]
pub fn occurrence_cases() -> Vec<OccurrenceCase> {
    vec![
        OccurrenceCase {
            name: "daily_count",
            rrule: "FREQ=DAILY;COUNT=5",
            series_start: "2024-01-01T00:00:00",
            window_start: "2024-01-01T00:00:00",
            window_end: "2024-01-31T00:00:00",
            expected: Some(&[
                "2024-01-01T00:00:00",
                "2024-01-02T00:00:00",
                "2024-01-03T00:00:00",
                "2024-01-04T00:00:00",
                "2024-01-05T00:00:00",
            ]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "weekly_mon_wed_fri",
            rrule: "FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=6",
            series_start: "2024-01-01T00:00:00",
            window_start: "2024-01-01T00:00:00",
            window_end: "2024-01-31T00:00:00",
            expected: Some(&[
                "2024-01-01T00:00:00",
                "2024-01-03T00:00:00",
                "2024-01-05T00:00:00",
                "2024-01-08T00:00:00",
                "2024-01-10T00:00:00",
                "2024-01-12T00:00:00",
            ]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "monthly_anchor_day",
            rrule: "FREQ=MONTHLY;COUNT=3",
            series_start: "2024-01-15T00:00:00",
            window_start: "2024-01-01T00:00:00",
            window_end: "2024-12-31T00:00:00",
            expected: Some(&[
                "2024-01-15T00:00:00",
                "2024-02-15T00:00:00",
                "2024-03-15T00:00:00",
            ]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "until_before_window",
            rrule: "FREQ=DAILY;UNTIL=20240105T000000",
            series_start: "2024-01-01T00:00:00",
            window_start: "2024-02-01T00:00:00",
            window_end: "2024-02-29T00:00:00",
            expected: Some(&[]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "time_of_day_preserved",
            rrule: "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU",
            series_start: "2024-01-02T18:45:30",
            window_start: "2024-01-01T00:00:00",
            window_end: "2024-02-01T00:00:00",
            expected: Some(&[
                "2024-01-02T18:45:30",
                "2024-01-16T18:45:30",
                "2024-01-30T18:45:30",
            ]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "monthly_multiple_days_skip_short_months",
            rrule: "FREQ=MONTHLY;BYMONTHDAY=15,30",
            series_start: "2024-01-15T07:00:00",
            window_start: "2024-01-01T00:00:00",
            window_end: "2024-04-01T00:00:00",
            expected: Some(&[
                "2024-01-15T07:00:00",
                "2024-01-30T07:00:00",
                "2024-02-15T07:00:00",
                "2024-03-15T07:00:00",
                "2024-03-30T07:00:00",
            ]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "yearly_interval_count_far_window",
            rrule: "FREQ=YEARLY;INTERVAL=5;COUNT=4",
            series_start: "2000-07-04T12:00:00",
            window_start: "2010-01-01T00:00:00",
            window_end: "2100-01-01T00:00:00",
            expected: Some(&["2010-07-04T12:00:00", "2015-07-04T12:00:00"]),
            expected_len: None,
        },
        OccurrenceCase {
            name: "daily_never_one_year",
            rrule: "FREQ=DAILY",
            series_start: "1999-12-31T23:59:59",
            window_start: "2023-01-01T00:00:00",
            window_end: "2024-01-01T00:00:00",
            expected: None,
            expected_len: Some(365),
        },
        OccurrenceCase {
            name: "weekdays_leap_year",
            rrule: "FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR",
            series_start: "2024-01-01T09:00:00",
            window_start: "2024-01-01T00:00:00",
            window_end: "2025-01-01T00:00:00",
            expected: None,
            expected_len: Some(262),
        },
    ]
}

pub fn assert_case(case: &OccurrenceCase) {
    let pattern: RecurrencePattern = case
        .rrule
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));

    let actual = generate(
        &pattern,
        parse_instant(case.series_start),
        parse_instant(case.window_start),
        parse_instant(case.window_end),
    )
    .unwrap_or_else(|err| panic!("Case {} failed to generate: {}", case.name, err));

    if let Some(expected) = case.expected {
        let expected: Vec<NaiveDateTime> = expected.iter().map(|value| parse_instant(value)).collect();
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

fn parse_instant(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Failed to parse instant {value}: {err}"))
}
