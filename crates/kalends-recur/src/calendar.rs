//! Proleptic Gregorian calendar arithmetic used by the generator.
//!
//! Month and year lengths are computed arithmetically rather than through
//! `NaiveDate`, so periodic counting never has to materialize dates that may
//! lie far outside the window being queried.

use chrono::{Datelike, NaiveDate};

/// Months after which the Gregorian month-length sequence repeats (400 years).
pub const MONTH_CYCLE: u64 = 4800;

#[must_use]
pub const fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Number of days in `month` (1-12) of `year`.
#[must_use]
pub const fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Months elapsed since 0000-01, i.e. `year * 12 + month0`.
#[must_use]
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Splits a month index back into `(year, month)` with `month` in 1-12.
#[must_use]
pub const fn split_month_index(index: i64) -> (i64, u32) {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rem_euclid(12) is always within 0..12"
    )]
    let month0 = index.rem_euclid(12) as u32;
    (index.div_euclid(12), month0 + 1)
}

/// Builds a calendar date, returning `None` when the day does not exist in
/// that month or the year is outside chrono's supported range.
#[must_use]
pub fn date_from_parts(year: i64, month: u32, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[must_use]
pub const fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    numerator.div_ceil(denominator)
}

#[must_use]
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// ## Summary
/// Sums `f(k)` for `k` in `1..=len`, given that `f(k + cycle) == f(k)`.
///
/// Evaluates `f` at most `2 * cycle` times regardless of `len`.
pub fn periodic_sum(len: u64, cycle: u64, f: impl Fn(u64) -> u64) -> u64 {
    if cycle == 0 || len <= cycle {
        return (1..=len).map(&f).fold(0, u64::saturating_add);
    }

    let per_cycle: u64 = (1..=cycle).map(&f).fold(0, u64::saturating_add);
    let remainder: u64 = (1..=len % cycle).map(&f).fold(0, u64::saturating_add);
    per_cycle
        .saturating_mul(len / cycle)
        .saturating_add(remainder)
}
