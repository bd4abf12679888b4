//! # Feature: Recurrence Calculation
//!
//! Pure calendar arithmetic: given the time a reminder last fired and its
//! frequency, compute when it fires next. Monthly advancement clamps the
//! day-of-month to the length of the target month, so a reminder created on
//! Jan 31 lands on Feb 28 (or Feb 29 in a leap year) instead of overflowing.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with once/daily/weekly/monthly frequencies

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// How often a reminder repeats.
///
/// `Once` rows are deleted by the scheduler after their single fire and are
/// never fed back through `next_occurrence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Canonical storage form, used as the `frequency` column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Parse a stored frequency value.
    ///
    /// Anything unrecognized maps to `Daily`. This is the explicit default
    /// for malformed rows rather than a parse error; a bad value in storage
    /// should not stop the sweep.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "once" => Frequency::Once,
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Daily,
        }
    }

    /// Human-readable label for list output and confirmation replies.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "every day",
            Frequency::Weekly => "every week",
            Frequency::Monthly => "every month",
        }
    }
}

/// Compute the next fire time after `last_run` for the given frequency.
///
/// Total over all frequency values. `Once` takes the daily step so the
/// function never panics if called with it, but the scheduler deletes
/// `Once` rows instead of rescheduling them.
pub fn next_occurrence(last_run: NaiveDateTime, frequency: Frequency) -> NaiveDateTime {
    match frequency {
        Frequency::Weekly => last_run + Duration::days(7),
        Frequency::Monthly => {
            let mut year = last_run.year();
            let mut month = last_run.month() + 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
            let day = last_run.day().min(days_in_month(year, month));
            // The clamp guarantees a valid date; fall back to the original
            // date rather than panic if it somehow is not.
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| NaiveDateTime::new(date, last_run.time()))
                .unwrap_or(last_run)
        }
        Frequency::Daily | Frequency::Once => last_run + Duration::days(1),
    }
}

/// Number of days in a Gregorian month, with the 4/100/400 leap-year rule.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
