//! # Feature: Reminder Extraction
//!
//! Parses free-form text like "remind me tomorrow at 3pm call mother" into a
//! structured draft: a time of day, a calendar date, and the task phrase with
//! the time/date wording stripped out.
//!
//! Extraction is total: malformed input produces a draft with absent fields,
//! never an error. A draft is only eligible for confirmation when both the
//! time and the date resolved.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Word-granular filler trimming (full spans are stripped first)
//! - 1.1.0: Absolute day/month/year dates alongside relative keywords
//! - 1.0.0: Initial release with relative dates and am/pm conversion

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use regex::{Captures, Regex};

/// Canonical trigger phrase all paraphrases collapse to.
const TRIGGER_CANONICAL: &str = "remind me";

/// A wall-clock time extracted from text, already converted to 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

/// An unconfirmed reminder candidate produced by [`Extractor::extract`].
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    /// The task phrase with trigger, time, and date wording removed.
    pub task_text: String,
    /// Absent when no time expression was found or it was out of range.
    pub time_of_day: Option<TimeOfDay>,
    /// Absent when the time was absent (date is not evaluated in that case)
    /// or the absolute date was invalid.
    pub calendar_date: Option<NaiveDate>,
}

impl ReminderDraft {
    /// A draft can be confirmed only when both time and date resolved.
    pub fn is_resolved(&self) -> bool {
        self.time_of_day.is_some() && self.calendar_date.is_some()
    }

    /// Combine the resolved date and time into the absolute fire time,
    /// seconds zeroed. `None` for unresolved drafts.
    pub fn fire_at(&self) -> Option<NaiveDateTime> {
        let time = self.time_of_day.as_ref()?;
        let date = self.calendar_date?;
        let tod = NaiveTime::from_hms_opt(time.hour, time.minute, 0)?;
        Some(NaiveDateTime::new(date, tod))
    }
}

/// Parses reminder requests from free-form text.
///
/// Holds the compiled patterns; construct once and share.
pub struct Extractor {
    trigger_re: Regex,
    time_re: Regex,
    date_re: Regex,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Extractor {
            // "remind me to", "remind me that", "remind me that that" all
            // collapse to the canonical trigger before anything else runs.
            trigger_re: Regex::new(r"(?i)\bremind\s+me(?:\s+(?:that|to)\b)*")?,
            time_re: Regex::new(
                r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm|in the morning|in the afternoon|in the evening|at night)?",
            )?,
            date_re: Regex::new(
                r"(?i)\b(day after tomorrow|tomorrow|today|(\d{1,2})\s+(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{4}))\b",
            )?,
        })
    }

    /// Extract a reminder draft from `text`, resolving relative dates
    /// against `now` (already in the bot's fixed timezone).
    ///
    /// Never fails; missing information shows up as absent draft fields.
    pub fn extract(&self, text: &str, now: NaiveDateTime) -> ReminderDraft {
        let normalized = self
            .trigger_re
            .replace_all(text, TRIGGER_CANONICAL)
            .into_owned();
        debug!("Normalized reminder text: {normalized}");

        let time_caps = self.time_re.captures(&normalized);
        let (time_of_day, time_span) = match &time_caps {
            Some(caps) => (
                resolve_time(caps),
                caps.get(0).map_or("", |m| m.as_str()).to_string(),
            ),
            None => (None, String::new()),
        };

        // Without a time expression the request is unresolved and the date
        // is not evaluated at all.
        let (calendar_date, date_span) = if time_caps.is_some() {
            match self.date_re.captures(&normalized) {
                Some(caps) => (
                    resolve_date(&caps, now),
                    caps.get(0).map_or("", |m| m.as_str()).to_string(),
                ),
                // A time with no date phrase means today.
                None => (Some(now.date()), String::new()),
            }
        } else {
            (None, String::new())
        };

        let task_text = derive_task(&normalized, &[TRIGGER_CANONICAL, &time_span, &date_span]);

        ReminderDraft {
            task_text,
            time_of_day,
            calendar_date,
        }
    }
}

/// Convert the matched hour/minute/qualifier to 24-hour form.
///
/// pm-equivalents add twelve to hours below 12; am-equivalents map hour 12
/// to 0. A bare hour stays exactly as written, even if ambiguous. Out-of-range
/// values resolve to `None` rather than an error.
fn resolve_time(caps: &Captures) -> Option<TimeOfDay> {
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let qualifier = caps.get(3).map(|m| m.as_str().to_lowercase());
    match qualifier.as_deref() {
        Some("pm") | Some("in the afternoon") | Some("in the evening") | Some("at night")
            if hour < 12 =>
        {
            hour += 12;
        }
        Some("am") | Some("in the morning") if hour == 12 => {
            hour = 0;
        }
        _ => {}
    }

    if hour > 23 || minute > 59 {
        return None;
    }
    Some(TimeOfDay { hour, minute })
}

/// Resolve a matched date expression against `now`.
fn resolve_date(caps: &Captures, now: NaiveDateTime) -> Option<NaiveDate> {
    let keyword = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
    match keyword.as_str() {
        "today" => Some(now.date()),
        "tomorrow" => Some((now + Duration::days(1)).date()),
        "day after tomorrow" => Some((now + Duration::days(2)).date()),
        _ => {
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            let month = month_number(caps.get(3)?.as_str());
            let year: i32 = caps.get(4)?.as_str().parse().ok()?;
            // Invalid combinations (31 February) leave the date absent.
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

/// Month name to 1-based number. Unrecognized names fall back to month 1;
/// the pattern only admits the twelve names, so the fallback is a guard,
/// not a reachable path through `extract`.
fn month_number(name: &str) -> u32 {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
        .unwrap_or(1)
}

/// Strip the matched spans from the text, then trim filler words from the
/// edges at word granularity. Spans are removed whole before any filler
/// trimming so filler words that are substrings of the task are never
/// corrupted.
fn derive_task(text: &str, spans: &[&str]) -> String {
    let mut task = text.to_string();
    for span in spans {
        if !span.is_empty() {
            task = task.replacen(span, "", 1);
        }
    }

    let words: Vec<&str> = task.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| !is_filler(w))
        .unwrap_or(words.len());
    let end = words
        .iter()
        .rposition(|w| !is_filler(w))
        .map(|i| i + 1)
        .unwrap_or(start);
    words[start..end.max(start)].join(" ")
}

fn is_filler(word: &str) -> bool {
    word.eq_ignore_ascii_case("that")
        || word.eq_ignore_ascii_case("to")
        || word.eq_ignore_ascii_case("please")
        || word.chars().all(|c| c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new().unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_tomorrow_afternoon_scenario() {
        let draft = extractor().extract("remind me tomorrow at 3pm call mother", now());
        assert_eq!(draft.time_of_day, Some(TimeOfDay { hour: 15, minute: 0 }));
        assert_eq!(draft.calendar_date, NaiveDate::from_ymd_opt(2026, 6, 5));
        assert_eq!(draft.task_text, "call mother");
        assert_eq!(
            draft.fire_at(),
            NaiveDate::from_ymd_opt(2026, 6, 5).unwrap().and_hms_opt(15, 0, 0)
        );
    }

    #[test]
    fn test_no_time_is_unresolved() {
        let draft = extractor().extract("remind me tomorrow to water the plants", now());
        assert!(draft.time_of_day.is_none());
        // Date is not evaluated when the time is absent.
        assert!(draft.calendar_date.is_none());
        assert!(!draft.is_resolved());
        assert!(draft.fire_at().is_none());
    }

    #[test]
    fn test_empty_input_is_total() {
        let draft = extractor().extract("", now());
        assert!(draft.task_text.is_empty());
        assert!(!draft.is_resolved());
    }

    #[test]
    fn test_arbitrary_input_is_total() {
        let draft = extractor().extract("🙂🙂 at at at ??? 99:99", now());
        assert!(!draft.is_resolved());
    }

    #[test]
    fn test_time_without_date_defaults_to_today() {
        let draft = extractor().extract("remind me at 8:30 pm take out the trash", now());
        assert_eq!(draft.time_of_day, Some(TimeOfDay { hour: 20, minute: 30 }));
        assert_eq!(draft.calendar_date, Some(now().date()));
        assert_eq!(draft.task_text, "take out the trash");
    }

    #[test]
    fn test_period_conversions() {
        let ex = extractor();
        let cases = [
            ("remind me today at 3 in the afternoon nap", 15, 0),
            ("remind me today at 9 in the evening read", 21, 0),
            ("remind me today at 11 at night sleep", 23, 0),
            ("remind me today at 7 in the morning run", 7, 0),
            ("remind me today at 12 am standup", 0, 0),
            ("remind me today at 12 pm lunch", 12, 0),
            // No qualifier leaves the literal hour untouched.
            ("remind me today at 3 stretch", 3, 0),
        ];
        for (text, hour, minute) in cases {
            let draft = ex.extract(text, now());
            assert_eq!(
                draft.time_of_day,
                Some(TimeOfDay { hour, minute }),
                "wrong time for {text:?}"
            );
        }
    }

    #[test]
    fn test_day_after_tomorrow_beats_tomorrow() {
        let draft = extractor().extract("remind me day after tomorrow at 9am dentist", now());
        assert_eq!(draft.calendar_date, NaiveDate::from_ymd_opt(2026, 6, 6));
        assert_eq!(draft.task_text, "dentist");
    }

    #[test]
    fn test_absolute_date() {
        let draft = extractor().extract("remind me at 10am pay rent 1 July 2026", now());
        assert_eq!(draft.calendar_date, NaiveDate::from_ymd_opt(2026, 7, 1));
        assert_eq!(draft.time_of_day, Some(TimeOfDay { hour: 10, minute: 0 }));
        assert_eq!(draft.task_text, "pay rent");
    }

    #[test]
    fn test_invalid_absolute_date_is_absent() {
        let draft = extractor().extract("remind me at 10am party 31 February 2026", now());
        assert!(draft.calendar_date.is_none());
        assert!(!draft.is_resolved());
    }

    #[test]
    fn test_trigger_paraphrases_collapse() {
        let ex = extractor();
        for text in [
            "remind me to call dad tomorrow at 6pm",
            "remind me that that call dad tomorrow at 6pm",
            "Remind me that call dad tomorrow at 6pm",
        ] {
            let draft = ex.extract(text, now());
            assert_eq!(draft.task_text, "call dad", "bad task for {text:?}");
            assert_eq!(draft.time_of_day, Some(TimeOfDay { hour: 18, minute: 0 }));
        }
    }

    #[test]
    fn test_task_never_contains_matched_spans() {
        let draft = extractor().extract("remind me tomorrow at 3pm call mother", now());
        assert!(!draft.task_text.contains("at 3pm"));
        assert!(!draft.task_text.contains("tomorrow"));
        assert!(!draft.task_text.contains("remind me"));
    }

    #[test]
    fn test_filler_inside_task_is_preserved() {
        // "to" appears inside the task; only edge fillers are trimmed.
        let draft = extractor().extract("remind me tomorrow at 9pm to go to bed", now());
        assert_eq!(draft.task_text, "go to bed");
    }

    #[test]
    fn test_punctuation_after_time_is_trimmed() {
        let draft = extractor().extract("remind me tomorrow at 3pm, call mother", now());
        assert_eq!(draft.task_text, "call mother");
    }

    #[test]
    fn test_out_of_range_time_is_unresolved() {
        let draft = extractor().extract("remind me today at 25 o'clock party", now());
        assert!(draft.time_of_day.is_none());
    }

    #[test]
    fn test_month_number_fallback() {
        assert_eq!(month_number("march"), 3);
        assert_eq!(month_number("December"), 12);
        assert_eq!(month_number("frimaire"), 1);
    }
}
