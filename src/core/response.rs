//! Reply formatting and Discord message utilities
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add fire-time formatting for confirmation prompts and list output
//! - 1.0.0: Initial implementation with message chunking

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month name for a 1-based month number; out-of-range falls back to January.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("January")
}

/// Format a reminder fire time the way it is shown to users:
/// `5 June 2026, at 3:00 pm`.
///
/// Twelve-hour clock, with midnight and noon rendered as 12.
pub fn format_fire_time(dt: NaiveDateTime) -> String {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    let period = if dt.hour() >= 12 { "pm" } else { "am" };
    format!(
        "{} {} {}, at {}:{:02} {}",
        dt.day(),
        month_name(dt.month()),
        dt.year(),
        hour12,
        dt.minute(),
        period
    )
}

/// Chunk text into pieces that fit Discord limits (UTF-8 safe, line-aware)
///
/// Splits at line boundaries when possible and falls back to character
/// splitting for lines longer than the limit. Never splits mid-character.
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line_with_newline = format!("{line}\n");
        if current.len() + line_with_newline.len() > max_size {
            if !current.is_empty() {
                chunks.push(current.trim_end().to_string());
                current = String::new();
            }
            if line_with_newline.len() > max_size {
                chunks.extend(chunk_long_line(line, max_size));
            } else {
                current = line_with_newline;
            }
        } else {
            current.push_str(&line_with_newline);
        }
    }
    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

/// Split a single long line into chunks respecting UTF-8 boundaries
fn chunk_long_line(line: &str, max_size: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > max_size && !current.is_empty() {
            result.push(current);
            current = String::new();
        }
        current.push(ch);
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Chunk text for message content (2000 character limit)
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_format_fire_time_afternoon() {
        assert_eq!(format_fire_time(dt(2026, 6, 5, 15, 0)), "5 June 2026, at 3:00 pm");
    }

    #[test]
    fn test_format_fire_time_morning() {
        assert_eq!(format_fire_time(dt(2026, 1, 9, 9, 5)), "9 January 2026, at 9:05 am");
    }

    #[test]
    fn test_format_fire_time_midnight_and_noon() {
        assert_eq!(format_fire_time(dt(2026, 3, 1, 0, 30)), "1 March 2026, at 12:30 am");
        assert_eq!(format_fire_time(dt(2026, 3, 1, 12, 0)), "1 March 2026, at 12:00 pm");
    }

    #[test]
    fn test_month_name_fallback() {
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(13), "January");
    }

    #[test]
    fn test_short_text_no_chunk() {
        let result = chunk_text("hello", 100);
        assert_eq!(result, vec!["hello"]);
    }

    #[test]
    fn test_chunk_respects_lines() {
        let text = "line1\nline2\nline3";
        let result = chunk_text(text, 12);
        assert!(result.len() >= 2);
        for chunk in &result {
            assert!(!chunk.ends_with('\n'));
        }
    }

    #[test]
    fn test_chunk_handles_long_lines() {
        let long_line = "a".repeat(100);
        let result = chunk_text(&long_line, 30);
        assert!(result.len() >= 3);
        for chunk in &result {
            assert!(chunk.len() <= 30);
        }
    }

    #[test]
    fn test_message_limit() {
        let result = chunk_for_message(&"a".repeat(3000));
        assert!(result.len() >= 2);
        assert!(result[0].len() <= MESSAGE_LIMIT);
    }

    #[test]
    fn test_utf8_safety() {
        let text = "Hello 世界! ".repeat(500);
        for chunk in chunk_for_message(&text) {
            assert!(chunk.len() <= MESSAGE_LIMIT);
            assert!(chunk.chars().count() > 0);
        }
    }

    #[test]
    fn test_empty_text() {
        let result = chunk_text("", 100);
        assert_eq!(result, vec![""]);
    }
}
