//! Text utilities for TUI rendering.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ages beyond this are shown as unknown.
const MAX_DISPLAY_AGE_SECS: f64 = 100.0 * 365.0 * 86_400.0;

/// Truncates a string with ellipsis if it exceeds max_width (unicode-aware).
///
/// Uses unicode width for accurate terminal column calculation, handling
/// wide characters (CJK, emoji) correctly.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Compact age: `42s`, `5m`, `3h`, `12d`, or `?` when unknown.
pub fn format_age(age_seconds: f64) -> String {
    if !age_seconds.is_finite() || age_seconds > MAX_DISPLAY_AGE_SECS {
        return "?".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let age = age_seconds.max(0.0) as u64;
    match age {
        0..60 => format!("{age}s"),
        60..3_600 => format!("{}m", age / 60),
        3_600..86_400 => format!("{}h", age / 3_600),
        _ => format!("{}d", age / 86_400),
    }
}

/// Date and time as shown under a session name (`MM/DD HH:MM`).
pub fn format_short_timestamp<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.format("%m/%d %H:%M").to_string()
}

/// Human duration for notifications: whole minutes when exact, else seconds.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}

/// Returns at most `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_short() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_with_ellipsis_truncated() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello w…");
        assert_eq!(truncate_with_ellipsis("hello", 1), "…");
    }

    #[test]
    fn test_truncate_with_ellipsis_wide_cjk() {
        // Each CJK character takes 2 columns.
        assert_eq!(truncate_with_ellipsis("中文test", 6), "中文t…");
    }

    #[test]
    fn test_format_age_units() {
        assert_eq!(format_age(0.0), "0s");
        assert_eq!(format_age(59.9), "59s");
        assert_eq!(format_age(60.0), "1m");
        assert_eq!(format_age(3_599.0), "59m");
        assert_eq!(format_age(3_600.0), "1h");
        assert_eq!(format_age(86_399.0), "23h");
        assert_eq!(format_age(86_400.0 * 12.5), "12d");
    }

    #[test]
    fn test_format_age_unknown() {
        assert_eq!(format_age(f64::INFINITY), "?");
        assert_eq!(format_age(f64::NAN), "?");
        assert_eq!(format_age(MAX_DISPLAY_AGE_SECS + 1.0), "?");
    }

    #[test]
    fn test_future_timestamps_read_as_now() {
        assert_eq!(format_age(-30.0), "0s");
    }

    #[test]
    fn test_format_short_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_short_timestamp(&ts), "03/07 09:05");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(300)), "5 minutes");
        assert_eq!(format_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(format_duration(Duration::from_secs(90)), "90 seconds");
    }

    #[test]
    fn test_excerpt_counts_chars() {
        assert_eq!(excerpt("héllo", 2), "hé");
        assert_eq!(excerpt("abc", 200), "abc");
    }
}
