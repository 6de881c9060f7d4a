//! Date and time formatting for table cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse the timestamp shapes the backend emits: RFC 3339 with offset, or a
/// naive ISO timestamp with optional fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|dt| dt.date()))
}

/// "Mar 04, 2025 09:15 AM", or the raw text when it cannot be parsed.
pub fn display_datetime(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%b %d, %Y %I:%M %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// "Mar 04, 2025", or the raw text when it cannot be parsed.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// "Mar 04"
pub fn short_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Up to two upper-case initials for the avatar bubble.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() { "?".to_string() } else { letters }
}
