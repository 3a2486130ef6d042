//! Best-effort text normalization applied on the event and booking write paths.
//!
//! None of these functions fail: input that cannot be normalized comes back trimmed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid slug strip regex"));
static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("valid slug separator regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2})?$").expect("valid time regex"));
static CANONICAL_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid canonical time regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Lowercased, ASCII-only, hyphen-separated slug candidate. May be empty.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(&lowered, "");
    let joined = SLUG_SEPARATOR_RE.replace_all(&stripped, "-");
    joined.trim_matches('-').to_string()
}

/// Canonical `YYYY-MM-DD` (UTC) when the input parses as a date, otherwise the trimmed input.
pub fn normalize_date(input: &str) -> String {
    let trimmed = input.trim();
    match parse_calendar_date(trimmed) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => trimmed.to_string(),
    }
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in DATETIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }
    None
}

/// `HH:MM` for `H:MM`, `HH:MM` and `HH:MM:SS` input (seconds dropped), otherwise the trimmed input.
pub fn normalize_time(input: &str) -> String {
    let trimmed = input.trim();
    match TIME_RE.captures(trimmed) {
        Some(caps) => format!("{:0>2}:{}", &caps[1], &caps[2]),
        None => trimmed.to_string(),
    }
}

/// 24-hour `HH:MM` with hour 00-23 and minute 00-59.
pub fn is_canonical_time(value: &str) -> bool {
    CANONICAL_TIME_RE.is_match(value)
}

pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
