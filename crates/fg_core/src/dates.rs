//! Free-text date parsing for citation and article dates.
//!
//! Wikinews contributors write dates by hand, so the accepted shapes are
//! deliberately broad: ISO and RFC timestamps, `July 18, 2014`,
//! `18 July 2014`, abbreviated months, weekday prefixes and ordinal suffixes.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORDINAL_RE: Regex = Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap();
    static ref WEEKDAY_RE: Regex =
        Regex::new(r"(?i)^(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)[a-z]*\.?,?\s+").unwrap();
    static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref SEPT_RE: Regex = Regex::new(r"(?i)\bsept\b\.?").unwrap();
    static ref MONTH_DOT_RE: Regex =
        Regex::new(r"(?i)\b(jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec)\.").unwrap();
    static ref MONTH_YEAR_RE: Regex = Regex::new(r"^([A-Za-z]+),? (\d{4})$").unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"\b\d{4}\b").unwrap();
}

/// Years below this come from chrono splitting a short number, e.g.
/// `July 2014` read as day 20 of year 14.
const MIN_YEAR: i32 = 1000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %I:%M %p",
    "%d %B %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d,%Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%B, %d %Y",
    "%m/%d/%Y",
];

/// Parses a hand-written date. Returns `None` when no known shape matches.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim().trim_end_matches(|c: char| c == ',' || c == '.').trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let normalized = normalize(text);
    if !YEAR_RE.is_match(&normalized) {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            if dt.year() >= MIN_YEAR {
                return Some(dt.and_utc());
            }
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
            if date.year() >= MIN_YEAR {
                return midnight(date);
            }
        }
    }

    // `July 2014` means the first of the month.
    let caps = MONTH_YEAR_RE.captures(&normalized)?;
    NaiveDate::parse_from_str(&format!("{} 1 {}", &caps[1], &caps[2]), "%B %d %Y")
        .ok()
        .and_then(midnight)
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

/// Whole days between two dates, ignoring their order.
pub fn days_apart(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a - b).num_days().abs()
}

fn normalize(text: &str) -> String {
    let text = WEEKDAY_RE.replace(text, "");
    let text = ORDINAL_RE.replace_all(&text, "$1");
    let text = SEPT_RE.replace_all(&text, "Sep");
    let text = MONTH_DOT_RE.replace_all(&text, "$1");
    SPACES_RE.replace_all(text.trim(), " ").into_owned()
}
