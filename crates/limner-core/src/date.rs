//! Calendar-day keys for daily puzzles.
//!
//! Puzzles are keyed by `YYYY-MM-DD` in UTC. A key is playable only when it
//! parses as a real calendar date and is not after today.

use std::sync::LazyLock;

use regex::Regex;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

static DATE_KEY_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static YEAR_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{3,4}").unwrap());

/// Current UTC calendar day.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Current UTC day as a `YYYY-MM-DD` key; the default puzzle and the upper
/// bound for any requested one.
pub fn today_date_key() -> String {
    format_date_key(today_utc())
}

pub fn format_date_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parse the first 10 characters of `input` as a `YYYY-MM-DD` date.
/// Shape mismatches and impossible days (`2024-02-30`) return `None`.
pub fn parse_date_key(input: &str) -> Option<Date> {
    let head: String = input.trim().chars().take(10).collect();
    if !DATE_KEY_SHAPE.is_match(&head) {
        return None;
    }
    Date::parse(&head, format_description!("[year]-[month]-[day]")).ok()
}

/// Map a requested date to a playable key relative to `today`.
///
/// `None` when absent, malformed, or strictly after `today`.
pub fn resolve_playable_date(input: Option<&str>, today: Date) -> Option<String> {
    let date = parse_date_key(input?)?;
    if date > today {
        return None;
    }
    Some(format_date_key(date))
}

/// Like [`resolve_playable_date`], but falls back to `today` when the input
/// is absent or malformed. Future dates still resolve to `None`.
pub fn resolve_or_today(input: Option<&str>, today: Date) -> Option<String> {
    match input.map(parse_date_key) {
        Some(Some(date)) if date > today => None,
        Some(Some(date)) => Some(format_date_key(date)),
        Some(None) | None => Some(format_date_key(today)),
    }
}

/// `days_back` days before `today` (0 = today).
pub fn date_with_offset(today: Date, days_back: u32) -> Option<String> {
    today
        .checked_sub(Duration::days(i64::from(days_back)))
        .map(format_date_key)
}

/// Pull a numeric year out of a free-form artwork date such as `"c. 1665"`,
/// `"1503–1519"` or `"1889"`. Takes the first run of 3 to 4 digits.
pub fn parse_artwork_year(raw: &str) -> Option<i32> {
    YEAR_DIGITS
        .find(raw)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Earliest year accepted for an artist's birth or death.
pub const EARLIEST_YEAR: i32 = -3000;

/// Whether `year` could be a real birth or death year as of `today`.
pub fn is_plausible_year(year: i32, today: Date) -> bool {
    (EARLIEST_YEAR..=today.year()).contains(&year)
}

pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}
