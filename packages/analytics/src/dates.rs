//! Lenient parsing of uploaded date text.
//!
//! Extracts mix ISO dates, ISO timestamps and the day-first layouts used by
//! UIDAI exports. Anything that does not resolve to a real calendar date is
//! treated as absent.

use aadhaar_insights_analytics_models::month_abbreviation;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Timestamp layouts without an offset, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Returns `true` for date text that carries no value at all.
#[must_use]
pub fn is_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "undefined" || trimmed == "null"
}

/// Parses uploaded date text into a calendar date.
///
/// Returns `None` for placeholders and for text that names no real date
/// (e.g. `2024-02-30`).
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if is_placeholder(raw) {
        return None;
    }
    let trimmed = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Zero-padded `YYYY-MM` key for a date.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Renders a `YYYY-MM` key as `"Mon YY"` (e.g. `"2024-06"` becomes `"Jun 24"`).
///
/// Returns `None` if the key is malformed.
#[must_use]
pub fn format_month_label(key: &str) -> Option<String> {
    let (year, month) = key.split_once('-')?;
    let month = month_abbreviation(month.parse().ok()?)?;
    let short_year = year.get(year.len().checked_sub(2)?..)?;
    Some(format!("{month} {short_year}"))
}

/// Renders a year and 1-indexed month as `"Mon YYYY"`.
#[must_use]
pub fn format_long_month(year: i32, month: u32) -> String {
    month_abbreviation(month).map_or_else(
        || format!("{year}-{month:02}"),
        |abbr| format!("{abbr} {year}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_layouts() {
        assert_eq!(parse_date("2024-06-01"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024/06/01"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("01-06-2024"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("01/06/2024"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T10:30:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T10:30:00.250"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01 10:30:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("2024-06-01T10:30:00+05:30"), Some(ymd(2024, 6, 1)));
        assert_eq!(parse_date("  2024-06-01 "), Some(ymd(2024, 6, 1)));
    }

    #[test]
    fn rejects_placeholders_and_impossible_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("undefined"), None);
        assert_eq!(parse_date("null"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn month_keys_are_zero_padded() {
        assert_eq!(month_key(ymd(2024, 6, 15)), "2024-06");
        assert_eq!(month_key(ymd(2025, 12, 1)), "2025-12");
    }

    #[test]
    fn month_labels() {
        assert_eq!(format_month_label("2024-06").as_deref(), Some("Jun 24"));
        assert_eq!(format_month_label("2025-01").as_deref(), Some("Jan 25"));
        assert_eq!(format_month_label("2025-13"), None);
        assert_eq!(format_month_label("garbage"), None);
        assert_eq!(format_long_month(2025, 1), "Jan 2025");
    }
}
