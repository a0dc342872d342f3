//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Backend timestamp as a short date, e.g. `May 1, 2024`.
///
/// Usage in templates: `{{ order.created_at|format_date }}`
#[askama::filter_fn]
pub fn format_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(human_date(&value.to_string(), "%b %-d, %Y"))
}

/// Backend timestamp with time of day, e.g. `May 1, 2024 10:00`.
#[askama::filter_fn]
pub fn format_datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(human_date(&value.to_string(), "%b %-d, %Y %H:%M"))
}

/// Reformat an ISO-8601 timestamp, returning the input unchanged if it does not parse.
///
/// The backend sends both offset-aware and naive timestamps.
pub(crate) fn human_date(raw: &str, format: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(format).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(format).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_date_formats() {
        assert_eq!(human_date("2024-05-01T10:00:00", "%b %-d, %Y"), "May 1, 2024");
        assert_eq!(
            human_date("2024-05-01T10:00:00.123456+01:00", "%b %-d, %Y %H:%M"),
            "May 1, 2024 10:00"
        );
        assert_eq!(human_date("2024-12-25", "%b %-d, %Y"), "Dec 25, 2024");
    }

    #[test]
    fn test_human_date_passthrough() {
        assert_eq!(human_date("yesterday", "%b %-d, %Y"), "yesterday");
        assert_eq!(human_date("  ", "%b %-d, %Y"), "");
    }
}
