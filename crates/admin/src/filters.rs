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

/// Formats a backend timestamp as `Jan 2, 2024 15:04`.
///
/// Unparseable input is shown as-is; empty input becomes an em dash.
///
/// Usage in templates: `{{ order.created_at|datetime }}`
#[askama::filter_fn]
pub fn datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string(), "%b %-d, %Y %H:%M"))
}

/// Formats a backend timestamp or date as `Jan 2, 2024`.
///
/// Usage in templates: `{{ report.report_date|date }}`
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string(), "%b %-d, %Y"))
}

fn format_timestamp(raw: &str, format: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "\u{2014}".to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(format).to_string();
    }
    // Backends without an offset
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format(format).to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-01-02T15:04:05Z", "%b %-d, %Y %H:%M"),
            "Jan 2, 2024 15:04"
        );
        assert_eq!(
            format_timestamp("2024-01-02T15:04:05.123", "%b %-d, %Y"),
            "Jan 2, 2024"
        );
        assert_eq!(format_timestamp("2024-06-30", "%b %-d, %Y %H:%M"), "Jun 30, 2024");
        assert_eq!(format_timestamp("", "%b %-d, %Y"), "\u{2014}");
        assert_eq!(format_timestamp("yesterday", "%b %-d, %Y"), "yesterday");
    }
}
