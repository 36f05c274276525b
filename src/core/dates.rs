// src/core/dates.rs
use chrono::NaiveDate;

/// Formats the site renders dates in, depending on account locale settings.
const FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d/%b/%Y",
    "%d.%b.%Y",
    "%b/%d/%Y",
    "%d %b %y",
    "%d %b %Y",
];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
