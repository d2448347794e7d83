use jiff::civil::Date;
use jiff::{Timestamp, tz::TimeZone};

/// Format a date or RFC 3339 timestamp for display, e.g. `Feb 15, 2024`.
///
/// Timestamps are shown in UTC. Anything that does not parse is returned as
/// given.
pub fn format_date(value: &str) -> String {
    let date = match value.parse::<Timestamp>() {
        Ok(timestamp) => timestamp.to_zoned(TimeZone::UTC).date(),
        Err(_) => match value.parse::<Date>() {
            Ok(date) => date,
            Err(_) => return value.to_string(),
        },
    };
    date.strftime("%b %-d, %Y").to_string()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
