//! Timestamp formats used on the wire.

use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-01T12:00:01.000Z`.
pub fn to_json_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// IMF-fixdate as used by `Last-Modified`, e.g. `Wed, 01 May 2024 12:00:01 GMT`.
pub fn to_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses an `If-Modified-Since` value. Unparsable dates yield `None` and are ignored.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
