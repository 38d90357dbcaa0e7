//! Time utilities for the A+ LMS core.
//!
//! All stored timestamps are ISO-8601 UTC strings with millisecond
//! precision (`2024-05-01T12:00:00.000Z`), so lexical order equals
//! chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Return the current time as an ISO-8601 UTC string.
pub fn now_iso8601() -> String {
    to_iso8601(Utc::now())
}

/// Format a UTC instant the way stored timestamps are written.
pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a stored timestamp as a calendar date (`2024-05-01`).
///
/// Unparseable input is returned unchanged.
pub fn display_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
