//! Relative time formatting ("3 hours ago").

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ApiError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// `created_at` format used by the v1.1 API: `Wed Aug 27 13:08:45 +0000 2008`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Relative description of `input` against the current time.
pub fn ago(input: &str) -> Result<String, ApiError> {
    ago_from(input, Utc::now())
}

pub fn ago_from(input: &str, now: DateTime<Utc>) -> Result<String, ApiError> {
    Ok(diff_for_humans(parse_timestamp(input)?, now))
}

/// Accepts unix seconds, RFC 3339, RFC 2822, the API's `created_at`
/// format, or `YYYY-MM-DD HH:MM:SS` (taken as UTC).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = input.trim();
    let invalid = || ApiError::InvalidTimestamp(input.to_string());

    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).ok_or_else(invalid);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, CREATED_AT_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid())
}

/// `"N unit(s) ago"` for the past, `"N unit(s) from now"` for the future.
/// Anything under a second counts as one second.
pub fn diff_for_humans(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let (secs, suffix) = if delta >= 0 {
        (delta, "ago")
    } else {
        (-delta, "from now")
    };
    let (count, unit) = match secs {
        s if s < MINUTE => (s.max(1), "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s if s < MONTH => (s / WEEK, "week"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} {suffix}")
}
