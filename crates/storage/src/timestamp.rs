//! Timestamp parsing

use crate::StorageError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used by the telemetry export and echoed back to clients
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

const DATETIME_FORMATS: [&str; 7] = [
    DISPLAY_FORMAT,
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp in any of the accepted forms.
///
/// RFC 3339 input keeps its local wall-clock time; the offset is dropped.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, StorageError> {
    let input = input.trim();

    if let Some(parsed) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
    {
        return Ok(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.naive_local());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| StorageError::InvalidTimestamp(input.to_string()))
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
