//! Tracker timestamp parsing.
//!
//! Jira hands out timestamps such as `2024-01-05T14:30:00.000+0000`. Everything
//! from the first `.` onwards is discarded and the remainder is read verbatim as a
//! naive local date-time; no timezone conversion takes place.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ParseFailure;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a tracker timestamp into a date-time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Missing);
    }

    let without_fraction = trimmed.split('.').next().unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(without_fraction, TIMESTAMP_FORMAT)
        .map_err(|_| ParseFailure::Malformed(trimmed.to_string()))
}

/// Parse an optional tracker timestamp; `None` is reported as [`ParseFailure::Missing`].
pub fn parse_optional_timestamp(raw: Option<&str>) -> Result<NaiveDateTime, ParseFailure> {
    raw.map_or(Err(ParseFailure::Missing), parse_timestamp)
}

/// Parse a tracker timestamp and truncate it to its calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseFailure> {
    parse_timestamp(raw).map(|dt| dt.date())
}

/// Whole days between creation and resolution.
///
/// Returns `Err` with the raw (negative) day count when the resolution precedes
/// creation, so callers can clamp to zero and report the data-quality problem.
pub fn days_between(created: NaiveDateTime, resolved: NaiveDateTime) -> Result<i64, i64> {
    let days = (resolved - created).num_days();
    if resolved < created {
        Err(days)
    } else {
        Ok(days)
    }
}
