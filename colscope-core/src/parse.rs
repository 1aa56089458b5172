//! Explicit parse attempts for raw cells
//!
//! Every component that needs a number or a date out of a `Cell` goes
//! through these functions, so type detection, summaries and binning all
//! agree on what counts as numeric or date-like.
//!
//! Design principles:
//! - Numbers never parse as dates
//! - Non-finite values never parse as numbers
//! - Never panics - every attempt returns a `Result`

use crate::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Why a cell could not be read as the requested type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Cell is empty")]
    Blank,

    #[error("Not a number: {0}")]
    NotNumeric(String),

    #[error("Number is not finite: {0}")]
    NonFinite(String),

    #[error("Not a date: {0}")]
    NotADate(String),
}

// ============================================================================
// Numbers
// ============================================================================

/// Attempt to read a cell as a finite number
///
/// Supported inputs:
/// - Number cells (must be finite)
/// - Text cells holding a decimal or scientific literal: "42", "-3.5", "1.5e3"
///
/// Booleans, nulls, blank text and text such as "inf", "NaN" or "12abc" fail.
pub fn parse_number(cell: &Cell) -> Result<f64, ParseError> {
    match cell {
        Cell::Number(n) if n.is_finite() => Ok(*n),
        Cell::Number(n) => Err(ParseError::NonFinite(n.to_string())),
        Cell::Text(s) => parse_number_str(s),
        Cell::Bool(b) => Err(ParseError::NotNumeric(b.to_string())),
        Cell::Null => Err(ParseError::Blank),
    }
}

fn parse_number_str(s: &str) -> Result<f64, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Blank);
    }

    // f64::from_str also accepts "inf", "infinity" and "nan" spellings
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ParseError::NotNumeric(s.to_string()));
    }

    let value: f64 = s
        .parse()
        .map_err(|_| ParseError::NotNumeric(s.to_string()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::NonFinite(s.to_string()))
    }
}

// ============================================================================
// Dates
// ============================================================================

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Attempt to read a cell as a calendar date/time
///
/// Only text cells are considered. Supported formats:
/// - RFC 3339: 2025-06-15T14:30:00Z, 2025-06-15T14:30:00+05:30
/// - RFC 2822: Sun, 15 Jun 2025 14:30:00 +0000
/// - 2025-06-15, 2025/06/15, 06/15/2025
/// - 2025-06-15T14:30[:00[.123]], 2025-06-15 14:30[:00]
/// - 15 Jun 2025, Jun 15, 2025, June 15, 2025
///
/// Offsets are normalized to UTC.
pub fn parse_date(cell: &Cell) -> Result<NaiveDateTime, ParseError> {
    match cell {
        Cell::Text(s) => parse_date_str(s),
        Cell::Null => Err(ParseError::Blank),
        other => Err(ParseError::NotADate(other.to_key())),
    }
}

fn parse_date_str(s: &str) -> Result<NaiveDateTime, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Blank);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Ok(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(ParseError::NotADate(s.to_string()))
}

/// Milliseconds since the Unix epoch, the numeric axis used for date bins
pub fn date_to_millis(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64
}

/// Inverse of `date_to_millis`; `None` outside chrono's representable range
pub fn millis_to_date(millis: f64) -> Option<NaiveDateTime> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64).map(|dt| dt.naive_utc())
}

/// Render a date the way labels and ranges show it
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

// ============================================================================
// Blank detection
// ============================================================================

/// Null or whitespace-only text
pub fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Null => true,
        Cell::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}
