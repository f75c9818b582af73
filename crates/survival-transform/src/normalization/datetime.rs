//! Event date parsing at whole-day granularity.
//!
//! Source tables deliver dates as text in a handful of shapes. Everything is
//! normalized to a [`NaiveDate`]; any time-of-day or offset suffix is
//! discarded, since follow-up is counted in calendar days.
//!
//! Accepted forms:
//!
//! - `YYYY-MM-DD`, also with unpadded month or day (`2021-1-5`)
//! - `YYYY-MM-DDThh:mm[:ss[.fff]]` with an optional `Z` or `±hh:mm` suffix
//! - `YYYY-MM-DD hh:mm[:ss[.fff]]`
//! - `DD/MM/YYYY`
//!
//! Blank cells and the usual null spellings (`NA`, `NaN`, `NaT`, `null`,
//! `None`) mean "no date". Partial dates (`2021`, `2021-03`) are rejected.

use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// Spellings that mark an absent value, compared case-insensitively.
const MISSING_MARKERS: [&str; 6] = ["na", "n/a", "nan", "nat", "null", "none"];

/// Why a non-empty cell could not be read as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Year or year-month only; a full calendar day is required.
    Partial(String),
    /// The value has a date shape but names a day that does not exist.
    InvalidDay(String),
    /// The time part after the date could not be read.
    InvalidTime(String),
    /// The value matches none of the accepted forms.
    Unrecognized(String),
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partial(value) => write!(f, "partial date '{value}' lacks day precision"),
            Self::InvalidDay(value) => write!(f, "'{value}' is not a calendar day"),
            Self::InvalidTime(value) => write!(f, "unreadable time part in '{value}'"),
            Self::Unrecognized(value) => write!(f, "unparsable date '{value}'"),
        }
    }
}

impl std::error::Error for DateParseError {}

/// Returns true if the value denotes an absent date.
pub fn is_missing_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Parses an optional date cell.
///
/// Returns `Ok(None)` for absent values and an error for values that are
/// present but unreadable.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use survival_transform::normalization::parse_event_date;
///
/// assert_eq!(
///     parse_event_date(Some("2021-01-15")).unwrap(),
///     NaiveDate::from_ymd_opt(2021, 1, 15)
/// );
/// assert_eq!(parse_event_date(Some("NaT")).unwrap(), None);
/// assert_eq!(parse_event_date(None).unwrap(), None);
/// assert!(parse_event_date(Some("2021-13-01")).is_err());
/// ```
pub fn parse_event_date(value: Option<&str>) -> Result<Option<NaiveDate>, DateParseError> {
    match value {
        None => Ok(None),
        Some(raw) if is_missing_value(raw) => Ok(None),
        Some(raw) => parse_date_text(raw.trim()).map(Some),
    }
}

fn parse_date_text(value: &str) -> Result<NaiveDate, DateParseError> {
    if has_iso_date_prefix(value) {
        let (date_part, rest) = value.split_at(10);
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| DateParseError::InvalidDay(value.to_string()))?;
        if !rest.is_empty() {
            validate_time_suffix(rest).ok_or_else(|| DateParseError::InvalidTime(value.to_string()))?;
        }
        return Ok(date);
    }
    if is_partial_iso(value) {
        return Err(DateParseError::Partial(value.to_string()));
    }
    let (head, rest) = value.split_at(value.find(['T', ' ']).unwrap_or(value.len()));
    if let Some((year, month, day)) = unpadded_iso_fields(head) {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateParseError::InvalidDay(value.to_string()))?;
        if !rest.is_empty() {
            validate_time_suffix(rest).ok_or_else(|| DateParseError::InvalidTime(value.to_string()))?;
        }
        return Ok(date);
    }
    if value.contains('/') {
        return NaiveDate::parse_from_str(value, "%d/%m/%Y")
            .map_err(|_| DateParseError::Unrecognized(value.to_string()));
    }
    Err(DateParseError::Unrecognized(value.to_string()))
}

/// `YYYY-MM-DD` at the start of the value, digits in every numeric slot.
fn has_iso_date_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&idx| bytes[idx].is_ascii_digit())
}

/// `YYYY-M-D`: four-digit year, one or two digits for month and day.
fn unpadded_iso_fields(value: &str) -> Option<(i32, u32, u32)> {
    let mut fields = value.split('-');
    let (year, month, day) = (fields.next()?, fields.next()?, fields.next()?);
    let digits = |field: &str, max: usize| {
        (1..=max).contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
    };
    if fields.next().is_some() || year.len() != 4 || !digits(year, 4) {
        return None;
    }
    if !digits(month, 2) || !digits(day, 2) {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

/// `YYYY` or `YYYY-MM`.
fn is_partial_iso(value: &str) -> bool {
    let bytes = value.as_bytes();
    match bytes.len() {
        4 => bytes.iter().all(u8::is_ascii_digit),
        7 => {
            bytes[4] == b'-'
                && bytes[..4].iter().all(u8::is_ascii_digit)
                && bytes[5..].iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// Accepts `Thh:mm[:ss[.fff]]` or ` hh:mm[:ss[.fff]]`, with an optional
/// `Z` or `±hh:mm` offset. The time itself is dropped.
fn validate_time_suffix(rest: &str) -> Option<()> {
    let time = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' '))?;
    let time = time.strip_suffix('Z').unwrap_or(time);
    let time = match time.rfind(['+', '-']) {
        Some(idx) => {
            let offset = &time[idx + 1..];
            NaiveTime::parse_from_str(offset, "%H:%M").ok()?;
            &time[..idx]
        }
        None => time,
    };
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .any(|format| NaiveTime::parse_from_str(time, format).is_ok())
        .then_some(())
}
