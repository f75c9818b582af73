//! Survival frame builder.
//!
//! Resolves one follow-up interval per subject from raw event dates:
//!
//! 1. Parse the start date and the three terminal dates (primary, competing,
//!    censor). A missing start date or any unparsable date aborts the batch.
//! 2. Drop absent terminal dates. A subject with none left has no way to end
//!    follow-up and aborts the batch.
//! 3. When both primary and competing dates exist, apply the
//!    [`EndEventPriority`]: `primary` or `competing` discards the other
//!    category, `first` keeps both.
//! 4. The end date is the earliest surviving date; the time at risk is the
//!    day difference from the start date.
//!
//! An end date before the start date signals corrupt upstream data and fails
//! the whole batch rather than dropping the subject.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use survival_model::{
    EndEventPriority, EventCategory, Result, SubjectRawEvents, SurvivalColumns, SurvivalError,
    SurvivalRecord, TerminalEvents,
};

use crate::normalization::parse_event_date;

/// Picks the governing terminal event under `priority`.
///
/// Returns `None` when no terminal date is present. Ties on the same day go
/// to the category listed first in [`EventCategory`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use survival_model::{EndEventPriority, EventCategory, TerminalEvents};
/// use survival_transform::builder::resolve_end_event;
///
/// let events = TerminalEvents {
///     primary: NaiveDate::from_ymd_opt(2021, 5, 1),
///     competing: NaiveDate::from_ymd_opt(2021, 4, 20),
///     censor: NaiveDate::from_ymd_opt(2021, 6, 1),
/// };
/// assert_eq!(
///     resolve_end_event(&events, EndEventPriority::First),
///     Some((EventCategory::Competing, NaiveDate::from_ymd_opt(2021, 4, 20).unwrap()))
/// );
/// assert_eq!(
///     resolve_end_event(&events, EndEventPriority::Primary),
///     Some((EventCategory::Primary, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()))
/// );
/// ```
pub fn resolve_end_event(
    events: &TerminalEvents,
    priority: EndEventPriority,
) -> Option<(EventCategory, NaiveDate)> {
    let mut retained = *events;
    if retained.primary.is_some() && retained.competing.is_some() {
        match priority {
            EndEventPriority::Primary => retained.competing = None,
            EndEventPriority::Competing => retained.primary = None,
            EndEventPriority::First => {}
        }
    }
    retained
        .candidates()
        .min_by_key(|(category, date)| (*date, *category))
}

/// Builds one [`SurvivalRecord`] per subject, in input order.
///
/// `columns` names the source columns so that validation errors point at the
/// offending cell. Identifiers are compared with surrounding whitespace
/// ignored but written out exactly as given.
///
/// # Errors
///
/// - [`SurvivalError::Validation`] for a blank or duplicate identifier, a
///   missing start date, or an unparsable date
/// - [`SurvivalError::MissingTerminalEvent`] for a subject without any
///   terminal date
/// - [`SurvivalError::InvariantViolation`] when a resolved end date precedes
///   the start date
pub fn build_survival_records(
    rows: &[SubjectRawEvents],
    columns: &SurvivalColumns,
    priority: EndEventPriority,
) -> Result<Vec<SurvivalRecord>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let key = row.id.trim();
        if key.is_empty() {
            return Err(SurvivalError::validation(
                &row.id,
                &columns.id,
                "subject identifier is blank",
            ));
        }
        if !seen.insert(key) {
            return Err(SurvivalError::validation(
                &row.id,
                &columns.id,
                "subject identifier is duplicated",
            ));
        }
        records.push(build_record(row, columns, priority)?);
    }

    ensure_end_not_before_start(&records)?;

    let count = |reason: EventCategory| {
        records
            .iter()
            .filter(|record| record.end_reason == reason)
            .count()
    };
    info!(
        subjects = records.len(),
        priority = %priority,
        primary = count(EventCategory::Primary),
        competing = count(EventCategory::Competing),
        censored = count(EventCategory::Censor),
        "survival frame built"
    );
    Ok(records)
}

fn build_record(
    row: &SubjectRawEvents,
    columns: &SurvivalColumns,
    priority: EndEventPriority,
) -> Result<SurvivalRecord> {
    let id = row.id.as_str();
    let start_date = parse_cell(id, &columns.start, row.start_event.as_deref())?.ok_or_else(
        || SurvivalError::validation(id, &columns.start, "start date is missing"),
    )?;
    let events = TerminalEvents {
        primary: parse_cell(id, &columns.primary, row.primary_event.as_deref())?,
        competing: parse_cell(id, &columns.competing, row.competing_event.as_deref())?,
        censor: parse_cell(id, &columns.censor, row.censor_date.as_deref())?,
    };
    let (end_reason, end_date) =
        resolve_end_event(&events, priority).ok_or_else(|| {
            SurvivalError::MissingTerminalEvent {
                subject: id.to_string(),
            }
        })?;
    let time_at_risk = (end_date - start_date).num_days();
    debug!(end_reason = %end_reason, time_at_risk, "resolved follow-up");

    Ok(SurvivalRecord {
        id: id.to_string(),
        attributes: row.attributes.clone(),
        start_date,
        primary_event_date: events.primary,
        competing_event_date: events.competing,
        censor_date: events.censor,
        end_date,
        end_reason,
        time_at_risk,
    })
}

fn parse_cell(subject: &str, column: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    parse_event_date(value)
        .map_err(|err| SurvivalError::validation(subject, column, err.to_string()))
}

/// Post-condition over the whole batch: no record may end before it starts.
fn ensure_end_not_before_start(records: &[SurvivalRecord]) -> Result<()> {
    match records
        .iter()
        .find(|record| record.end_date < record.start_date)
    {
        Some(record) => Err(SurvivalError::InvariantViolation {
            subject: record.id.clone(),
            start_date: record.start_date,
            end_date: record.end_date,
        }),
        None => Ok(()),
    }
}
