//! Polars adapters around the builder and the expander.
//!
//! Callers hand over a [`DataFrame`] plus a column mapping; the adapters read
//! the mapped columns into typed rows, run the engine, and render the result
//! with the fixed output column order:
//!
//! - survival: identifier, passthroughs, `start_date`, `primary_event_date`,
//!   `competing_event_date`, `censor_date`, `end_date`, `time_at_risk`
//! - monthly: identifier, passthroughs, end date, `month`, `time`
//!
//! Dates are rendered as `YYYY-MM-DD` text, day counts as `Int64`.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use survival_model::{
    Attribute, AttributeValue, EndEventPriority, ExposureColumns, MonthlyExposureRecord, Result,
    SURVIVAL_OUTPUT_COLUMNS, SubjectInterval, SubjectRawEvents, SurvivalColumns, SurvivalError,
    SurvivalRecord,
};

use crate::builder::build_survival_records;
use crate::data_utils::{
    attribute_column, column_attribute_values, column_identifier_values, column_text_values,
    frame_error, require_columns,
};
use crate::expand::{ExposureTable, expand_monthly};
use crate::normalization::parse_event_date;

static MISSING: AttributeValue = AttributeValue::Missing;

/// Builder output in both tabular and typed form.
#[derive(Debug, Clone)]
pub struct SurvivalFrame {
    pub data: DataFrame,
    pub records: Vec<SurvivalRecord>,
}

/// Expander output in both tabular and typed form.
#[derive(Debug, Clone)]
pub struct ExposureFrame {
    pub data: DataFrame,
    pub table: ExposureTable,
}

/// Runs the builder over a source table.
pub fn build_survival_frame(
    df: &DataFrame,
    columns: &SurvivalColumns,
    priority: EndEventPriority,
) -> Result<SurvivalFrame> {
    let subjects = subjects_from_frame(df, columns)?;
    let records = build_survival_records(&subjects, columns, priority)?;
    let data = survival_records_frame(&records, columns)?;
    Ok(SurvivalFrame { data, records })
}

/// Runs the expander over a survival-shaped table.
pub fn expand_survival_frame(
    df: &DataFrame,
    columns: &ExposureColumns,
    expected_checksum: Option<i64>,
) -> Result<ExposureFrame> {
    let intervals = intervals_from_frame(df, columns)?;
    let table = expand_monthly(&intervals, expected_checksum);
    let data = exposure_records_frame(&table.records, columns)?;
    Ok(ExposureFrame { data, table })
}

/// Reads raw subject events from the mapped columns.
///
/// Date cells are kept as text; parsing happens in the builder so that
/// errors can name the subject.
pub fn subjects_from_frame(
    df: &DataFrame,
    columns: &SurvivalColumns,
) -> Result<Vec<SubjectRawEvents>> {
    require_columns(df, &columns.required())?;
    let ids = column_identifier_values(df, &columns.id)?;
    let starts = column_text_values(df, &columns.start)?;
    let primaries = column_text_values(df, &columns.primary)?;
    let competing = column_text_values(df, &columns.competing)?;
    let censors = column_text_values(df, &columns.censor)?;
    let extras = extra_values(df, &columns.extras)?;

    let mut subjects = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        subjects.push(SubjectRawEvents {
            id: ids[idx].clone().unwrap_or_default(),
            attributes: row_attributes(&columns.extras, &extras, idx),
            start_event: starts[idx].clone(),
            primary_event: primaries[idx].clone(),
            competing_event: competing[idx].clone(),
            censor_date: censors[idx].clone(),
        });
    }
    Ok(subjects)
}

/// Reads follow-up intervals from a survival-shaped table.
///
/// # Errors
///
/// Fails with [`SurvivalError::Validation`] for a blank identifier or a
/// missing or unparsable start or end date.
pub fn intervals_from_frame(
    df: &DataFrame,
    columns: &ExposureColumns,
) -> Result<Vec<SubjectInterval>> {
    require_columns(df, &columns.required())?;
    let ids = column_identifier_values(df, &columns.id)?;
    let starts = column_text_values(df, &columns.start)?;
    let ends = column_text_values(df, &columns.end)?;
    let extras = extra_values(df, &columns.extras)?;

    let mut intervals = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let id = ids[idx]
            .clone()
            .ok_or_else(|| SurvivalError::validation("", &columns.id, "subject identifier is blank"))?;
        let start_date = required_date(&id, &columns.start, starts[idx].as_deref())?;
        let end_date = required_date(&id, &columns.end, ends[idx].as_deref())?;
        intervals.push(SubjectInterval {
            attributes: row_attributes(&columns.extras, &extras, idx),
            id,
            start_date,
            end_date,
        });
    }
    Ok(intervals)
}

/// Renders survival records with the fixed survival column order.
pub fn survival_records_frame(
    records: &[SurvivalRecord],
    columns: &SurvivalColumns,
) -> Result<DataFrame> {
    let [start, primary, competing, censor, end, time_at_risk] = SURVIVAL_OUTPUT_COLUMNS;
    let mut output = leading_columns(
        &columns.id,
        &columns.extras,
        records.iter().map(|r| (r.id.as_str(), r.attributes.as_slice())),
    );
    output.push(date_column(start, records.iter().map(|r| Some(r.start_date))));
    output.push(date_column(primary, records.iter().map(|r| r.primary_event_date)));
    output.push(date_column(competing, records.iter().map(|r| r.competing_event_date)));
    output.push(date_column(censor, records.iter().map(|r| r.censor_date)));
    output.push(date_column(end, records.iter().map(|r| Some(r.end_date))));
    let days: Vec<i64> = records.iter().map(|r| r.time_at_risk).collect();
    output.push(Series::new(time_at_risk.into(), days).into_column());
    DataFrame::new(output).map_err(frame_error)
}

/// Renders monthly records: identifier, passthroughs, end date, month, time.
pub fn exposure_records_frame(
    records: &[MonthlyExposureRecord],
    columns: &ExposureColumns,
) -> Result<DataFrame> {
    let mut output = leading_columns(
        &columns.id,
        &columns.extras,
        records.iter().map(|r| (r.id.as_str(), r.attributes.as_slice())),
    );
    output.push(date_column(&columns.end, records.iter().map(|r| Some(r.end_date))));
    let months: Vec<String> = records.iter().map(|r| r.month.to_string()).collect();
    output.push(Series::new("month".into(), months).into_column());
    let times: Vec<i64> = records.iter().map(|r| i64::from(r.time)).collect();
    output.push(Series::new("time".into(), times).into_column());
    DataFrame::new(output).map_err(frame_error)
}

fn extra_values(df: &DataFrame, extras: &[String]) -> Result<Vec<Vec<AttributeValue>>> {
    extras
        .iter()
        .map(|name| column_attribute_values(df, name))
        .collect()
}

fn row_attributes(names: &[String], values: &[Vec<AttributeValue>], idx: usize) -> Vec<Attribute> {
    names
        .iter()
        .zip(values)
        .map(|(name, column)| Attribute::new(name.clone(), column[idx].clone()))
        .collect()
}

fn required_date(subject: &str, column: &str, value: Option<&str>) -> Result<NaiveDate> {
    parse_event_date(value)
        .map_err(|err| SurvivalError::validation(subject, column, err.to_string()))?
        .ok_or_else(|| SurvivalError::validation(subject, column, "date is missing"))
}

/// Identifier column followed by one column per passthrough, looked up by
/// name on each row.
fn leading_columns<'a>(
    id_name: &str,
    extras: &[String],
    rows: impl Iterator<Item = (&'a str, &'a [Attribute])> + Clone,
) -> Vec<Column> {
    let ids: Vec<&str> = rows.clone().map(|(id, _)| id).collect();
    let mut output = Vec::with_capacity(extras.len() + 8);
    output.push(Series::new(id_name.into(), ids).into_column());
    for name in extras {
        let values: Vec<&AttributeValue> = rows
            .clone()
            .map(|(_, attributes)| {
                attributes
                    .iter()
                    .find(|attribute| &attribute.name == name)
                    .map_or(&MISSING, |attribute| &attribute.value)
            })
            .collect();
        output.push(attribute_column(name, &values));
    }
    output
}

fn date_column(name: &str, dates: impl Iterator<Item = Option<NaiveDate>>) -> Column {
    let values: Vec<Option<String>> = dates.map(|date| date.map(|d| d.to_string())).collect();
    Series::new(name.into(), values).into_column()
}
