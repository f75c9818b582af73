//! DataFrame value extraction for the survival adapters.
//!
//! Internal utilities for reading identifier, date and passthrough columns
//! out of a Polars DataFrame and for rendering passthrough values back into
//! typed columns.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, PolarsError, Series};

use survival_common::{any_to_f64, any_to_i64, any_to_string_non_empty};
use survival_model::{AttributeValue, Result, SurvivalError};

/// Wraps a Polars failure in the crate error type.
pub fn frame_error(err: PolarsError) -> SurvivalError {
    SurvivalError::Frame {
        message: err.to_string(),
    }
}

/// Looks up a column, failing with [`SurvivalError::ColumnNotFound`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| SurvivalError::ColumnNotFound {
            column: name.to_string(),
        })
}

/// Fails on the first mapped column the frame lacks.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        require_column(df, name)?;
    }
    Ok(())
}

/// Non-blank text of every cell in a column; `None` for nulls and blanks.
pub fn column_text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_string_non_empty(value).map(|s| s.trim().to_string()));
    }
    Ok(values)
}

/// Identifier cells exactly as stored; `None` for nulls and blanks.
pub fn column_identifier_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_string_non_empty(value));
    }
    Ok(values)
}

/// Every cell of a column as a passthrough value.
pub fn column_attribute_values(df: &DataFrame, name: &str) -> Result<Vec<AttributeValue>> {
    let column = require_column(df, name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_attribute(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Converts a cell to a passthrough value, keeping integers, floats and
/// booleans typed. Blank text counts as missing.
pub fn any_to_attribute(value: AnyValue<'_>) -> AttributeValue {
    match value {
        AnyValue::Null => AttributeValue::Missing,
        AnyValue::Boolean(b) => AttributeValue::Boolean(b),
        AnyValue::Float32(_) | AnyValue::Float64(_) => {
            any_to_f64(value).map_or(AttributeValue::Missing, AttributeValue::Float)
        }
        other => match any_to_i64(other.clone()) {
            Some(v) => AttributeValue::Integer(v),
            None => any_to_string_non_empty(other).map_or(AttributeValue::Missing, AttributeValue::Text),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Empty,
    Integer,
    Float,
    Boolean,
    Text,
}

impl AttributeKind {
    fn of(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Missing => Self::Empty,
            AttributeValue::Integer(_) => Self::Integer,
            AttributeValue::Float(_) => Self::Float,
            AttributeValue::Boolean(_) => Self::Boolean,
            AttributeValue::Text(_) => Self::Text,
        }
    }

    /// Smallest kind able to hold both; mixed kinds fall back to text.
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, kind) | (kind, Self::Empty) => kind,
            (a, b) if a == b => a,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Text,
        }
    }
}

/// Renders passthrough values as a single typed column.
pub fn attribute_column(name: &str, values: &[&AttributeValue]) -> Column {
    let kind = values
        .iter()
        .map(|value| AttributeKind::of(value))
        .fold(AttributeKind::Empty, AttributeKind::merge);
    let series = match kind {
        AttributeKind::Integer => {
            let cells: Vec<Option<i64>> = values
                .iter()
                .map(|value| match value {
                    AttributeValue::Integer(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), cells)
        }
        AttributeKind::Float => {
            let cells: Vec<Option<f64>> = values
                .iter()
                .map(|value| match value {
                    AttributeValue::Float(v) => Some(*v),
                    AttributeValue::Integer(v) => Some(*v as f64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), cells)
        }
        AttributeKind::Boolean => {
            let cells: Vec<Option<bool>> = values
                .iter()
                .map(|value| match value {
                    AttributeValue::Boolean(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), cells)
        }
        AttributeKind::Text | AttributeKind::Empty => {
            let cells: Vec<Option<String>> = values.iter().map(|value| attribute_text(value)).collect();
            Series::new(name.into(), cells)
        }
    };
    series.into_column()
}

fn attribute_text(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Text(v) => Some(v.clone()),
        AttributeValue::Integer(v) => Some(v.to_string()),
        AttributeValue::Float(v) => Some(survival_common::format_numeric(*v)),
        AttributeValue::Boolean(v) => Some(v.to_string()),
        AttributeValue::Missing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_attribute_keeps_types() {
        assert_eq!(any_to_attribute(AnyValue::Int64(3)), AttributeValue::Integer(3));
        assert_eq!(any_to_attribute(AnyValue::Float64(1.5)), AttributeValue::Float(1.5));
        assert_eq!(any_to_attribute(AnyValue::Boolean(true)), AttributeValue::Boolean(true));
        assert_eq!(
            any_to_attribute(AnyValue::String("RD")),
            AttributeValue::Text("RD".to_string())
        );
        assert_eq!(any_to_attribute(AnyValue::String(" ")), AttributeValue::Missing);
        assert_eq!(any_to_attribute(AnyValue::Null), AttributeValue::Missing);
    }

    #[test]
    fn test_kind_merge() {
        assert_eq!(
            AttributeKind::Integer.merge(AttributeKind::Float),
            AttributeKind::Float
        );
        assert_eq!(
            AttributeKind::Empty.merge(AttributeKind::Boolean),
            AttributeKind::Boolean
        );
        assert_eq!(
            AttributeKind::Boolean.merge(AttributeKind::Integer),
            AttributeKind::Text
        );
    }

    #[test]
    fn test_attribute_column_mixed_numbers_become_float() {
        let a = AttributeValue::Integer(2);
        let b = AttributeValue::Float(0.5);
        let c = AttributeValue::Missing;
        let column = attribute_column("DOSE", &[&a, &b, &c]);
        let values = column.f64().unwrap();
        assert_eq!(values.get(0), Some(2.0));
        assert_eq!(values.get(1), Some(0.5));
        assert_eq!(values.get(2), None);
    }

    #[test]
    fn test_attribute_column_text_fallback() {
        let a = AttributeValue::Boolean(true);
        let b = AttributeValue::Text("x".to_string());
        let column = attribute_column("FLAG", &[&a, &b]);
        let values = column.str().unwrap();
        assert_eq!(values.get(0), Some("true"));
        assert_eq!(values.get(1), Some("x"));
    }
}
