//! Error types for survival dataset construction.

use chrono::NaiveDate;
use thiserror::Error;

/// Fatal failures of a survival build or expansion.
///
/// Every variant aborts the whole batch. Non-fatal data-quality findings are
/// reported as [`ExposureAnomaly`](crate::ExposureAnomaly) values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurvivalError {
    /// A mandatory value is absent or could not be parsed.
    #[error("invalid value for subject '{subject}' in column '{column}': {reason}")]
    Validation {
        subject: String,
        column: String,
        reason: String,
    },

    /// The subject has no primary, competing or censor date.
    #[error("subject '{subject}' has no primary, competing or censor date")]
    MissingTerminalEvent { subject: String },

    /// The resolved end date lies before the start date.
    #[error("subject '{subject}' ends on {end_date} before its start date {start_date}")]
    InvariantViolation {
        subject: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// An unsupported configuration value was supplied.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A mapped column is absent from the input table.
    #[error("column '{column}' not found in input table")]
    ColumnNotFound { column: String },

    /// A tabular operation failed.
    #[error("table operation failed: {message}")]
    Frame { message: String },
}

impl SurvivalError {
    /// Convenience constructor for [`SurvivalError::Validation`].
    pub fn validation(
        subject: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            subject: subject.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::MissingTerminalEvent { .. } => "missing_terminal_event",
            Self::InvariantViolation { .. } => "invariant_violation",
            Self::Configuration(_) => "configuration",
            Self::ColumnNotFound { .. } => "column_not_found",
            Self::Frame { .. } => "frame",
        }
    }
}

pub type Result<T> = std::result::Result<T, SurvivalError>;
