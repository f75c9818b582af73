//! Non-fatal data-quality findings reported by the expander.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::MonthLabel;

/// A data-quality finding that does not abort the batch.
///
/// Anomalies are returned alongside the records; the caller decides whether
/// any of them should be treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExposureAnomaly {
    /// A month inside the enumerated range contributed no days.
    /// The zero-day row is left out of the output.
    ZeroDayMonth { subject: String, month: MonthLabel },

    /// The interval ends before it starts; no rows were produced for it.
    InvertedInterval {
        subject: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// A subject's monthly days do not add up to its interval length.
    SubjectChecksumMismatch {
        subject: String,
        expected: i64,
        actual: i64,
    },

    /// The batch total differs from the caller-supplied checksum.
    ChecksumMismatch { expected: i64, actual: i64 },
}

impl ExposureAnomaly {
    /// Short machine-friendly name of the anomaly class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ZeroDayMonth { .. } => "zero_day_month",
            Self::InvertedInterval { .. } => "inverted_interval",
            Self::SubjectChecksumMismatch { .. } => "subject_checksum_mismatch",
            Self::ChecksumMismatch { .. } => "checksum_mismatch",
        }
    }

    /// The subject concerned, if the anomaly is subject-level.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::ZeroDayMonth { subject, .. }
            | Self::InvertedInterval { subject, .. }
            | Self::SubjectChecksumMismatch { subject, .. } => Some(subject),
            Self::ChecksumMismatch { .. } => None,
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        match self {
            Self::ZeroDayMonth { month, .. } => {
                format!("month {month} contributed 0 days")
            }
            Self::InvertedInterval {
                start_date,
                end_date,
                ..
            } => format!("end date {end_date} precedes start date {start_date}"),
            Self::SubjectChecksumMismatch {
                expected, actual, ..
            } => format!("monthly days sum to {actual}, interval spans {expected}"),
            Self::ChecksumMismatch { expected, actual } => {
                format!("checksum ({actual}) != ({expected})")
            }
        }
    }
}
