//! Data model for survival dataset construction.
//!
//! - **record**: raw subject events, survival records and monthly exposure records
//! - **enums**: end event priority and terminal event categories
//! - **month**: chronologically ordered month labels (`Jan-21`)
//! - **anomaly**: non-fatal data-quality findings
//! - **columns**: column-name contracts of the tabular boundary
//! - **error**: fatal error classes

pub mod anomaly;
pub mod columns;
pub mod enums;
pub mod error;
pub mod month;
pub mod record;

pub use anomaly::ExposureAnomaly;
pub use columns::{
    DEFAULT_ID_COLUMN, EXPOSURE_OUTPUT_COLUMNS, ExposureColumns, SURVIVAL_OUTPUT_COLUMNS,
    SurvivalColumns,
};
pub use enums::{EndEventPriority, EventCategory};
pub use error::{Result, SurvivalError};
pub use month::MonthLabel;
pub use record::{
    Attribute, AttributeValue, FollowUp, MonthlyExposureRecord, SubjectInterval,
    SubjectRawEvents, SurvivalRecord, TerminalEvents,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn terminal_candidates_skip_absent_dates() {
        let events = TerminalEvents {
            primary: None,
            competing: NaiveDate::from_ymd_opt(2021, 4, 20),
            censor: NaiveDate::from_ymd_opt(2021, 6, 1),
        };
        let categories: Vec<EventCategory> = events.candidates().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![EventCategory::Competing, EventCategory::Censor]
        );
        assert!(!events.is_empty());
        assert!(TerminalEvents::default().is_empty());
    }

    #[test]
    fn anomaly_serializes_with_kind_tag() {
        let anomaly = ExposureAnomaly::ChecksumMismatch {
            expected: 55,
            actual: 54,
        };
        let json = serde_json::to_value(&anomaly).expect("serialize anomaly");
        assert_eq!(json["kind"], "checksum_mismatch");
        assert_eq!(json["expected"], 55);
        assert_eq!(anomaly.kind(), "checksum_mismatch");
        assert!(anomaly.subject().is_none());
    }
}
