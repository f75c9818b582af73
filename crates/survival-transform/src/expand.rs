//! Monthly person-time expansion.
//!
//! Splits each follow-up interval into one row per calendar month touched,
//! carrying the days contributed to that month (see [`crate::calendar`]).
//! Output order is stable: subjects in input order, months chronological.
//!
//! Data-quality findings never abort the expansion. They are collected as
//! [`ExposureAnomaly`] values next to the records and logged at `warn`.

use tracing::{info, warn};

use survival_model::{ExposureAnomaly, FollowUp, MonthlyExposureRecord};

use crate::calendar::{exposure_days, inclusive_days, month_span};

/// Largest number of days any calendar month can contribute.
pub const MAX_MONTH_DAYS: u32 = 31;

/// Expanded monthly rows plus the anomalies found while producing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposureTable {
    pub records: Vec<MonthlyExposureRecord>,
    pub anomalies: Vec<ExposureAnomaly>,
}

impl ExposureTable {
    /// Total exposure days across all records.
    pub fn total_time(&self) -> i64 {
        self.records.iter().map(|record| i64::from(record.time)).sum()
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    /// Number of distinct subjects with at least one month row.
    pub fn subject_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<&str> = None;
        for record in &self.records {
            if previous != Some(record.id.as_str()) {
                count += 1;
                previous = Some(record.id.as_str());
            }
        }
        count
    }
}

/// Expands follow-up intervals into monthly exposure rows.
///
/// When `expected_checksum` is given, the batch total of exposure days is
/// compared against it and a mismatch is reported as
/// [`ExposureAnomaly::ChecksumMismatch`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use survival_model::SubjectInterval;
/// use survival_transform::expand::expand_monthly;
///
/// let interval = SubjectInterval {
///     id: "1".to_string(),
///     attributes: vec![],
///     start_date: NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2021, 3, 10).unwrap(),
/// };
/// let table = expand_monthly(&[interval], Some(55));
/// let days: Vec<u32> = table.records.iter().map(|r| r.time).collect();
/// assert_eq!(days, vec![17, 28, 10]);
/// assert!(!table.has_anomalies());
/// ```
pub fn expand_monthly<R: FollowUp>(rows: &[R], expected_checksum: Option<i64>) -> ExposureTable {
    let mut table = ExposureTable::default();
    for row in rows {
        expand_subject(row, &mut table);
    }

    let total = table.total_time();
    if let Some(expected) = expected_checksum
        && expected != total
    {
        table.anomalies.push(ExposureAnomaly::ChecksumMismatch {
            expected,
            actual: total,
        });
    }

    for anomaly in &table.anomalies {
        warn!(kind = anomaly.kind(), "{}", anomaly.message());
    }
    info!(
        subjects = rows.len(),
        month_rows = table.records.len(),
        person_days = total,
        anomalies = table.anomalies.len(),
        "monthly expansion complete"
    );
    table
}

fn expand_subject<R: FollowUp>(row: &R, table: &mut ExposureTable) {
    let start = row.start_date();
    let end = row.end_date();
    if end < start {
        table.anomalies.push(ExposureAnomaly::InvertedInterval {
            subject: row.subject_id().to_string(),
            start_date: start,
            end_date: end,
        });
        return;
    }

    let mut subject_total = 0i64;
    for month in month_span(start, end) {
        let time = exposure_days(month, start, end);
        if time == 0 {
            table.anomalies.push(ExposureAnomaly::ZeroDayMonth {
                subject: row.subject_id().to_string(),
                month,
            });
            continue;
        }
        debug_assert!(time <= MAX_MONTH_DAYS);
        subject_total += i64::from(time);
        table.records.push(MonthlyExposureRecord {
            id: row.subject_id().to_string(),
            attributes: row.attributes().to_vec(),
            end_date: end,
            month,
            time,
        });
    }

    let expected = inclusive_days(start, end);
    if subject_total != expected {
        table.anomalies.push(ExposureAnomaly::SubjectChecksumMismatch {
            subject: row.subject_id().to_string(),
            expected,
            actual: subject_total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use survival_model::{MonthLabel, SubjectInterval};

    fn interval(id: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> SubjectInterval {
        SubjectInterval {
            id: id.to_string(),
            attributes: vec![],
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_inverted_interval_reported_not_expanded() {
        let table = expand_monthly(&[interval("1", (2021, 3, 1), (2021, 1, 31))], None);
        assert!(table.records.is_empty());
        assert_eq!(table.anomalies.len(), 1);
        assert_eq!(table.anomalies[0].kind(), "inverted_interval");
    }

    #[test]
    fn test_inverted_interval_within_one_month() {
        let table = expand_monthly(&[interval("1", (2021, 3, 20), (2021, 3, 5))], None);
        assert!(table.records.is_empty());
        assert_eq!(table.anomalies[0].kind(), "inverted_interval");
    }

    #[test]
    fn test_checksum_match_is_silent() {
        let table = expand_monthly(&[interval("1", (2021, 1, 15), (2021, 1, 20))], Some(6));
        assert!(!table.has_anomalies());
    }

    #[test]
    fn test_checksum_mismatch_reported() {
        let table = expand_monthly(&[interval("1", (2021, 1, 15), (2021, 1, 20))], Some(7));
        assert_eq!(
            table.anomalies,
            vec![ExposureAnomaly::ChecksumMismatch {
                expected: 7,
                actual: 6
            }]
        );
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn test_subject_count_follows_input_order() {
        let table = expand_monthly(
            &[
                interval("a", (2021, 1, 1), (2021, 2, 1)),
                interval("b", (2021, 1, 1), (2021, 1, 1)),
            ],
            None,
        );
        assert_eq!(table.subject_count(), 2);
        let ids: Vec<&str> = table.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a", "b"]);
        assert_eq!(table.records[1].month, MonthLabel::new(2021, 2).unwrap());
    }

    #[test]
    fn test_empty_batch() {
        let rows: Vec<SubjectInterval> = Vec::new();
        let table = expand_monthly(&rows, None);
        assert!(table.records.is_empty());
        assert_eq!(table.total_time(), 0);
    }
}
