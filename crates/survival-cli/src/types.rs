use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use survival_model::{EndEventPriority, EventCategory, ExposureAnomaly, SurvivalRecord};
use survival_transform::ExposureTable;

/// Subjects per end reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EndReasonCounts {
    pub primary: usize,
    pub competing: usize,
    pub censor: usize,
}

impl EndReasonCounts {
    pub fn from_records(records: &[SurvivalRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.end_reason {
                EventCategory::Primary => counts.primary += 1,
                EventCategory::Competing => counts.competing += 1,
                EventCategory::Censor => counts.censor += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.primary + self.competing + self.censor
    }

    pub fn get(&self, category: EventCategory) -> usize {
        match category {
            EventCategory::Primary => self.primary,
            EventCategory::Competing => self.competing,
            EventCategory::Censor => self.censor,
        }
    }
}

/// Builder stage outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SurvivalStage {
    pub output: PathBuf,
    pub priority: EndEventPriority,
    pub subjects: usize,
    pub end_reasons: EndReasonCounts,
    pub person_days: i64,
}

impl SurvivalStage {
    pub fn new(output: PathBuf, priority: EndEventPriority, records: &[SurvivalRecord]) -> Self {
        Self {
            output,
            priority,
            subjects: records.len(),
            end_reasons: EndReasonCounts::from_records(records),
            person_days: records.iter().map(|record| record.time_at_risk).sum(),
        }
    }
}

/// Expander stage outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureStage {
    pub output: PathBuf,
    pub subjects: usize,
    pub month_rows: usize,
    pub person_days: i64,
    pub expected_checksum: Option<i64>,
    pub anomalies: Vec<ExposureAnomaly>,
}

impl ExposureStage {
    pub fn new(output: PathBuf, expected_checksum: Option<i64>, table: &ExposureTable) -> Self {
        Self {
            output,
            subjects: table.subject_count(),
            month_rows: table.records.len(),
            person_days: table.total_time(),
            expected_checksum,
            anomalies: table.anomalies.clone(),
        }
    }
}

/// What a command did; printed as a summary and optionally saved as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub command: &'static str,
    pub input: PathBuf,
    pub survival: Option<SurvivalStage>,
    pub exposure: Option<ExposureStage>,
    pub elapsed_ms: u128,
}

impl RunSummary {
    pub fn new(command: &'static str, input: PathBuf) -> Self {
        Self {
            command,
            input,
            survival: None,
            exposure: None,
            elapsed_ms: 0,
        }
    }

    pub fn anomalies(&self) -> &[ExposureAnomaly] {
        match &self.exposure {
            Some(stage) => &stage.anomalies,
            None => &[],
        }
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies().is_empty()
    }

    /// Writes the summary as pretty-printed JSON.
    pub fn write_report(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize run report")?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use survival_model::MonthLabel;

    fn record(id: &str, end_reason: EventCategory, time_at_risk: i64) -> SurvivalRecord {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        SurvivalRecord {
            id: id.to_string(),
            attributes: vec![],
            start_date: start,
            primary_event_date: None,
            competing_event_date: None,
            censor_date: None,
            end_date: start,
            end_reason,
            time_at_risk,
        }
    }

    #[test]
    fn test_end_reason_counts() {
        let records = vec![
            record("1", EventCategory::Primary, 10),
            record("2", EventCategory::Censor, 20),
            record("3", EventCategory::Censor, 30),
        ];
        let counts = EndReasonCounts::from_records(&records);
        assert_eq!(counts.get(EventCategory::Censor), 2);
        assert_eq!(counts.competing, 0);
        assert_eq!(counts.total(), 3);

        let stage = SurvivalStage::new(PathBuf::from("s.csv"), EndEventPriority::First, &records);
        assert_eq!(stage.person_days, 60);
    }

    #[test]
    fn test_anomalies_come_from_exposure_stage() {
        let mut summary = RunSummary::new("run", PathBuf::from("in.csv"));
        assert!(!summary.has_anomalies());
        let table = ExposureTable {
            records: vec![],
            anomalies: vec![ExposureAnomaly::ZeroDayMonth {
                subject: "1".to_string(),
                month: MonthLabel::new(2021, 2).unwrap(),
            }],
        };
        summary.exposure = Some(ExposureStage::new(PathBuf::from("m.csv"), None, &table));
        assert!(summary.has_anomalies());
    }
}
