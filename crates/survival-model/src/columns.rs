//! Column-name contracts for the tabular input and output boundaries.

use serde::{Deserialize, Serialize};

/// Default subject identifier column.
pub const DEFAULT_ID_COLUMN: &str = "NEWNHSNO";

/// Output column names of the survival table, after the identifier and
/// passthrough attributes.
pub const SURVIVAL_OUTPUT_COLUMNS: [&str; 6] = [
    "start_date",
    "primary_event_date",
    "competing_event_date",
    "censor_date",
    "end_date",
    "time_at_risk",
];

/// Output column names of the monthly table, after the identifier and
/// passthrough attributes.
pub const EXPOSURE_OUTPUT_COLUMNS: [&str; 3] = ["end_date", "month", "time"];

/// Where the builder finds each input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalColumns {
    pub id: String,
    pub start: String,
    pub primary: String,
    pub competing: String,
    pub censor: String,
    /// Passthrough columns, in output order.
    pub extras: Vec<String>,
}

impl Default for SurvivalColumns {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_COLUMN.to_string(),
            start: "start_event".to_string(),
            primary: "primary_event".to_string(),
            competing: "competing_event".to_string(),
            censor: "censor_date".to_string(),
            extras: Vec::new(),
        }
    }
}

impl SurvivalColumns {
    /// Every input column the builder reads, identifier first.
    pub fn required(&self) -> Vec<&str> {
        let mut names = vec![
            self.id.as_str(),
            self.start.as_str(),
            self.primary.as_str(),
            self.competing.as_str(),
            self.censor.as_str(),
        ];
        names.extend(self.extras.iter().map(String::as_str));
        names
    }

    /// The matching expander mapping for this builder's output.
    pub fn exposure_columns(&self) -> ExposureColumns {
        ExposureColumns {
            id: self.id.clone(),
            extras: self.extras.clone(),
            ..ExposureColumns::default()
        }
    }
}

/// Where the expander finds each survival field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureColumns {
    pub id: String,
    pub start: String,
    pub end: String,
    pub extras: Vec<String>,
}

impl Default for ExposureColumns {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_COLUMN.to_string(),
            start: "start_date".to_string(),
            end: "end_date".to_string(),
            extras: Vec::new(),
        }
    }
}

impl ExposureColumns {
    pub fn required(&self) -> Vec<&str> {
        let mut names = vec![self.id.as_str(), self.start.as_str(), self.end.as_str()];
        names.extend(self.extras.iter().map(String::as_str));
        names
    }
}
