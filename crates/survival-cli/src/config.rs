//! Run configuration loaded from TOML and overridden by command-line flags.
//!
//! ```toml
//! priority = "primary"
//! checksum = 1095
//!
//! [columns]
//! id = "NEWNHSNO"
//! start = "cohort_entry"
//! extras = ["AGE", "REGION"]
//!
//! [exposure]
//! end = "exit_date"
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.
//! `[exposure]` only matters to `survival expand`; when absent it mirrors
//! `[columns]`, matching what `survival build` writes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use survival_model::{EndEventPriority, ExposureColumns, SurvivalColumns};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub columns: SurvivalColumns,
    pub exposure: Option<ExposureColumns>,
    pub priority: EndEventPriority,
    pub checksum: Option<i64>,
}

/// Flag values for the builder input mapping. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct SurvivalOverrides {
    pub id: Option<String>,
    pub start: Option<String>,
    pub primary: Option<String>,
    pub competing: Option<String>,
    pub censor: Option<String>,
    /// Replaces the configured passthroughs when non-empty.
    pub extras: Vec<String>,
    pub priority: Option<EndEventPriority>,
    pub checksum: Option<i64>,
}

/// Flag values for the expander input mapping.
#[derive(Debug, Clone, Default)]
pub struct ExposureOverrides {
    pub id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub extras: Vec<String>,
    pub checksum: Option<i64>,
}

impl RunConfig {
    /// Loads the configuration file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Expander mapping: the `[exposure]` table, else derived from `[columns]`.
    pub fn exposure_columns(&self) -> ExposureColumns {
        self.exposure
            .clone()
            .unwrap_or_else(|| self.columns.exposure_columns())
    }

    pub fn apply_survival(&mut self, overrides: &SurvivalOverrides) {
        let columns = &mut self.columns;
        replace(&mut columns.id, overrides.id.as_ref());
        replace(&mut columns.start, overrides.start.as_ref());
        replace(&mut columns.primary, overrides.primary.as_ref());
        replace(&mut columns.competing, overrides.competing.as_ref());
        replace(&mut columns.censor, overrides.censor.as_ref());
        if !overrides.extras.is_empty() {
            columns.extras.clone_from(&overrides.extras);
        }
        if let Some(priority) = overrides.priority {
            self.priority = priority;
        }
        if overrides.checksum.is_some() {
            self.checksum = overrides.checksum;
        }
    }

    pub fn apply_exposure(&mut self, overrides: &ExposureOverrides) {
        let mut exposure = self.exposure_columns();
        replace(&mut exposure.id, overrides.id.as_ref());
        replace(&mut exposure.start, overrides.start.as_ref());
        replace(&mut exposure.end, overrides.end.as_ref());
        if !overrides.extras.is_empty() {
            exposure.extras.clone_from(&overrides.extras);
        }
        self.exposure = Some(exposure);
        if overrides.checksum.is_some() {
            self.checksum = overrides.checksum;
        }
    }
}

fn replace(target: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}
