//! Tests for run configuration loading and flag overrides.

use std::fs;

use survival_cli::config::{ExposureOverrides, RunConfig, SurvivalOverrides};
use survival_model::{DEFAULT_ID_COLUMN, EndEventPriority};

#[test]
fn test_empty_config_uses_defaults() {
    let config = RunConfig::from_toml("").unwrap();
    assert_eq!(config, RunConfig::default());
    assert_eq!(config.columns.id, DEFAULT_ID_COLUMN);
    assert_eq!(config.priority, EndEventPriority::First);
    assert_eq!(config.checksum, None);
}

#[test]
fn test_config_file_values() {
    let config = RunConfig::from_toml(
        r#"
priority = "competing"
checksum = 1095

[columns]
id = "PATIENT"
start = "cohort_entry"
extras = ["AGE", "REGION"]
"#,
    )
    .unwrap();
    assert_eq!(config.priority, EndEventPriority::Competing);
    assert_eq!(config.checksum, Some(1095));
    assert_eq!(config.columns.id, "PATIENT");
    assert_eq!(config.columns.start, "cohort_entry");
    assert_eq!(config.columns.primary, "primary_event");

    let exposure = config.exposure_columns();
    assert_eq!(exposure.id, "PATIENT");
    assert_eq!(exposure.start, "start_date");
    assert_eq!(exposure.extras, vec!["AGE", "REGION"]);
}

#[test]
fn test_invalid_priority_is_rejected() {
    let err = RunConfig::from_toml(r#"priority = "earliest""#).unwrap_err();
    assert!(err.to_string().contains("earliest"));
}

#[test]
fn test_unknown_key_is_rejected() {
    assert!(RunConfig::from_toml("priorty = \"first\"").is_err());
}

#[test]
fn test_flags_override_file() {
    let mut config = RunConfig::from_toml(
        r#"
priority = "primary"

[columns]
extras = ["AGE"]
"#,
    )
    .unwrap();
    config.apply_survival(&SurvivalOverrides {
        competing: Some("DEATH_DATE".to_string()),
        priority: Some(EndEventPriority::Competing),
        checksum: Some(10),
        ..SurvivalOverrides::default()
    });
    assert_eq!(config.columns.competing, "DEATH_DATE");
    assert_eq!(config.columns.extras, vec!["AGE"]);
    assert_eq!(config.priority, EndEventPriority::Competing);
    assert_eq!(config.checksum, Some(10));
}

#[test]
fn test_exposure_overrides_start_from_columns() {
    let mut config = RunConfig::from_toml("[columns]\nid = \"PATIENT\"\n").unwrap();
    config.apply_exposure(&ExposureOverrides {
        end: Some("exit_date".to_string()),
        ..ExposureOverrides::default()
    });
    let exposure = config.exposure_columns();
    assert_eq!(exposure.id, "PATIENT");
    assert_eq!(exposure.end, "exit_date");
}

#[test]
fn test_load_reads_file_and_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survival.toml");
    fs::write(&path, "checksum = 55\n").unwrap();
    assert_eq!(RunConfig::load(Some(&path)).unwrap().checksum, Some(55));

    let missing = dir.path().join("absent.toml");
    let err = RunConfig::load(Some(&missing)).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));

    assert_eq!(RunConfig::load(None).unwrap(), RunConfig::default());
}
