use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use survival_cli::config::RunConfig;
use survival_cli::logging::redact_value;
use survival_cli::types::{ExposureStage, RunSummary, SurvivalStage};
use survival_ingest::{read_csv_frame, write_csv_frame};
use survival_model::{ExposureAnomaly, SurvivalRecord};
use survival_transform::{
    build_survival_frame, expand_monthly, expand_survival_frame, exposure_records_frame,
};

use crate::cli::{BuildArgs, ExpandArgs, RunArgs};

const SURVIVAL_FILE: &str = "survival.csv";
const MONTHLY_FILE: &str = "monthly.csv";

pub fn run_build(args: &BuildArgs) -> Result<RunSummary> {
    let started = Instant::now();
    let mut config = RunConfig::load(args.common.config.as_deref())?;
    config.apply_survival(&args.columns.overrides(None));

    let mut summary = RunSummary::new("build", args.input.clone());
    summary.survival = Some(build_stage(&args.input, &args.output, &config)?.0);
    summary.elapsed_ms = started.elapsed().as_millis();
    Ok(summary)
}

pub fn run_expand(args: &ExpandArgs) -> Result<RunSummary> {
    let started = Instant::now();
    let mut config = RunConfig::load(args.common.config.as_deref())?;
    config.apply_exposure(&args.overrides());
    let columns = config.exposure_columns();

    let span = info_span!("expand", input = %args.input.display());
    let _guard = span.enter();
    let stage_start = Instant::now();
    let df = read_csv_frame(&args.input)
        .with_context(|| format!("read survival table {}", args.input.display()))?;
    let mut frame = expand_survival_frame(&df, &columns, config.checksum)
        .context("expand follow-up into months")?;
    log_anomalies(&frame.table.anomalies);
    write_csv_frame(&mut frame.data, &args.output)
        .with_context(|| format!("write monthly table {}", args.output.display()))?;
    info!(
        month_rows = frame.table.records.len(),
        duration_ms = stage_start.elapsed().as_millis(),
        "expand complete"
    );

    let mut summary = RunSummary::new("expand", args.input.clone());
    summary.exposure = Some(ExposureStage::new(
        args.output.clone(),
        config.checksum,
        &frame.table,
    ));
    summary.elapsed_ms = started.elapsed().as_millis();
    Ok(summary)
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let started = Instant::now();
    let mut config = RunConfig::load(args.common.config.as_deref())?;
    config.apply_survival(&args.columns.overrides(args.checksum));

    let survival_path = args.output_dir.join(SURVIVAL_FILE);
    let monthly_path = args.output_dir.join(MONTHLY_FILE);
    let (stage, records) = build_stage(&args.input, &survival_path, &config)?;

    let span = info_span!("expand", records = records.len());
    let _guard = span.enter();
    let stage_start = Instant::now();
    let table = expand_monthly(&records, config.checksum);
    log_anomalies(&table.anomalies);
    let columns = config.columns.exposure_columns();
    let mut data = exposure_records_frame(&table.records, &columns)
        .context("render monthly table")?;
    write_csv_frame(&mut data, &monthly_path)
        .with_context(|| format!("write monthly table {}", monthly_path.display()))?;
    info!(
        month_rows = table.records.len(),
        duration_ms = stage_start.elapsed().as_millis(),
        "expand complete"
    );

    let mut summary = RunSummary::new("run", args.input.clone());
    summary.survival = Some(stage);
    summary.exposure = Some(ExposureStage::new(monthly_path, config.checksum, &table));
    summary.elapsed_ms = started.elapsed().as_millis();
    Ok(summary)
}

/// Reads the cohort, builds the survival table and writes it to `output`.
fn build_stage(
    input: &Path,
    output: &Path,
    config: &RunConfig,
) -> Result<(SurvivalStage, Vec<SurvivalRecord>)> {
    let span = info_span!("build", input = %input.display(), priority = %config.priority);
    let _guard = span.enter();
    let stage_start = Instant::now();

    let df = read_csv_frame(input)
        .with_context(|| format!("read cohort {}", input.display()))?;
    let mut frame = build_survival_frame(&df, &config.columns, config.priority)
        .context("build survival table")?;
    write_csv_frame(&mut frame.data, output)
        .with_context(|| format!("write survival table {}", output.display()))?;
    info!(
        subjects = frame.records.len(),
        duration_ms = stage_start.elapsed().as_millis(),
        "build complete"
    );

    let stage = SurvivalStage::new(output.to_path_buf(), config.priority, &frame.records);
    Ok((stage, frame.records))
}

fn log_anomalies(anomalies: &[ExposureAnomaly]) {
    for anomaly in anomalies {
        if let Some(subject) = anomaly.subject() {
            debug!(
                kind = anomaly.kind(),
                subject = redact_value(subject),
                "anomalous subject"
            );
        }
    }
}
