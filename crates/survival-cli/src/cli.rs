//! CLI argument definitions for the survival tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use survival_cli::config::{ExposureOverrides, SurvivalOverrides};
use survival_model::{EndEventPriority, SurvivalError};

#[derive(Parser)]
#[command(
    name = "survival",
    version,
    about = "Build survival datasets and monthly person-time tables",
    long_about = "Build survival datasets from cohort event dates.\n\n\
                  Resolves one follow-up interval per subject from primary, competing\n\
                  and censoring dates, then splits follow-up into calendar months."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow subject identifiers in logs and summaries.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve follow-up intervals and write the survival table.
    Build(BuildArgs),

    /// Split a survival table into monthly person-time rows.
    Expand(ExpandArgs),

    /// Build the survival table and expand it in one pass.
    Run(RunArgs),
}

/// Options shared by every command.
#[derive(Args)]
pub struct CommonArgs {
    /// TOML file with column mapping, priority and checksum.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Exit with status 2 when the expansion reports anomalies.
    #[arg(long = "strict-anomalies")]
    pub strict_anomalies: bool,

    /// Save the run summary as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Builder input mapping.
#[derive(Args)]
pub struct SurvivalColumnArgs {
    /// Subject identifier column.
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Start of follow-up column.
    #[arg(long = "start-column", value_name = "NAME")]
    pub start_column: Option<String>,

    /// Primary event date column.
    #[arg(long = "primary-column", value_name = "NAME")]
    pub primary_column: Option<String>,

    /// Competing event date column.
    #[arg(long = "competing-column", value_name = "NAME")]
    pub competing_column: Option<String>,

    /// Censoring date column.
    #[arg(long = "censor-column", value_name = "NAME")]
    pub censor_column: Option<String>,

    /// Passthrough column copied to the output (repeatable).
    #[arg(long = "extra", value_name = "NAME")]
    pub extra: Vec<String>,

    /// Which event ends follow-up when both primary and competing dates exist.
    #[arg(long = "priority", value_name = "first|primary|competing", value_parser = parse_priority)]
    pub priority: Option<EndEventPriority>,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Cohort CSV with one row per subject.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Survival table to write.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: PathBuf,

    #[command(flatten)]
    pub columns: SurvivalColumnArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser)]
pub struct ExpandArgs {
    /// Survival table with one row per subject.
    #[arg(value_name = "SURVIVAL_CSV")]
    pub input: PathBuf,

    /// Monthly table to write.
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: PathBuf,

    /// Subject identifier column.
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Start of follow-up column.
    #[arg(long = "start-column", value_name = "NAME")]
    pub start_column: Option<String>,

    /// End of follow-up column.
    #[arg(long = "end-column", value_name = "NAME")]
    pub end_column: Option<String>,

    /// Passthrough column copied to every month (repeatable).
    #[arg(long = "extra", value_name = "NAME")]
    pub extra: Vec<String>,

    /// Expected total person-days across all months.
    #[arg(long = "checksum", value_name = "DAYS")]
    pub checksum: Option<i64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Cohort CSV with one row per subject.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving survival.csv and monthly.csv.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub columns: SurvivalColumnArgs,

    /// Expected total person-days across all months.
    #[arg(long = "checksum", value_name = "DAYS")]
    pub checksum: Option<i64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::Build(args) => &args.common,
            Self::Expand(args) => &args.common,
            Self::Run(args) => &args.common,
        }
    }
}

impl SurvivalColumnArgs {
    pub fn overrides(&self, checksum: Option<i64>) -> SurvivalOverrides {
        SurvivalOverrides {
            id: self.id_column.clone(),
            start: self.start_column.clone(),
            primary: self.primary_column.clone(),
            competing: self.competing_column.clone(),
            censor: self.censor_column.clone(),
            extras: self.extra.clone(),
            priority: self.priority,
            checksum,
        }
    }
}

impl ExpandArgs {
    pub fn overrides(&self) -> ExposureOverrides {
        ExposureOverrides {
            id: self.id_column.clone(),
            start: self.start_column.clone(),
            end: self.end_column.clone(),
            extras: self.extra.clone(),
            checksum: self.checksum,
        }
    }
}

fn parse_priority(value: &str) -> Result<EndEventPriority, SurvivalError> {
    value.parse()
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
