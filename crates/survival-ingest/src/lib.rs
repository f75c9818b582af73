//! Survival table ingestion.
//!
//! Loads cohort extracts from CSV into Polars DataFrames and writes the
//! survival and monthly tables back out.
//!
//! Every input column is read as text. Date parsing and type decisions
//! belong to the survival engine, which can name the offending subject.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use survival_ingest::{read_csv_frame, write_csv_frame};
//!
//! let mut df = read_csv_frame(Path::new("cohort.csv"))?;
//! write_csv_frame(&mut df, Path::new("out/copy.csv"))?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV ===
pub use csv::{read_csv_frame, validate_encoding, write_csv_frame};
