//! Survival dataset construction.
//!
//! This crate turns raw per-subject event dates into person-time tables:
//!
//! - **normalization**: event date parsing at whole-day granularity
//! - **calendar**: month spans and per-month exposure days
//! - **builder**: one resolved follow-up interval per subject
//! - **expand**: calendar-month expansion with anomaly reporting
//! - **frame**: Polars DataFrame adapters around the builder and expander
//! - **data_utils**: DataFrame value extraction helpers

pub mod builder;
pub mod calendar;
pub mod data_utils;
pub mod expand;
pub mod frame;
pub mod normalization;

// Re-export common functions for external use
pub use builder::{build_survival_records, resolve_end_event};
pub use expand::{ExposureTable, MAX_MONTH_DAYS, expand_monthly};
pub use frame::{
    ExposureFrame, SurvivalFrame, build_survival_frame, expand_survival_frame,
    exposure_records_frame, intervals_from_frame, subjects_from_frame, survival_records_frame,
};
