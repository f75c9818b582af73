//! Shared utilities for the survival workspace.
//!
//! This crate provides Polars `AnyValue` helpers used by the tabular
//! adapters when reading identifiers, dates and passthrough cells.

pub mod any_value;

// Re-export commonly used functions at crate root for convenience
pub use any_value::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, format_numeric,
};
