//! Normalization of raw cell values.
//!
//! - **datetime**: event date parsing at whole-day granularity

pub mod datetime;

// Re-export commonly used items
pub use datetime::{DateParseError, is_missing_value, parse_event_date};
