//! CLI library components for survival dataset construction.

#![allow(missing_docs)]

pub mod config;
pub mod logging;
pub mod types;
