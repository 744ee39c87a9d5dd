//! secmetrics core library.
//!
//! This crate exposes programmatic APIs for collecting per-release security
//! bug tracking metrics from a Bugzilla-compatible tracker's search API.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `client`: Search filters and the blocking tracker client.
//! - `metrics`: Aggregation of query results into per-release counts.
//! - `models`: Data models for bug records, result sets, and aggregates.
//! - `output`: Human/JSON printers and the append-only artifact writer.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod client;
pub mod config;
pub mod metrics;
pub mod models;
pub mod output;
pub mod utils;
