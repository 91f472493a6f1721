//! Offline analysis of cache benchmark load-tracker logs.
//!
//! A benchmark run writes one log per (benchmark, dataset, scale), named
//! `<benchmark>_<dataset>_scale<N>_<YYYYMMDD>_<HHMMSS>.log`, with one resource line per
//! second. This crate picks the newest log per combination, parses the resource lines,
//! and reduces each run to a duration, a throughput and trimmed averages of CPU, network
//! and disk usage. Throughput is then normalized against the best run per dataset.

pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod render;
pub mod select;

pub use error::AnalysisError;

pub type Result<T> = anyhow::Result<T>;
