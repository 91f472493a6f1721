//! Config layer: catalog.json schema and the log filename grammar.
//!
//! Kept apart from line parsing and rendering. It owns:
//! - LogFileDescriptor (what a log's name says about it)
//! - Catalog (datasets, benchmarks, request counts, display labels)

pub mod catalog;
pub mod filename;

pub use catalog::{Catalog, CatalogSpec};
pub use filename::{DEFAULT_SCALE, FilenameGrammar, LogFileDescriptor};
