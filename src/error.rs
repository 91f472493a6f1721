//! Per-combination analysis failures.
//!
//! Each variant is a distinct outcome a batch records and moves past; none of
//! them is retried since the input files are static.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no log file for benchmark {benchmark}, dataset {dataset}, scale {scale}")]
    NotFound {
        benchmark: String,
        dataset: String,
        scale: u32,
    },

    #[error("no parseable samples")]
    EmptyData,

    #[error("{samples} samples, at least {required} needed for a trimmed mean")]
    InsufficientData { samples: usize, required: usize },

    #[error("elapsed duration is {duration}s, throughput is undefined")]
    DegenerateDuration { duration: f64 },

    #[error("timestamp at line {line} is earlier than the previous sample")]
    OutOfOrder { line: usize },

    #[error("no request count configured for dataset {dataset}")]
    UnknownDataset { dataset: String },

    #[error("read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    /// Stable identifier used in report failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::NotFound { .. } => "not_found",
            AnalysisError::EmptyData => "empty_data",
            AnalysisError::InsufficientData { .. } => "insufficient_data",
            AnalysisError::DegenerateDuration { .. } => "degenerate_duration",
            AnalysisError::OutOfOrder { .. } => "out_of_order",
            AnalysisError::UnknownDataset { .. } => "unknown_dataset",
            AnalysisError::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_combination() {
        let e = AnalysisError::NotFound {
            benchmark: "ttl_bench".into(),
            dataset: "IBM".into(),
            scale: 10,
        };
        assert_eq!(e.kind(), "not_found");
        assert_eq!(
            e.to_string(),
            "no log file for benchmark ttl_bench, dataset IBM, scale 10"
        );
    }

    #[test]
    fn io_keeps_source() {
        let e = AnalysisError::Io {
            path: PathBuf::from("/nope/x.log"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(e.kind(), "io");
        assert_eq!(e.to_string(), "read /nope/x.log");
        assert!(std::error::Error::source(&e).is_some());
    }
}
