//! Log parsing for the load tracker's per-second resource lines.

pub mod parse;
pub mod row;
pub mod series;

pub use parse::{LinePatterns, parse_log_file, parse_log_text};
pub use row::{BYTES_PER_MB, ConnectionCounts, LineFormat, MetricSample};
pub use series::MetricSeries;
