//! Aggregation model: parsed series in, per-run summaries and report data out.

pub mod report;
pub mod summary;
pub mod timeline;

pub use report::{
    FailureRecord, ReportData, RunRecord, TotalsView, analyze_log, build_report_data,
    normalize_throughput,
};
pub use summary::{MIN_TRIMMED_SAMPLES, SeriesSummary, TRIM, summarize, throughput, trimmed_mean};
pub use timeline::{TimelineData, build_timeline};
