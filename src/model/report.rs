//! Batch model: run every (dataset, benchmark, scale) in the catalog through selection,
//! parsing and summarizing, and collect the outcomes for rendering.

use crate::config::{Catalog, LogFileDescriptor};
use crate::error::AnalysisError;
use crate::log::{LineFormat, parse_log_file};
use crate::model::summary::{SeriesSummary, summarize};
use crate::select::{discovered_scales, scan_log_dir, select_latest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub dataset: String,
    pub benchmark: String,
    pub scale: u32,
    pub path: String,
    pub format: LineFormat,
    pub summary: SeriesSummary,
    /// Throughput as a percentage of the best run on the same dataset.
    pub normalized_throughput_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub dataset: String,
    pub benchmark: String,
    pub scale: u32,
    /// Set when a log was selected but could not be summarized.
    pub path: Option<String>,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsView {
    pub combinations: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    /// Dataset order for rendering.
    pub datasets: Vec<String>,
    pub runs: Vec<RunRecord>,
    pub failures: Vec<FailureRecord>,
    pub totals: TotalsView,

    /// Display names; only the renderer reads these.
    pub benchmark_labels: BTreeMap<String, String>,
    pub dataset_aliases: BTreeMap<String, String>,
}

/// Parse and summarize one selected log.
pub fn analyze_log(
    desc: &LogFileDescriptor,
    catalog: &Catalog,
    format: Option<LineFormat>,
) -> Result<(LineFormat, SeriesSummary), AnalysisError> {
    let requests = catalog.requests_for(&desc.dataset)?;
    let series = parse_log_file(&desc.path, format)?;
    let summary = summarize(&series, requests)?;
    Ok((series.format, summary))
}

/// Build report data from the logs in `log_dir`.
///
/// A combination without a log or with an unusable log becomes a failure record; only an
/// unreadable directory fails the whole report.
pub fn build_report_data(
    log_dir: &Path,
    catalog: &Catalog,
    format: Option<LineFormat>,
) -> Result<ReportData, AnalysisError> {
    let available = scan_log_dir(log_dir)?;

    let mut runs: Vec<RunRecord> = Vec::new();
    let mut failures: Vec<FailureRecord> = Vec::new();

    for dataset in &catalog.datasets {
        for benchmark in &catalog.benchmarks {
            let scales = if catalog.scales.is_empty() {
                discovered_scales(&available, benchmark, dataset)
            } else {
                catalog.scales.clone()
            };

            for scale in scales {
                let fail = |path: Option<String>, err: AnalysisError| {
                    log::warn!(
                        "skipping {} {} scale {}: {}",
                        benchmark,
                        dataset,
                        scale,
                        err
                    );
                    FailureRecord {
                        dataset: dataset.clone(),
                        benchmark: benchmark.clone(),
                        scale,
                        path,
                        kind: err.kind().to_string(),
                        message: err.to_string(),
                    }
                };

                let Some(desc) = select_latest(&available, benchmark, dataset, scale) else {
                    failures.push(fail(
                        None,
                        AnalysisError::NotFound {
                            benchmark: benchmark.clone(),
                            dataset: dataset.clone(),
                            scale,
                        },
                    ));
                    continue;
                };

                let path = desc.path.display().to_string();
                log::info!("{} {} scale {}: using {}", benchmark, dataset, scale, path);

                match analyze_log(desc, catalog, format) {
                    Ok((detected, summary)) => runs.push(RunRecord {
                        dataset: dataset.clone(),
                        benchmark: benchmark.clone(),
                        scale,
                        path,
                        format: detected,
                        summary,
                        normalized_throughput_pct: 0.0,
                    }),
                    Err(err) => failures.push(fail(Some(path), err)),
                }
            }
        }
    }

    normalize_throughput(&mut runs);

    Ok(ReportData {
        datasets: catalog.datasets.clone(),
        totals: TotalsView {
            combinations: runs.len() + failures.len(),
            succeeded: runs.len(),
            failed: failures.len(),
        },
        runs,
        failures,
        benchmark_labels: catalog.benchmark_labels.clone(),
        dataset_aliases: catalog.dataset_aliases.clone(),
    })
}

/// Set each run's throughput as a percentage of the highest throughput on its dataset.
pub fn normalize_throughput(runs: &mut [RunRecord]) {
    let mut best: BTreeMap<String, f64> = BTreeMap::new();
    for run in runs.iter() {
        let entry = best.entry(run.dataset.clone()).or_insert(0.0);
        *entry = entry.max(run.summary.throughput);
    }

    for run in runs.iter_mut() {
        let max = best.get(&run.dataset).copied().unwrap_or(0.0);
        // Throughput is positive for every summarized run, so max is too.
        run.normalized_throughput_pct = if max > 0.0 {
            run.summary.throughput / max * 100.0
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(dataset: &str, benchmark: &str, throughput: f64) -> RunRecord {
        RunRecord {
            dataset: dataset.to_string(),
            benchmark: benchmark.to_string(),
            scale: 1,
            path: String::new(),
            format: LineFormat::Network,
            summary: SeriesSummary {
                samples: 11,
                duration_secs: 10.0,
                throughput,
                avg_cpu_pct: 0.0,
                avg_network_mb: 0.0,
                avg_disk_mb: None,
                avg_active_connections: None,
                avg_current_rpcs: None,
            },
            normalized_throughput_pct: 0.0,
        }
    }

    #[test]
    fn normalizes_per_dataset() {
        let mut runs = vec![
            run("IBM", "ttl_bench", 500.0),
            run("IBM", "update_bench", 1000.0),
            run("Poisson", "ttl_bench", 20.0),
            run("IBM", "oracle_bench", 250.0),
            run("Poisson", "update_bench", 5.0),
        ];
        normalize_throughput(&mut runs);
        let pct: Vec<f64> = runs.iter().map(|r| r.normalized_throughput_pct).collect();
        assert_eq!(pct, vec![50.0, 100.0, 100.0, 25.0, 25.0]);
    }

    #[test]
    fn normalizing_nothing_is_fine() {
        let mut runs: Vec<RunRecord> = vec![];
        normalize_throughput(&mut runs);
        assert!(runs.is_empty());
    }
}
