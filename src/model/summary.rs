//! Per-run scalars derived from a parsed series.

use crate::error::AnalysisError;
use crate::log::MetricSeries;
use serde::Serialize;

/// Samples dropped from each end of a series before averaging (warm-up and cool-down).
pub const TRIM: usize = 5;

/// Smallest series a trimmed mean is defined for.
pub const MIN_TRIMMED_SAMPLES: usize = 2 * TRIM + 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub samples: usize,
    pub duration_secs: f64,
    /// Requests per second over the whole run.
    pub throughput: f64,
    pub avg_cpu_pct: f64,
    pub avg_network_mb: f64,
    pub avg_disk_mb: Option<f64>,
    pub avg_active_connections: Option<f64>,
    pub avg_current_rpcs: Option<f64>,
}

/// Mean of `values` without the first and last [`TRIM`] entries.
pub fn trimmed_mean(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.len() < MIN_TRIMMED_SAMPLES {
        return Err(AnalysisError::InsufficientData {
            samples: values.len(),
            required: MIN_TRIMMED_SAMPLES,
        });
    }
    let kept = &values[TRIM..values.len() - TRIM];
    Ok(kept.iter().sum::<f64>() / kept.len() as f64)
}

/// `requests / duration_secs`; a non-positive duration has no throughput.
pub fn throughput(requests: u64, duration_secs: f64) -> Result<f64, AnalysisError> {
    if duration_secs.is_nan() || duration_secs <= 0.0 {
        return Err(AnalysisError::DegenerateDuration {
            duration: duration_secs,
        });
    }
    Ok(requests as f64 / duration_secs)
}

fn optional_mean(values: Option<Vec<f64>>) -> Result<Option<f64>, AnalysisError> {
    values.map(|v| trimmed_mean(&v)).transpose()
}

/// Summarize one run that replayed `requests` requests.
pub fn summarize(series: &MetricSeries, requests: u64) -> Result<SeriesSummary, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::EmptyData);
    }

    let avg_cpu_pct = trimmed_mean(&series.cpu_pct())?;
    let avg_network_mb = trimmed_mean(&series.net_total_mb())?;
    let avg_disk_mb = optional_mean(series.disk_total_mb())?;
    let avg_active_connections = optional_mean(series.active_connections())?;
    let avg_current_rpcs = optional_mean(series.current_rpcs())?;

    let duration_secs = series.duration_secs();
    let rate = throughput(requests, duration_secs)?;

    Ok(SeriesSummary {
        samples: series.len(),
        duration_secs,
        throughput: rate,
        avg_cpu_pct,
        avg_network_mb,
        avg_disk_mb,
        avg_active_connections,
        avg_current_rpcs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::parse_log_text;
    use pretty_assertions::assert_eq;

    fn conn_line(sec: u32, cpu: u32, conns: u32) -> String {
        format!(
            "2024-01-01 00:{:02}:{:02} - CPU Utilization: {}% | usr: 1%, sys: 1%, idle: 98%, iowait: 0%, steal: 0% | Network recv: 1048576 bytes, send: 2097152 bytes | Disk read: 524288 bytes, write: 524288 bytes, number of active connections: {}, current_rpcs: 2",
            sec / 60,
            sec % 60,
            cpu,
            conns
        )
    }

    #[test]
    fn trimmed_mean_of_eleven_is_the_middle() {
        let v: Vec<f64> = (1..=11).map(|x| x as f64 * 10.0).collect();
        assert_eq!(trimmed_mean(&v).unwrap(), 60.0);
    }

    #[test]
    fn trimmed_mean_drops_both_ends() {
        let mut v = vec![1000.0; 5];
        v.extend([2.0, 4.0, 6.0]);
        v.extend(vec![-1000.0; 5]);
        assert_eq!(trimmed_mean(&v).unwrap(), 4.0);
    }

    #[test]
    fn trimmed_mean_needs_eleven() {
        let v = vec![1.0; 10];
        match trimmed_mean(&v).unwrap_err() {
            AnalysisError::InsufficientData { samples, required } => {
                assert_eq!(samples, 10);
                assert_eq!(required, 11);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(trimmed_mean(&[]).is_err());
    }

    #[test]
    fn throughput_is_exact_division() {
        assert_eq!(throughput(200_000, 40.0).unwrap(), 5000.0);
        assert_eq!(throughput(30_000, 7.0).unwrap(), 30_000.0 / 7.0);
    }

    #[test]
    fn zero_duration_has_no_throughput() {
        let err = throughput(200_000, 0.0).unwrap_err();
        assert_eq!(err.kind(), "degenerate_duration");
        assert!(throughput(1, f64::NAN).is_err());
    }

    #[test]
    fn summarizes_connections_log() {
        // 12 samples one second apart: cpu 10..120, connections 1..12.
        let text: Vec<String> = (0..12).map(|i| conn_line(i, (i + 1) * 10, i + 1)).collect();
        let series = parse_log_text(&text.join("\n"), None).unwrap();
        let s = summarize(&series, 1100).unwrap();

        assert_eq!(s.samples, 12);
        assert_eq!(s.duration_secs, 11.0);
        assert_eq!(s.throughput, 100.0);
        // Kept samples are indices 5 and 6.
        assert_eq!(s.avg_cpu_pct, 65.0);
        assert_eq!(s.avg_network_mb, 3.0);
        assert_eq!(s.avg_disk_mb, Some(1.0));
        assert_eq!(s.avg_active_connections, Some(6.5));
        assert_eq!(s.avg_current_rpcs, Some(2.0));
    }

    #[test]
    fn network_only_summary_has_no_disk() {
        let text: Vec<String> = (0..11).map(|i| conn_line(i, 50, 1)).collect();
        let series =
            parse_log_text(&text.join("\n"), Some(crate::log::LineFormat::Network)).unwrap();
        let s = summarize(&series, 10).unwrap();
        assert_eq!(s.avg_disk_mb, None);
        assert_eq!(s.avg_active_connections, None);
        assert_eq!(s.avg_cpu_pct, 50.0);
    }

    #[test]
    fn same_second_run_is_degenerate() {
        let text: Vec<String> = (0..11).map(|_| conn_line(0, 50, 1)).collect();
        let series = parse_log_text(&text.join("\n"), None).unwrap();
        assert_eq!(
            summarize(&series, 10).unwrap_err().kind(),
            "degenerate_duration"
        );
    }
}
