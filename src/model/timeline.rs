//! Time series of a single run, aligned on seconds since the first sample.

use crate::log::{LineFormat, MetricSeries};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineData {
    pub title: String,
    pub path: String,
    pub format: LineFormat,
    pub elapsed_secs: Vec<f64>,
    pub cpu_pct: Vec<f64>,
    pub net_recv_mb: Vec<f64>,
    pub net_send_mb: Vec<f64>,
    pub disk_read_mb: Option<Vec<f64>>,
    pub disk_write_mb: Option<Vec<f64>>,
}

pub fn build_timeline(title: &str, path: &str, series: &MetricSeries) -> TimelineData {
    TimelineData {
        title: title.to_string(),
        path: path.to_string(),
        format: series.format,
        elapsed_secs: series.elapsed_secs(),
        cpu_pct: series.cpu_pct(),
        net_recv_mb: series.net_recv_mb(),
        net_send_mb: series.net_send_mb(),
        disk_read_mb: series.disk_read_mb(),
        disk_write_mb: series.disk_write_mb(),
    }
}
