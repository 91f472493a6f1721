use crate::log::row::{LineFormat, MetricSample};

/// All samples parsed from one log file, in file order.
///
/// Timestamps are non-decreasing; the parser rejects files that go backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub format: LineFormat,
    pub samples: Vec<MetricSample>,
    /// Lines that did not parse as a sample of `format`.
    pub skipped_lines: usize,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Seconds since the first sample; the first entry is always 0.
    pub fn elapsed_secs(&self) -> Vec<f64> {
        let Some(first) = self.samples.first() else {
            return vec![];
        };
        self.samples
            .iter()
            .map(|s| (s.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0)
            .collect()
    }

    /// Largest elapsed time, 0 for an empty or single-sample series.
    pub fn duration_secs(&self) -> f64 {
        self.elapsed_secs().into_iter().fold(0.0, f64::max)
    }

    pub fn cpu_pct(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.cpu_pct).collect()
    }

    pub fn net_recv_mb(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.net_recv_mb).collect()
    }

    pub fn net_send_mb(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.net_send_mb).collect()
    }

    pub fn net_total_mb(&self) -> Vec<f64> {
        self.samples.iter().map(MetricSample::net_total_mb).collect()
    }

    pub fn disk_read_mb(&self) -> Option<Vec<f64>> {
        if !self.format.has_disk() {
            return None;
        }
        self.samples
            .iter()
            .map(|s| s.disk_mb.map(|(r, _)| r))
            .collect()
    }

    pub fn disk_write_mb(&self) -> Option<Vec<f64>> {
        if !self.format.has_disk() {
            return None;
        }
        self.samples
            .iter()
            .map(|s| s.disk_mb.map(|(_, w)| w))
            .collect()
    }

    pub fn disk_total_mb(&self) -> Option<Vec<f64>> {
        if !self.format.has_disk() {
            return None;
        }
        self.samples.iter().map(MetricSample::disk_total_mb).collect()
    }

    pub fn active_connections(&self) -> Option<Vec<f64>> {
        if !self.format.has_connections() {
            return None;
        }
        self.samples
            .iter()
            .map(|s| s.connections.map(|c| c.active_connections as f64))
            .collect()
    }

    pub fn current_rpcs(&self) -> Option<Vec<f64>> {
        if !self.format.has_connections() {
            return None;
        }
        self.samples
            .iter()
            .map(|s| s.connections.map(|c| c.current_rpcs as f64))
            .collect()
    }
}
