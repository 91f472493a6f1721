use chrono::NaiveDateTime;
use serde::Serialize;

/// Bytes per megabyte used for every byte counter in the log.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// The three line layouts the load tracker has written over time. Each one extends the
/// previous one with more fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LineFormat {
    /// CPU and network counters.
    Network,
    /// Network plus disk read/write bytes.
    Disk,
    /// Disk plus active connection and in-flight RPC counts.
    Connections,
}

impl LineFormat {
    /// Richest first; detection takes the first one that matches.
    pub const ALL: [LineFormat; 3] = [
        LineFormat::Connections,
        LineFormat::Disk,
        LineFormat::Network,
    ];

    pub fn has_disk(self) -> bool {
        self != LineFormat::Network
    }

    pub fn has_connections(self) -> bool {
        self == LineFormat::Connections
    }
}

/// Connection and RPC gauges, present only in the richest layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionCounts {
    pub active_connections: u64,
    pub current_rpcs: u64,
}

/// A single parsed data line. Byte counters are already converted to MB.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub timestamp: NaiveDateTime,
    pub cpu_pct: f64,
    pub net_recv_mb: f64,
    pub net_send_mb: f64,
    /// (read, write); None for the network-only layout.
    pub disk_mb: Option<(f64, f64)>,
    pub connections: Option<ConnectionCounts>,
}

impl MetricSample {
    pub fn net_total_mb(&self) -> f64 {
        self.net_recv_mb + self.net_send_mb
    }

    pub fn disk_total_mb(&self) -> Option<f64> {
        self.disk_mb.map(|(r, w)| r + w)
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}
