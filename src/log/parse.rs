use crate::error::AnalysisError;
use crate::log::row::{ConnectionCounts, LineFormat, MetricSample, bytes_to_mb};
use crate::log::series::MetricSeries;
use chrono::NaiveDateTime;
use regex::Regex;
use std::fs;
use std::path::Path;

// Anchored at line start only; the tracker may append fields we do not read.
// Captures:
// 1) timestamp  2) cpu%  3) net recv bytes  4) net send bytes
const NETWORK_RE: &str = concat!(
    r"^([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}) - CPU Utilization: ([0-9.]+)% \| ",
    r"usr: [0-9.]+%, sys: [0-9.]+%, idle: [0-9.]+%, iowait: [0-9.]+%, steal: [0-9.]+% \| ",
    r"Network recv: ([0-9]+) bytes, send: ([0-9]+) bytes",
);
// 5) disk read bytes  6) disk write bytes
const DISK_SUFFIX_RE: &str = r" \| Disk read: ([0-9]+) bytes, write: ([0-9]+) bytes";
// 7) active connections  8) current rpcs
const CONNECTIONS_SUFFIX_RE: &str =
    r", number of active connections: ([0-9]+), current_rpcs: ([0-9]+)";

const LINE_TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Compiled line patterns, one per [`LineFormat`].
pub struct LinePatterns {
    network: Regex,
    disk: Regex,
    connections: Regex,
}

impl LinePatterns {
    pub fn new() -> Self {
        // Constant patterns, exercised by the tests below.
        let disk = format!("{}{}", NETWORK_RE, DISK_SUFFIX_RE);
        let connections = format!("{}{}", disk, CONNECTIONS_SUFFIX_RE);
        Self {
            network: Regex::new(NETWORK_RE).expect("network line pattern"),
            disk: Regex::new(&disk).expect("disk line pattern"),
            connections: Regex::new(&connections).expect("connections line pattern"),
        }
    }

    fn regex(&self, format: LineFormat) -> &Regex {
        match format {
            LineFormat::Network => &self.network,
            LineFormat::Disk => &self.disk,
            LineFormat::Connections => &self.connections,
        }
    }

    /// Parse one line as `format`. None if the line is not a well-formed sample.
    pub fn parse_line(&self, line: &str, format: LineFormat) -> Option<MetricSample> {
        let caps = self.regex(format).captures(line)?;

        let timestamp = NaiveDateTime::parse_from_str(&caps[1], LINE_TIMESTAMP_FMT).ok()?;
        let cpu_pct: f64 = caps[2].parse().ok()?;
        let recv: u64 = caps[3].parse().ok()?;
        let send: u64 = caps[4].parse().ok()?;

        let disk_mb = if format.has_disk() {
            let read: u64 = caps[5].parse().ok()?;
            let write: u64 = caps[6].parse().ok()?;
            Some((bytes_to_mb(read), bytes_to_mb(write)))
        } else {
            None
        };

        let connections = if format.has_connections() {
            Some(ConnectionCounts {
                active_connections: caps[7].parse().ok()?,
                current_rpcs: caps[8].parse().ok()?,
            })
        } else {
            None
        };

        Some(MetricSample {
            timestamp,
            cpu_pct,
            net_recv_mb: bytes_to_mb(recv),
            net_send_mb: bytes_to_mb(send),
            disk_mb,
            connections,
        })
    }

    /// Richest format shared by more than half of the data lines.
    ///
    /// Every sample line matches [`LineFormat::Network`], so that count is the number of
    /// data lines. A short line or two at the start of a richer log does not demote it.
    pub fn detect(&self, text: &str) -> Option<LineFormat> {
        let mut counts = [0usize; LineFormat::ALL.len()];
        for line in text.lines() {
            for (count, format) in counts.iter_mut().zip(LineFormat::ALL) {
                if self.parse_line(line, format).is_some() {
                    *count += 1;
                }
            }
        }

        let data_lines = counts.iter().copied().max().unwrap_or(0);
        if data_lines == 0 {
            return None;
        }
        LineFormat::ALL
            .into_iter()
            .zip(counts)
            .find(|(_, count)| 2 * count > data_lines)
            .map(|(format, _)| format)
    }
}

impl Default for LinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse log text into a series. `format` None means [`LinePatterns::detect`].
///
/// Lines that are not samples are skipped; sample lines too poor for the chosen format
/// are skipped with a warning. Zero samples is `EmptyData`; a timestamp
/// earlier than its predecessor is `OutOfOrder`.
pub fn parse_log_text(
    text: &str,
    format: Option<LineFormat>,
) -> Result<MetricSeries, AnalysisError> {
    let patterns = LinePatterns::new();
    let format = match format.or_else(|| patterns.detect(text)) {
        Some(f) => f,
        None => return Err(AnalysisError::EmptyData),
    };

    let mut samples: Vec<MetricSample> = Vec::new();
    let mut skipped_lines = 0usize;
    let mut poorer_lines = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        let Some(sample) = patterns.parse_line(line, format) else {
            skipped_lines += 1;
            if format != LineFormat::Network
                && patterns.parse_line(line, LineFormat::Network).is_some()
            {
                poorer_lines += 1;
            }
            continue;
        };
        if let Some(prev) = samples.last() {
            if sample.timestamp < prev.timestamp {
                return Err(AnalysisError::OutOfOrder { line: lineno + 1 });
            }
        }
        samples.push(sample);
    }

    if poorer_lines > 0 {
        log::warn!(
            "{} sample lines lack the {:?} fields and were skipped",
            poorer_lines,
            format
        );
    }

    if samples.is_empty() {
        return Err(AnalysisError::EmptyData);
    }

    Ok(MetricSeries {
        format,
        samples,
        skipped_lines,
    })
}

/// Read and parse a load-tracker log file.
///
/// Invalid UTF-8 only spoils the line it sits on, which then fails to match.
pub fn parse_log_file(
    path: &Path,
    format: Option<LineFormat>,
) -> Result<MetricSeries, AnalysisError> {
    let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let series = parse_log_text(&text, format)?;
    log::debug!(
        "parsed {}: {} samples as {:?}, {} lines skipped",
        path.display(),
        series.len(),
        series.format,
        series.skipped_lines
    );
    Ok(series)
}
