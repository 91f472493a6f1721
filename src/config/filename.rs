//! Log filename grammar.
//!
//! Example names:
//!   ttl_bench_Poisson_scale100_20240905_174130.log
//!   ttl_bench_Poisson_20240905_174130.log          (legacy, scale 1)
//!
//! The benchmark part may itself contain underscores; the dataset part may not.

use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};

const SCALED_NAME_RE: &str = r"^(\w+)_([^_]+)_scale(\d+)_(\d{8}_\d{6})\.log$";
const LEGACY_NAME_RE: &str = r"^(\w+)_([^_]+)_(\d{8}_\d{6})\.log$";
const NAME_TIMESTAMP_FMT: &str = "%Y%m%d_%H%M%S";

/// Scale implied by the legacy grammar and by queries that omit one.
pub const DEFAULT_SCALE: u32 = 1;

/// Metadata recovered from a log's filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileDescriptor {
    pub benchmark: String,
    pub dataset: String,
    pub scale: u32,
    pub created: NaiveDateTime,
    pub path: PathBuf,
}

impl LogFileDescriptor {
    pub fn matches(&self, benchmark: &str, dataset: &str, scale: u32) -> bool {
        self.scale == scale && self.benchmark == benchmark && self.dataset == dataset
    }
}

/// Compiled filename patterns; build once per directory scan.
pub struct FilenameGrammar {
    scaled: Regex,
    legacy: Regex,
}

impl FilenameGrammar {
    pub fn new() -> Self {
        // Both patterns are constants covered by tests.
        Self {
            scaled: Regex::new(SCALED_NAME_RE).expect("scaled filename pattern"),
            legacy: Regex::new(LEGACY_NAME_RE).expect("legacy filename pattern"),
        }
    }

    /// Parse `name` (a bare file name) into a descriptor rooted at `dir`.
    /// Returns None for names outside the grammar, including impossible dates.
    pub fn parse(&self, dir: &Path, name: &str) -> Option<LogFileDescriptor> {
        let (benchmark, dataset, scale, stamp) = if let Some(caps) = self.scaled.captures(name) {
            let scale = caps[3].parse::<u32>().ok()?;
            (caps[1].to_string(), caps[2].to_string(), scale, caps[4].to_string())
        } else if let Some(caps) = self.legacy.captures(name) {
            (
                caps[1].to_string(),
                caps[2].to_string(),
                DEFAULT_SCALE,
                caps[3].to_string(),
            )
        } else {
            return None;
        };

        let created = NaiveDateTime::parse_from_str(&stamp, NAME_TIMESTAMP_FMT).ok()?;

        Some(LogFileDescriptor {
            benchmark,
            dataset,
            scale,
            created,
            path: dir.join(name),
        })
    }
}

impl Default for FilenameGrammar {
    fn default() -> Self {
        Self::new()
    }
}
