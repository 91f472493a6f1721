//! Pick the newest log for a (benchmark, dataset, scale) from a flat log directory.

use crate::config::{DEFAULT_SCALE, FilenameGrammar, LogFileDescriptor};
use crate::error::AnalysisError;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// List every log in `dir` whose name fits the filename grammar, in directory read order.
///
/// Subdirectories, entries that fail to read and non-UTF8 names are skipped; only failing to
/// open the directory itself is an error.
pub fn scan_log_dir(dir: &Path) -> Result<Vec<LogFileDescriptor>, AnalysisError> {
    let io_err = |source| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let grammar = FilenameGrammar::new();
    let mut out = Vec::new();
    let mut ignored = 0usize;

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let Ok(entry) = entry else {
            ignored += 1;
            continue;
        };
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            ignored += 1;
            continue;
        };
        match grammar.parse(dir, name) {
            Some(desc) => out.push(desc),
            None => ignored += 1,
        }
    }

    log::debug!(
        "scanned {}: {} logs, {} other entries",
        dir.display(),
        out.len(),
        ignored
    );
    Ok(out)
}

/// Newest candidate matching the identity. On equal timestamps the earlier candidate wins.
pub fn select_latest<'a, I>(
    candidates: I,
    benchmark: &str,
    dataset: &str,
    scale: u32,
) -> Option<&'a LogFileDescriptor>
where
    I: IntoIterator<Item = &'a LogFileDescriptor>,
{
    let mut latest: Option<&LogFileDescriptor> = None;
    for desc in candidates {
        if !desc.matches(benchmark, dataset, scale) {
            continue;
        }
        match latest {
            Some(cur) if desc.created <= cur.created => {}
            _ => latest = Some(desc),
        }
    }
    latest
}

/// Scan `dir` and return the newest log for the combination. `scale` defaults to 1.
pub fn find_latest_log(
    dir: &Path,
    benchmark: &str,
    dataset: &str,
    scale: Option<u32>,
) -> Result<LogFileDescriptor, AnalysisError> {
    let scale = scale.unwrap_or(DEFAULT_SCALE);
    let all = scan_log_dir(dir)?;
    select_latest(&all, benchmark, dataset, scale)
        .cloned()
        .ok_or_else(|| AnalysisError::NotFound {
            benchmark: benchmark.to_string(),
            dataset: dataset.to_string(),
            scale,
        })
}

/// Distinct scales present for a (benchmark, dataset), ascending.
pub fn discovered_scales(
    candidates: &[LogFileDescriptor],
    benchmark: &str,
    dataset: &str,
) -> Vec<u32> {
    candidates
        .iter()
        .filter(|d| d.benchmark == benchmark && d.dataset == dataset)
        .map(|d| d.scale)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn desc(name: &str) -> LogFileDescriptor {
        FilenameGrammar::new()
            .parse(Path::new("logs"), name)
            .unwrap_or_else(|| panic!("bad fixture name {}", name))
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn later_timestamp_wins() {
        let all = vec![
            desc("ttl_bench_IBM_scale1_20240101_000000.log"),
            desc("ttl_bench_IBM_scale1_20240102_000000.log"),
        ];
        let got = select_latest(&all, "ttl_bench", "IBM", 1).unwrap();
        assert_eq!(
            got.path,
            PathBuf::from("logs/ttl_bench_IBM_scale1_20240102_000000.log")
        );

        // Order of the listing does not matter when timestamps differ.
        let reversed: Vec<_> = all.iter().rev().cloned().collect();
        let got = select_latest(&reversed, "ttl_bench", "IBM", 1).unwrap();
        assert_eq!(
            got.path,
            PathBuf::from("logs/ttl_bench_IBM_scale1_20240102_000000.log")
        );
    }

    #[test]
    fn tie_keeps_first_seen() {
        // Scaled and legacy names can carry the same identity and timestamp.
        let all = vec![
            desc("ttl_bench_IBM_20240101_000000.log"),
            desc("ttl_bench_IBM_scale1_20240101_000000.log"),
        ];
        let got = select_latest(&all, "ttl_bench", "IBM", 1).unwrap();
        assert_eq!(got.path, PathBuf::from("logs/ttl_bench_IBM_20240101_000000.log"));

        let got = select_latest(all.iter().rev(), "ttl_bench", "IBM", 1).unwrap();
        assert_eq!(
            got.path,
            PathBuf::from("logs/ttl_bench_IBM_scale1_20240101_000000.log")
        );
    }

    #[test]
    fn identity_must_match_exactly() {
        let all = vec![
            desc("ttl_bench_IBM_scale10_20240301_000000.log"),
            desc("stale_bench_IBM_scale1_20240301_000000.log"),
            desc("ttl_bench_Tencent_scale1_20240301_000000.log"),
            desc("ttl_bench_IBM_scale1_20240101_000000.log"),
        ];
        let got = select_latest(&all, "ttl_bench", "IBM", 1).unwrap();
        assert_eq!(got.created.format("%Y%m%d").to_string(), "20240101");
        assert!(select_latest(&all, "update_bench", "IBM", 1).is_none());
    }

    #[test]
    fn scales_are_sorted_and_unique() {
        let all = vec![
            desc("ttl_bench_IBM_scale100_20240101_000000.log"),
            desc("ttl_bench_IBM_scale1_20240101_000000.log"),
            desc("ttl_bench_IBM_scale100_20240102_000000.log"),
            desc("ttl_bench_Alibaba_scale5_20240101_000000.log"),
            desc("ttl_bench_IBM_20240101_000000.log"),
        ];
        assert_eq!(discovered_scales(&all, "ttl_bench", "IBM"), vec![1, 100]);
        assert!(discovered_scales(&all, "oracle_bench", "IBM").is_empty());
    }

    #[test]
    fn finds_latest_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "update_bench_Poisson_scale10_20240101_000000.log");
        touch(dir.path(), "update_bench_Poisson_scale10_20240102_000000.log");
        touch(dir.path(), "update_bench_Poisson_scale10_20240102_000000.txt");
        touch(dir.path(), "notes.md");
        fs::create_dir(dir.path().join("update_bench_Poisson_scale10_20240103_000000.log"))
            .unwrap();

        let got = find_latest_log(dir.path(), "update_bench", "Poisson", Some(10)).unwrap();
        assert_eq!(
            got.path,
            dir.path()
                .join("update_bench_Poisson_scale10_20240102_000000.log")
        );
        assert_eq!(scan_log_dir(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn missing_combination_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "update_bench_Poisson_scale10_20240101_000000.log");

        let err = find_latest_log(dir.path(), "update_bench", "Poisson", None).unwrap_err();
        match err {
            AnalysisError::NotFound {
                benchmark,
                dataset,
                scale,
            } => {
                assert_eq!(benchmark, "update_bench");
                assert_eq!(dataset, "Poisson");
                assert_eq!(scale, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_directory_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        let err = find_latest_log(&gone, "ttl_bench", "IBM", None).unwrap_err();
        assert_eq!(err.kind(), "io");
    }
}
