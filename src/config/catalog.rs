//! Catalog of datasets, benchmarks and their static properties (catalog.json).
//!
//! JSON shape (every field optional):
//! {
//!   "datasets": ["Poisson", "IBM"],          // processing order
//!   "benchmarks": ["ttl_bench", "update_bench"],
//!   "scales": [1, 10, 100],                  // empty => discover from the log dir
//!   "requests": { "IBM": 30000 },            // total requests replayed per dataset
//!   "benchmark_labels": { "ttl_bench": "TTL (1s)" },
//!   "dataset_aliases": { "Poisson": "PoissonR" }
//! }
//!
//! Lists replace the built-in defaults; maps are merged over them.

use crate::error::AnalysisError;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

const DEFAULT_DATASETS: &[&str] = &[
    "PoissonMix",
    "Poisson",
    "PoissonWrite",
    "Tencent",
    "IBM",
    "Alibaba",
];

const DEFAULT_BENCHMARKS: &[&str] = &[
    "stale_bench",
    "ttl_bench",
    "invalidate_bench",
    "update_bench",
    "adaptive_bench",
    "oracle_bench",
];

const DEFAULT_REQUESTS: &[(&str, u64)] = &[
    ("Meta", 500_000),
    ("Twitter", 5_000_000),
    ("IBM", 30_000),
    ("Tencent", 100_000),
    ("Alibaba", 300_000),
    ("Poisson", 200_000),
    ("PoissonWrite", 200_000),
    ("PoissonMix", 200_000),
];

const DEFAULT_BENCHMARK_LABELS: &[(&str, &str)] = &[
    ("stale_bench", "TTL (Inf.)"),
    ("ttl_bench", "TTL (1s)"),
    ("invalidate_bench", "Inv."),
    ("update_bench", "Upd."),
    ("adaptive_bench", "Adpt."),
    ("oracle_bench", "Oracle"),
];

const DEFAULT_DATASET_ALIASES: &[(&str, &str)] = &[("Poisson", "PoissonR")];

/// Raw catalog shape as it appears in catalog.json.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSpec {
    #[serde(default)]
    pub datasets: Option<Vec<String>>,

    #[serde(default)]
    pub benchmarks: Option<Vec<String>>,

    #[serde(default)]
    pub scales: Option<Vec<u32>>,

    #[serde(default)]
    pub requests: BTreeMap<String, u64>,

    #[serde(default)]
    pub benchmark_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub dataset_aliases: BTreeMap<String, String>,
}

/// Validated catalog ready for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub datasets: Vec<String>,
    pub benchmarks: Vec<String>,
    /// Sorted ascending, no duplicates. Empty means "whatever the directory holds".
    pub scales: Vec<u32>,
    pub requests: BTreeMap<String, u64>,
    pub benchmark_labels: BTreeMap<String, String>,
    pub dataset_aliases: BTreeMap<String, String>,
}

impl CatalogSpec {
    /// Merge over the built-in defaults and check the result is usable.
    pub fn validate_and_build(self) -> anyhow::Result<Catalog> {
        let datasets = self
            .datasets
            .unwrap_or_else(|| DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect());
        let benchmarks = self
            .benchmarks
            .unwrap_or_else(|| DEFAULT_BENCHMARKS.iter().map(|s| s.to_string()).collect());

        if datasets.is_empty() {
            bail!("catalog lists no datasets");
        }
        if benchmarks.is_empty() {
            bail!("catalog lists no benchmarks");
        }

        let scales: Vec<u32> = self
            .scales
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut requests: BTreeMap<String, u64> = DEFAULT_REQUESTS
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        requests.extend(self.requests);
        for (dataset, count) in &requests {
            if *count == 0 {
                bail!("request count for dataset {} must be positive", dataset);
            }
        }

        let mut benchmark_labels = to_string_map(DEFAULT_BENCHMARK_LABELS);
        benchmark_labels.extend(self.benchmark_labels);

        let mut dataset_aliases = to_string_map(DEFAULT_DATASET_ALIASES);
        dataset_aliases.extend(self.dataset_aliases);

        Ok(Catalog {
            datasets,
            benchmarks,
            scales,
            requests,
            benchmark_labels,
            dataset_aliases,
        })
    }
}

fn to_string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Catalog {
    /// Read and validate a catalog file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read catalog file {}", path))?;
        let spec: CatalogSpec =
            serde_json::from_str(&text).with_context(|| format!("parse catalog file {}", path))?;
        spec.validate_and_build()
            .with_context(|| format!("invalid catalog file {}", path))
    }

    /// Total number of requests a run over `dataset` replays.
    pub fn requests_for(&self, dataset: &str) -> Result<u64, AnalysisError> {
        self.requests
            .get(dataset)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownDataset {
                dataset: dataset.to_string(),
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        // The defaults are constants and always validate.
        CatalogSpec::default()
            .validate_and_build()
            .expect("built-in catalog is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(json: &str) -> anyhow::Result<Catalog> {
        serde_json::from_str::<CatalogSpec>(json)?.validate_and_build()
    }

    #[test]
    fn empty_object_yields_defaults() {
        let c = build("{}").unwrap();
        assert_eq!(c, Catalog::default());
        assert_eq!(c.datasets.len(), 6);
        assert_eq!(c.benchmarks[0], "stale_bench");
        assert!(c.scales.is_empty());
        assert_eq!(c.requests_for("Twitter").unwrap(), 5_000_000);
        assert_eq!(c.benchmark_labels["oracle_bench"], "Oracle");
        assert_eq!(c.dataset_aliases["Poisson"], "PoissonR");
    }

    #[test]
    fn lists_replace_and_maps_merge() {
        let c = build(
            r#"{
                "datasets": ["Synthetic"],
                "scales": [100, 1, 10, 1],
                "requests": {"Synthetic": 1000, "IBM": 60000}
            }"#,
        )
        .unwrap();
        assert_eq!(c.datasets, vec!["Synthetic".to_string()]);
        assert_eq!(c.scales, vec![1, 10, 100]);
        assert_eq!(c.requests_for("Synthetic").unwrap(), 1000);
        assert_eq!(c.requests_for("IBM").unwrap(), 60_000);
        assert_eq!(c.requests_for("Meta").unwrap(), 500_000);
    }

    #[test]
    fn unknown_dataset_is_explicit() {
        let err = Catalog::default().requests_for("Nope").unwrap_err();
        assert_eq!(err.kind(), "unknown_dataset");
    }

    #[test]
    fn rejects_zero_requests() {
        assert!(build(r#"{"requests": {"IBM": 0}}"#).is_err());
    }

    #[test]
    fn rejects_empty_lists() {
        assert!(build(r#"{"datasets": []}"#).is_err());
        assert!(build(r#"{"benchmarks": []}"#).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(serde_json::from_str::<CatalogSpec>(r#"{"dataset": ["x"]}"#).is_err());
    }
}
