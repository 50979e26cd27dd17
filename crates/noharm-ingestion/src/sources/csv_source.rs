//! CSV readers for the benchmark exports.
//!
//! Headers are trimmed and matched by name, so column order does not matter
//! and optional columns may be absent entirely.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use noharm_common::{NoharmError, Result};

use crate::models::{RawMetadataRecord, RawMetricRecord};

/// Paths of the two source files for one build.
#[derive(Debug, Clone)]
pub struct MetricSource {
    pub metrics_csv: PathBuf,
    /// Optional: older datasets ship without a metric catalog.
    pub metadata_csv: Option<PathBuf>,
}

impl MetricSource {
    /// Default layout: `data/metrics.csv` and `data/metadata.csv` under `root`.
    pub fn in_dir(root: &Path) -> Self {
        Self {
            metrics_csv: root.join("metrics.csv"),
            metadata_csv: Some(root.join("metadata.csv")),
        }
    }
}

/// Read all `metrics.csv` records.
pub fn read_metric_records<R: Read>(reader: R) -> Result<Vec<RawMetricRecord>> {
    read_records(reader, "metrics")
}

/// Read all `metadata.csv` records.
pub fn read_metadata_records<R: Read>(reader: R) -> Result<Vec<RawMetadataRecord>> {
    read_records(reader, "metadata")
}

/// Open a file and read it with `read`.
pub fn read_file<T>(path: &Path, read: impl FnOnce(File) -> Result<Vec<T>>) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        NoharmError::Csv(format!("failed to open {}: {e}", path.display()))
    })?;
    read(file)
}

fn read_records<R: Read, T: DeserializeOwned>(reader: R, kind: &str) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in csv_reader.deserialize::<T>().enumerate() {
        let record = result.map_err(|e| NoharmError::Csv(format!("{kind} record {i}: {e}")))?;
        records.push(record);
    }

    debug!(kind, n_records = records.len(), "Read CSV records");
    Ok(records)
}

// ── Tests ───────────────────────────────────────────────────────────────────
