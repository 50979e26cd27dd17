//! Artifact build pipeline.
//!
//! Orchestrates one build:
//!   1. Read `metadata.csv` (if present), keep included metrics, sort by order
//!   2. Read `metrics.csv`
//!   3. Drop rows outside the metric allow-list and configured exclusions
//!   4. Normalize the remaining rows (fails the batch on a schema violation)
//!   5. Assemble the artifact and write it as pretty JSON

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use noharm_common::{DatasetArtifact, DataRow, MetricMetadata, Result};
use noharm_config::IngestionConfig;

use crate::models::{RawMetadataRecord, RawMetricRecord};
use crate::normalise::{normalize_metadata, normalize_row};
use crate::sources::csv_source::{read_file, read_metadata_records, read_metric_records, MetricSource};

/// Parsed source records for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildInputs {
    pub metrics: Vec<RawMetricRecord>,
    pub metadata: Option<Vec<RawMetadataRecord>>,
}

impl BuildInputs {
    /// Read both CSVs from readers.
    pub fn from_readers<M: Read, D: Read>(metrics: M, metadata: Option<D>) -> Result<Self> {
        Ok(Self {
            metrics: read_metric_records(metrics)?,
            metadata: metadata.map(read_metadata_records).transpose()?,
        })
    }

    /// Read both CSVs from disk. A configured but missing metadata file is
    /// skipped with a warning; a missing metrics file is an error.
    pub fn from_source(source: &MetricSource) -> Result<Self> {
        let metrics = read_file(&source.metrics_csv, read_metric_records)?;
        let metadata = match &source.metadata_csv {
            Some(path) if path.exists() => Some(read_file(path, read_metadata_records)?),
            Some(path) => {
                warn!(path = %path.display(), "Metadata file not found; building without a metric catalog");
                None
            }
            None => None,
        };
        Ok(Self { metrics, metadata })
    }
}

/// Normalize metadata records: drop excluded metrics, sort by `order`.
pub fn normalize_metadata_records(records: &[RawMetadataRecord]) -> Result<Vec<MetricMetadata>> {
    let mut metadata = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if let Some(meta) = normalize_metadata(record, i)? {
            metadata.push(meta);
        }
    }
    metadata.sort_by(|a, b| a.order.total_cmp(&b.order));
    Ok(metadata)
}

/// Filter and normalize metric records.
///
/// `allow_list` of `None` keeps every metric. Filtering happens before
/// validation, so dropped records are never validated.
pub fn normalize_records(
    records: &[RawMetricRecord],
    allow_list: Option<&HashSet<String>>,
    config: &IngestionConfig,
) -> Result<Vec<DataRow>> {
    let mut rows = Vec::with_capacity(records.len());
    let mut dropped_metric = 0usize;
    let mut dropped_excluded = 0usize;

    for (i, record) in records.iter().enumerate() {
        let metric = record.metric_id();
        if let Some(allowed) = allow_list {
            if !allowed.contains(metric) {
                dropped_metric += 1;
                continue;
            }
        }
        if config.is_excluded(record.model_id(), metric) {
            debug!(record = i, model = record.model_id(), metric, "Row excluded by config");
            dropped_excluded += 1;
            continue;
        }
        rows.push(normalize_row(record, i)?);
    }

    info!(
        kept = rows.len(),
        dropped_metric,
        dropped_excluded,
        "Normalized metric rows"
    );
    Ok(rows)
}

/// Build the artifact from parsed inputs.
pub fn build_artifact(inputs: &BuildInputs, config: &IngestionConfig) -> Result<DatasetArtifact> {
    let metadata = match &inputs.metadata {
        Some(records) => normalize_metadata_records(records)?,
        None => Vec::new(),
    };

    let allow_list: Option<HashSet<String>> = if inputs.metadata.is_some() {
        Some(metadata.iter().map(|m| m.id.clone()).collect())
    } else if !config.metric_allow_list.is_empty() {
        Some(config.metric_allow_list.iter().cloned().collect())
    } else {
        None
    };

    let rows = normalize_records(&inputs.metrics, allow_list.as_ref(), config)?;

    Ok(DatasetArtifact {
        generated_at: Utc::now(),
        rows,
        metadata,
    })
}

/// Write the artifact as pretty JSON, creating parent directories.
pub fn write_artifact(path: &Path, artifact: &DatasetArtifact) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, artifact.to_json_pretty()?)?;
    info!(path = %path.display(), rows = artifact.rows.len(), "Wrote dataset artifact");
    Ok(())
}

/// Read a previously written artifact.
pub fn load_artifact(path: &Path) -> Result<DatasetArtifact> {
    let artifact = DatasetArtifact::load(path)?;
    debug!(
        path = %path.display(),
        rows = artifact.rows.len(),
        metrics = artifact.metadata.len(),
        "Loaded dataset artifact"
    );
    Ok(artifact)
}

// ── Tests ───────────────────────────────────────────────────────────────────
