//! The JSON dataset artifact written by the build step and read by the dashboard.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::DataRow;
use crate::error::Result;
use crate::metadata::{MetricCatalog, MetricMetadata};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetArtifact {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<DataRow>,
    /// Absent in the older artifact variant.
    #[serde(default)]
    pub metadata: Vec<MetricMetadata>,
}

impl DatasetArtifact {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a lookup over this artifact's metric metadata.
    pub fn catalog(&self) -> MetricCatalog {
        MetricCatalog::new(self.metadata.clone())
    }
}
