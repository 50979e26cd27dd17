//! Raw record models for the source CSV files.
//!
//! Every field is an optional string: coercion happens in `normalise`, so a
//! bad numeric cell never fails CSV parsing.

use serde::{Deserialize, Deserializer, Serialize};

/// One line of `metrics.csv` before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetricRecord {
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    #[serde(rename = "Team", alias = "Role", default)]
    pub team: Option<String>,
    #[serde(rename = "Condition", default)]
    pub condition: Option<String>,
    #[serde(rename = "Harm", default)]
    pub harm: Option<String>,
    #[serde(rename = "Metric", default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub trials: Option<String>,
    #[serde(default)]
    pub mean: Option<String>,
    #[serde(default)]
    pub sd: Option<String>,
    #[serde(default)]
    pub se: Option<String>,
    #[serde(default)]
    pub ci: Option<String>,
    #[serde(default)]
    pub order1: Option<String>,
    #[serde(default)]
    pub order2: Option<String>,
    #[serde(rename = "Format", default)]
    pub format: Option<String>,
    #[serde(rename = "Cases", default)]
    pub cases: Option<String>,
    #[serde(rename = "Grading", default)]
    pub grading: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Label", default)]
    pub label: Option<String>,
}

impl RawMetricRecord {
    /// Trimmed metric id as written in the file, or "" when absent.
    pub fn metric_id(&self) -> &str {
        self.metric.as_deref().map(str::trim).unwrap_or("")
    }

    /// Trimmed model id as written in the file, or "" when absent.
    pub fn model_id(&self) -> &str {
        self.model.as_deref().map(str::trim).unwrap_or("")
    }
}

/// One line of `metadata.csv` (the metric catalog).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataRecord {
    #[serde(rename = "Order", default)]
    pub order: Option<String>,
    #[serde(rename = "Metric", default)]
    pub metric: Option<String>,
    /// `None` only when the column is absent; a blank cell is `Some("")`.
    #[serde(rename = "Include", default, deserialize_with = "keep_blank")]
    pub include: Option<String>,
    #[serde(rename = "Range", default)]
    pub range: Option<String>,
    #[serde(rename = "Display", default)]
    pub display: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Better", default)]
    pub better: Option<String>,
    #[serde(rename = "AxisMin", default)]
    pub axis_min: Option<String>,
    #[serde(rename = "AxisMax", default)]
    pub axis_max: Option<String>,
    #[serde(rename = "Radar", default)]
    pub radar: Option<String>,
    #[serde(rename = "RadarOrder", default)]
    pub radar_order: Option<String>,
}

/// The csv deserializer maps empty cells to `None` for optional fields.
/// Read the cell as a plain string so a present-but-blank cell survives.
fn keep_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}
