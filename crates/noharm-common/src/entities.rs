/// Core entity types mirroring the dataset artifact schema.
/// These are the Rust representations of the rows and combinations the
/// dashboard works with.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Separator used when composing combination ids and base keys.
pub const KEY_SEPARATOR: &str = "::";

// ---------------------------------------------------------------------------
// Data row
// ---------------------------------------------------------------------------

/// One observation of one metric for one model/team/condition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    pub model: String,
    /// Team (older artifacts call this `role`).
    #[serde(alias = "role", default, deserialize_with = "null_as_empty")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub condition: String,
    /// Harm severity scope. Empty means the metric is harm-agnostic.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub harm: String,
    pub metric: String,
    /// Non-negative whole trial count. Anything else in the artifact reads as `None`.
    #[serde(default, deserialize_with = "lenient_trials")]
    pub trials: Option<u32>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub sd: Option<f64>,
    #[serde(default)]
    pub se: Option<f64>,
    #[serde(default)]
    pub ci: Option<f64>,
    #[serde(default)]
    pub order1: Option<f64>,
    #[serde(default)]
    pub order2: Option<f64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub cases: Option<String>,
    #[serde(default)]
    pub grading: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_label: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub combination_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color_key: String,
}

impl DataRow {
    /// True when the row carries no harm scope (empty or the literal "NA").
    pub fn is_harm_agnostic(&self) -> bool {
        let harm = self.harm.trim();
        harm.is_empty() || harm == "NA"
    }

    /// Combination identity recomputed from the row's fields.
    pub fn identity_key(&self) -> String {
        combination_id(
            &self.model,
            &self.team,
            &self.condition,
            &self.harm,
            self.kind.as_deref(),
            self.cases.as_deref(),
            self.grading.as_deref(),
        )
    }

    /// Combination identity with harm left out; rows sharing it are harm siblings.
    pub fn base_key(&self) -> String {
        base_key(
            &self.model,
            &self.team,
            &self.condition,
            self.kind.as_deref(),
            self.cases.as_deref(),
            self.grading.as_deref(),
        )
    }

    /// Stored combination id, falling back to the recomputed one when the
    /// artifact left it blank.
    pub fn combination(&self) -> String {
        if self.combination_id.is_empty() {
            self.identity_key()
        } else {
            self.combination_id.clone()
        }
    }

    /// Display label, falling back to the model id.
    pub fn label_or_model(&self) -> &str {
        if self.display_label.is_empty() {
            &self.model
        } else {
            &self.display_label
        }
    }
}

/// Deterministic combination id. Missing components are kept as empty segments.
pub fn combination_id(
    model: &str,
    team: &str,
    condition: &str,
    harm: &str,
    kind: Option<&str>,
    cases: Option<&str>,
    grading: Option<&str>,
) -> String {
    [
        model,
        team,
        condition,
        harm,
        kind.unwrap_or(""),
        cases.unwrap_or(""),
        grading.unwrap_or(""),
    ]
    .join(KEY_SEPARATOR)
}

/// Same as [`combination_id`] without the harm component.
pub fn base_key(
    model: &str,
    team: &str,
    condition: &str,
    kind: Option<&str>,
    cases: Option<&str>,
    grading: Option<&str>,
) -> String {
    [
        model,
        team,
        condition,
        kind.unwrap_or(""),
        cases.unwrap_or(""),
        grading.unwrap_or(""),
    ]
    .join(KEY_SEPARATOR)
}

/// Color key: condition, else team, else "default".
pub fn color_key(condition: &str, team: &str) -> String {
    if !condition.is_empty() {
        condition.to_string()
    } else if !team.is_empty() {
        team.to_string()
    } else {
        "default".to_string()
    }
}

fn lenient_trials<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|t| t.is_finite() && *t >= 0.0 && t.fract() == 0.0 && *t <= u32::MAX as f64)
        .map(|t| t as u32))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Combination entry
// ---------------------------------------------------------------------------

/// All metric rows sharing one model/team/condition/harm identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationEntry {
    pub combination_id: String,
    pub model: String,
    pub team: String,
    pub condition: String,
    pub harm: String,
    pub cases: Option<String>,
    pub grading: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub display_label: String,
    /// Metric id → row. Ordered so that equal entries compare and print equally.
    pub metrics: BTreeMap<String, DataRow>,
}

impl CombinationEntry {
    /// Empty entry carrying the identity fields of `row`.
    pub fn from_row(row: &DataRow) -> Self {
        Self {
            combination_id: row.combination(),
            model: row.model.clone(),
            team: row.team.clone(),
            condition: row.condition.clone(),
            harm: row.harm.clone(),
            cases: row.cases.clone(),
            grading: row.grading.clone(),
            kind: row.kind.clone(),
            display_label: row.label_or_model().to_string(),
            metrics: BTreeMap::new(),
        }
    }

    /// Mean of a metric on this entry, if present and computed.
    pub fn mean(&self, metric_id: &str) -> Option<f64> {
        self.metrics.get(metric_id).and_then(|row| row.mean)
    }
}
