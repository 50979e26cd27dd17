//! Metric metadata and the catalog used to look it up.
//!
//! The catalog is built once from the artifact and passed explicitly to
//! whatever needs it; nothing here is cached globally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Whether a metric is a fraction in [0, 1] or an unbounded number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Percent,
    #[default]
    Absolute,
}

impl RangeKind {
    /// Parse the `Range` column. Anything but "percent" is absolute.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("percent") {
            RangeKind::Percent
        } else {
            RangeKind::Absolute
        }
    }
}

/// Which raw values count as better for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetterDirection {
    #[default]
    Higher,
    Lower,
}

impl BetterDirection {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("lower") {
            BetterDirection::Lower
        } else {
            BetterDirection::Higher
        }
    }

    pub fn higher_is_better(self) -> bool {
        self == BetterDirection::Higher
    }
}

/// Static descriptor for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMetadata {
    pub id: String,
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub range: RangeKind,
    #[serde(default)]
    pub display_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub better_direction: BetterDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_max: Option<f64>,
    #[serde(default = "default_true")]
    pub include_in_radar: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_order: Option<f64>,
}

fn default_true() -> bool { true }

impl MetricMetadata {
    /// Metadata with defaults for everything but the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_label: id.clone(),
            id,
            order: 0.0,
            range: RangeKind::Absolute,
            description: String::new(),
            better_direction: BetterDirection::Higher,
            axis_min: None,
            axis_max: None,
            include_in_radar: true,
            radar_order: None,
        }
    }

    pub fn higher_is_better(&self) -> bool {
        self.better_direction.higher_is_better()
    }

    pub fn is_percent(&self) -> bool {
        self.range == RangeKind::Percent
    }

    /// Display label, falling back to the id.
    pub fn label(&self) -> &str {
        if self.display_label.is_empty() { &self.id } else { &self.display_label }
    }
}

/// Read-only lookup over the metric metadata, in artifact order.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    entries: Vec<MetricMetadata>,
    by_id: HashMap<String, usize>,
}

impl MetricCatalog {
    pub fn new(entries: Vec<MetricMetadata>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(i, meta)| (meta.id.clone(), i))
            .collect();
        Self { entries, by_id }
    }

    /// Lookup by metric id. A miss is "no data", not an error.
    pub fn get(&self, id: &str) -> Option<&MetricMetadata> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Better-direction for a metric; unknown metrics default to higher.
    pub fn higher_is_better(&self, id: &str) -> bool {
        self.get(id).map_or(true, MetricMetadata::higher_is_better)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricMetadata> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|m| m.id.as_str()).collect()
    }

    /// `id` if it is known, otherwise the first metric (if any).
    pub fn ensure_known<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        if self.contains(id) {
            Some(id)
        } else {
            self.entries.first().map(|m| m.id.as_str())
        }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
