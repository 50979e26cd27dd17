//! Dashboard configuration.
//!
//! Everything that is dataset-specific rather than algorithmic lives here:
//! which rows the build step drops, which conditions are always shown,
//! the case-subset tags, ranking policy, and the color palette.
//! Loaded from `noharm.toml` (or YAML/JSON); every section has defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "NOHARM_CONFIG";

/// Config file looked up in the current directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "noharm.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoharmConfig {
    #[serde(default)]
    pub ingestion: IngestionConfig,

    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub palette: PaletteConfig,
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

/// Row selection applied by the build step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Metrics to keep when no metadata catalog is supplied. Empty keeps all.
    #[serde(default)]
    pub metric_allow_list: Vec<String>,

    /// Known data-quality exclusions.
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
}

/// Drop rows whose metric is in `metrics` AND whose model is in `models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub metrics: Vec<String>,
    pub models: Vec<String>,
}

impl ExclusionRule {
    pub fn matches(&self, model: &str, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric) && self.models.iter().any(|m| m == model)
    }
}

impl IngestionConfig {
    /// True if any exclusion rule drops this (model, metric) pair.
    pub fn is_excluded(&self, model: &str, metric: &str) -> bool {
        self.exclusions.iter().any(|rule| rule.matches(model, metric))
    }
}

// ── Filters ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Conditions that pass the condition filter regardless of team selection.
    /// Compared case-insensitively.
    #[serde(default = "default_always_on")]
    pub always_on_conditions: Vec<String>,

    /// Harm severities offered to the user, in display order.
    #[serde(default = "default_harm_levels")]
    pub harm_levels: Vec<String>,

    /// Harm severities selected on first load.
    #[serde(default = "default_selected_harm")]
    pub default_harm_levels: Vec<String>,

    #[serde(default = "default_all_cases_tag")]
    pub all_cases_tag: String,

    #[serde(default = "default_human_cases_tag")]
    pub human_cases_tag: String,

    #[serde(default = "default_min_trials")]
    pub default_min_trials: u32,

    /// Granularity of the trials slider.
    #[serde(default = "default_trials_step")]
    pub trials_step: u32,
}

fn default_always_on() -> Vec<String> { vec!["human".to_string(), "control".to_string()] }
fn default_harm_levels() -> Vec<String> {
    vec!["Severe".to_string(), "Moderate".to_string(), "Mild".to_string()]
}
fn default_selected_harm() -> Vec<String> { vec!["Severe".to_string()] }
fn default_all_cases_tag() -> String { "AllCases".to_string() }
fn default_human_cases_tag() -> String { "HumanCases".to_string() }
fn default_min_trials() -> u32 { 5 }
fn default_trials_step() -> u32 { 5 }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            always_on_conditions: default_always_on(),
            harm_levels: default_harm_levels(),
            default_harm_levels: default_selected_harm(),
            all_cases_tag: default_all_cases_tag(),
            human_cases_tag: default_human_cases_tag(),
            default_min_trials: default_min_trials(),
            trials_step: default_trials_step(),
        }
    }
}

impl FilterConfig {
    pub fn is_always_on(&self, condition: &str) -> bool {
        let condition = condition.trim();
        self.always_on_conditions
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(condition))
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Rows shown per group in the bar chart.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Case-insensitive substrings marking reference baselines (e.g. human
    /// physicians). Baselines are never listed among the worst performers.
    #[serde(default = "default_baseline_markers")]
    pub baseline_markers: Vec<String>,

    /// Metric ids placed first on the radar chart, in this order.
    #[serde(default = "default_radar_order")]
    pub radar_order: Vec<String>,
}

fn default_top_n() -> usize { 15 }
fn default_baseline_markers() -> Vec<String> { vec!["human".to_string()] }
fn default_radar_order() -> Vec<String> {
    ["Accuracy", "Restraint", "Emergency Rate", "Referral Rate", "Safety"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            baseline_markers: default_baseline_markers(),
            radar_order: default_radar_order(),
        }
    }
}

// ── Palette ───────────────────────────────────────────────────────────────────

/// Chart colors keyed by condition or team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_condition_colors")]
    pub conditions: BTreeMap<String, String>,

    #[serde(default = "default_team_colors")]
    pub teams: BTreeMap<String, String>,

    #[serde(default = "default_color")]
    pub default: String,
}

fn default_color() -> String { "#1F2A44".to_string() }

fn default_condition_colors() -> BTreeMap<String, String> {
    [
        ("Control", "#1F2A44"),
        ("Solo", "#6E5DC6"),
        ("Guardian", "#FF8360"),
        ("Guardian+Guardian", "#2FB49C"),
        ("Guardian+Stewardship", "#F4C95D"),
        ("Stewardship", "#9D4EDD"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_team_colors() -> BTreeMap<String, String> {
    [
        ("Agent1", "#6E5DC6"),
        ("Agent2", "#FF8360"),
        ("Agent3", "#2FB49C"),
        ("Human", "#F4C95D"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            conditions: default_condition_colors(),
            teams: default_team_colors(),
            default: default_color(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl NoharmConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        Self::from_toml_str(&read(path)?)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        Ok(serde_yaml::from_str(&read(path)?)?)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&read(path)?)?)
    }

    /// Load by file extension (`.yaml`/`.yml`, `.json`, otherwise TOML).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Load the config named by `NOHARM_CONFIG`, else `noharm.toml` in the
    /// current directory, else fall back to defaults.
    /// An explicitly named file that is missing is an error.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_path(Path::new(&path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = NoharmConfig::default();
        assert!(config.filters.is_always_on("Human"));
        assert!(config.filters.is_always_on(" CONTROL "));
        assert!(!config.filters.is_always_on("Guardian"));
        assert_eq!(config.filters.default_harm_levels, vec!["Severe"]);
        assert_eq!(config.ranking.top_n, 15);
        assert!(config.ingestion.exclusions.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = NoharmConfig::from_toml_str(
            r#"
            [filters]
            default_min_trials = 3

            [[ingestion.exclusions]]
            metrics = ["Accuracy", "Safety"]
            models = ["Random Intervention", "No Intervention"]
            "#,
        )
        .unwrap();
        assert_eq!(config.filters.default_min_trials, 3);
        assert_eq!(config.filters.trials_step, 5);
        assert_eq!(config.filters.all_cases_tag, "AllCases");
        assert!(config.ingestion.is_excluded("No Intervention", "Safety"));
        assert!(!config.ingestion.is_excluded("No Intervention", "nnh"));
        assert!(!config.ingestion.is_excluded("Model A", "Safety"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = NoharmConfig::from_toml_str("[filters\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let config = NoharmConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let parsed = NoharmConfig::from_path(file.path()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_example_file_parses() {
        let config = NoharmConfig::from_toml_str(include_str!("../../../noharm.example.toml")).unwrap();
        assert!(config.ingestion.is_excluded("Random Intervention", "Accuracy"));
        assert_eq!(config.filters, FilterConfig::default());
        assert_eq!(config.palette, PaletteConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = NoharmConfig::from_toml_file(Path::new("/nonexistent/noharm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
