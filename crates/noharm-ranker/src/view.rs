//! View-model helpers behind the dashboard controls: team/condition groups,
//! default selections, selection toggles, search, scatter data and colors.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use noharm_common::entities::color_key;
use noharm_common::{CombinationEntry, DataRow};
use noharm_config::{FilterConfig, PaletteConfig};

use crate::filter::{CaseSubset, FilterState};
use crate::stats::pearson_correlation;

/// A team and the conditions it was run under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGroup {
    pub team: String,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGroups {
    pub groups: Vec<TeamGroup>,
    /// Always-on conditions seen in the data; they bypass team restrictions.
    pub always_on: Vec<String>,
}

impl TeamGroups {
    pub fn teams(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.team.clone()).collect()
    }

    pub fn conditions_for(&self, team: &str) -> &[String] {
        self.groups
            .iter()
            .find(|g| g.team == team)
            .map(|g| g.conditions.as_slice())
            .unwrap_or(&[])
    }
}

/// Collect teams and their conditions, sorted. Rows with a blank team are
/// ignored entirely.
pub fn derive_team_groups(rows: &[DataRow], policy: &FilterConfig) -> TeamGroups {
    let mut teams: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut always_on = BTreeSet::new();

    for row in rows {
        let team = row.team.trim();
        if team.is_empty() {
            continue;
        }
        let conditions = teams.entry(team.to_string()).or_default();
        let condition = row.condition.trim();
        if condition.is_empty() {
            continue;
        }
        if policy.is_always_on(condition) {
            always_on.insert(condition.to_string());
        } else {
            conditions.insert(condition.to_string());
        }
    }

    TeamGroups {
        groups: teams
            .into_iter()
            .map(|(team, conditions)| TeamGroup { team, conditions: conditions.into_iter().collect() })
            .collect(),
        always_on: always_on.into_iter().collect(),
    }
}

/// Bounds for the minimum-trials slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialsRange {
    pub min: u32,
    pub max: u32,
}

impl TrialsRange {
    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

/// Slider range: 1 up to the largest trial count rounded up to `step`,
/// never less than one step.
pub fn trials_range(rows: &[DataRow], step: u32) -> TrialsRange {
    let step = step.max(1);
    let max_trials = rows.iter().filter_map(|r| r.trials).max().unwrap_or(0);
    let snapped = max_trials.div_ceil(step).saturating_mul(step);
    TrialsRange { min: 1, max: snapped.max(step) }
}

/// Initial filter selection: configured harm levels, every team with every
/// condition, all cases, and the configured minimum trials within range.
///
/// Default harm levels that are not among the offered `harm_levels` are
/// dropped. An empty `harm_levels` list offers everything.
pub fn default_filter_state(groups: &TeamGroups, config: &FilterConfig, range: &TrialsRange) -> FilterState {
    let selected_harm_levels = config
        .default_harm_levels
        .iter()
        .filter(|h| config.harm_levels.is_empty() || config.harm_levels.contains(h))
        .cloned()
        .collect();
    FilterState {
        selected_harm_levels,
        selected_teams: groups.teams(),
        selected_team_conditions: groups
            .groups
            .iter()
            .map(|g| (g.team.clone(), g.conditions.clone()))
            .collect(),
        selected_case: CaseSubset::AllCases,
        min_trials: range.clamp(config.default_min_trials),
    }
}

/// Toggle `value` in a selection that must keep at least `minimum` items.
pub fn toggle_with_minimum(current: &[String], value: &str, minimum: usize) -> Vec<String> {
    if current.iter().any(|c| c == value) {
        if current.len() <= minimum {
            return current.to_vec();
        }
        return current.iter().filter(|c| *c != value).cloned().collect();
    }
    let mut next = current.to_vec();
    next.push(value.to_string());
    next
}

/// Toggle one condition in a team's selection.
///
/// A team without a selection starts from all of `allowed`. The result keeps
/// `allowed` order, only holds allowed conditions, and is never empty while
/// `allowed` is not.
pub fn toggle_team_condition(current: Option<&[String]>, allowed: &[String], condition: &str) -> Vec<String> {
    if allowed.is_empty() {
        return current.map(<[String]>::to_vec).unwrap_or_default();
    }

    let current = current.unwrap_or(allowed);
    let next: Vec<&String> = if current.iter().any(|c| c == condition) {
        if current.len() <= 1 {
            current.iter().collect()
        } else {
            current.iter().filter(|c| *c != condition).collect()
        }
    } else {
        current.iter().chain(allowed.iter().filter(|a| *a == condition)).collect()
    };

    let normalized: Vec<String> = allowed.iter().filter(|a| next.contains(a)).cloned().collect();
    if normalized.is_empty() {
        vec![allowed[0].clone()]
    } else {
        normalized
    }
}

/// Severity is single-select in the controls.
pub fn select_single_severity(value: &str) -> Vec<String> {
    vec![value.to_string()]
}

/// Entries whose display label, model, team or condition contains `query`
/// (case-insensitive), up to `limit`. A blank query matches nothing.
pub fn search_suggestions<'a>(entries: &'a [CombinationEntry], query: &str, limit: usize) -> Vec<&'a CombinationEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| {
            [&e.display_label, &e.model, &e.team, &e.condition]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}

/// One dot on the scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub combination_id: String,
    pub label: String,
    pub color_key: String,
    pub x: f64,
    pub y: f64,
}

/// Entries that have a mean for both `x_metric` and `y_metric`.
pub fn scatter_points(entries: &[CombinationEntry], x_metric: &str, y_metric: &str) -> Vec<ScatterPoint> {
    entries
        .iter()
        .filter_map(|e| {
            Some(ScatterPoint {
                x: e.mean(x_metric)?,
                y: e.mean(y_metric)?,
                combination_id: e.combination_id.clone(),
                label: e.display_label.clone(),
                color_key: color_key(&e.condition, &e.team),
            })
        })
        .collect()
}

/// Correlation annotation for a set of scatter points.
pub fn scatter_correlation(points: &[ScatterPoint]) -> Option<f64> {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    pearson_correlation(&xs, &ys)
}

/// Chart color for a color key: condition palette, then team palette, then
/// the default color.
pub fn resolve_color<'a>(key: &str, palette: &'a PaletteConfig) -> &'a str {
    palette
        .conditions
        .get(key)
        .or_else(|| palette.teams.get(key))
        .map(String::as_str)
        .unwrap_or(palette.default.as_str())
}
