//! Row filtering by harm level, team, per-team condition, case subset and
//! minimum trial count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use noharm_common::DataRow;
use noharm_config::FilterConfig;

/// Which case subset rows must come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseSubset {
    #[default]
    AllCases,
    HumanCases,
}

/// The user's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Empty means every harm level passes.
    pub selected_harm_levels: Vec<String>,
    /// Empty means every team passes.
    pub selected_teams: Vec<String>,
    /// Per-team condition restriction. A missing or empty list passes all.
    pub selected_team_conditions: BTreeMap<String, Vec<String>>,
    pub selected_case: CaseSubset,
    pub min_trials: u32,
}

impl FilterState {
    /// Structural key for memoizing per-metric derived data.
    pub fn cache_key(&self, metric_id: &str) -> String {
        serde_json::to_string(&(metric_id, self)).unwrap_or_else(|_| format!("{metric_id}:{self:?}"))
    }

    fn harm_matches(&self, row: &DataRow) -> bool {
        row.is_harm_agnostic()
            || self.selected_harm_levels.is_empty()
            || self.selected_harm_levels.iter().any(|h| h == &row.harm)
    }

    fn team_matches(&self, row: &DataRow) -> bool {
        self.selected_teams.is_empty() || self.selected_teams.iter().any(|t| t == row.team.trim())
    }

    fn condition_matches(&self, row: &DataRow, policy: &FilterConfig) -> bool {
        if policy.is_always_on(&row.condition) {
            return true;
        }
        match self.selected_team_conditions.get(row.team.trim()) {
            Some(allowed) if !allowed.is_empty() => allowed.iter().any(|c| c == row.condition.trim()),
            _ => true,
        }
    }

    fn case_matches(&self, row: &DataRow, policy: &FilterConfig) -> bool {
        let tag = row.cases.as_deref().map(str::trim).unwrap_or("");
        match self.selected_case {
            CaseSubset::AllCases => tag.is_empty() || tag.eq_ignore_ascii_case(&policy.all_cases_tag),
            CaseSubset::HumanCases => tag.eq_ignore_ascii_case(&policy.human_cases_tag),
        }
    }

    fn trials_match(&self, row: &DataRow) -> bool {
        row.trials.unwrap_or(0) >= self.min_trials
    }

    /// True when `row` satisfies every active filter.
    pub fn matches(&self, row: &DataRow, policy: &FilterConfig) -> bool {
        self.harm_matches(row)
            && self.team_matches(row)
            && self.condition_matches(row, policy)
            && self.case_matches(row, policy)
            && self.trials_match(row)
    }
}

/// Rows satisfying `filters`, in input order.
pub fn filter_rows(rows: &[DataRow], filters: &FilterState, policy: &FilterConfig) -> Vec<DataRow> {
    rows.iter().filter(|row| filters.matches(row, policy)).cloned().collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use noharm_test_utils::RowBuilder;
    use pretty_assertions::assert_eq;

    fn models(rows: &[DataRow]) -> Vec<&str> {
        rows.iter().map(|r| r.model.as_str()).collect()
    }

    fn open_state() -> FilterState {
        FilterState::default()
    }

    #[test]
    fn test_empty_state_passes_everything_with_trials() {
        let rows = vec![
            RowBuilder::new("A", "Accuracy").harm("Severe").team("Agent1").condition("Solo").build(),
            RowBuilder::new("B", "Accuracy").trials(None).build(),
        ];
        let out = filter_rows(&rows, &open_state(), &FilterConfig::default());
        assert_eq!(models(&out), vec!["A", "B"]);
    }

    #[test]
    fn test_harm_filter_keeps_agnostic_rows() {
        let rows = vec![
            RowBuilder::new("A", "normalized").harm("Severe").build(),
            RowBuilder::new("B", "normalized").harm("Mild").build(),
            RowBuilder::new("C", "Accuracy").build(),
            RowBuilder::new("D", "Accuracy").harm("NA").build(),
        ];
        let state = FilterState { selected_harm_levels: vec!["Severe".into()], ..open_state() };
        let out = filter_rows(&rows, &state, &FilterConfig::default());
        assert_eq!(models(&out), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_team_and_condition_filters() {
        let rows = vec![
            RowBuilder::new("A", "m").team("Agent1").condition("Solo").build(),
            RowBuilder::new("B", "m").team("Agent1").condition("Guardian").build(),
            RowBuilder::new("C", "m").team("Agent2").condition("Guardian").build(),
            RowBuilder::new("D", "m").team("Agent3").condition("Solo").build(),
            RowBuilder::new("E", "m").team("Human").condition("Human").build(),
            RowBuilder::new("F", "m").team("").condition("Control").build(),
        ];
        let mut conditions = BTreeMap::new();
        conditions.insert("Agent1".to_string(), vec!["Solo".to_string()]);
        conditions.insert("Agent2".to_string(), vec![]);
        let state = FilterState {
            selected_teams: vec!["Agent1".into(), "Agent2".into()],
            selected_team_conditions: conditions,
            ..open_state()
        };
        let out = filter_rows(&rows, &state, &FilterConfig::default());
        // E and F are always-on conditions but still fail the team filter.
        assert_eq!(models(&out), vec!["A", "C"]);

        let state = FilterState { selected_teams: vec![], ..state };
        let out = filter_rows(&rows, &state, &FilterConfig::default());
        assert_eq!(models(&out), vec!["A", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_always_on_condition_ignores_team_restriction() {
        let rows = vec![RowBuilder::new("Physician", "m").team("Agent1").condition("human").build()];
        let mut conditions = BTreeMap::new();
        conditions.insert("Agent1".to_string(), vec!["Solo".to_string()]);
        let state = FilterState { selected_team_conditions: conditions, ..open_state() };
        assert_eq!(filter_rows(&rows, &state, &FilterConfig::default()).len(), 1);
    }

    #[test]
    fn test_case_subset() {
        let rows = vec![
            RowBuilder::new("A", "m").build(),
            RowBuilder::new("B", "m").cases("AllCases").build(),
            RowBuilder::new("C", "m").cases("humancases").build(),
            RowBuilder::new("D", "m").cases("Other").build(),
        ];
        let policy = FilterConfig::default();
        let all = filter_rows(&rows, &open_state(), &policy);
        assert_eq!(models(&all), vec!["A", "B"]);

        let human = FilterState { selected_case: CaseSubset::HumanCases, ..open_state() };
        assert_eq!(models(&filter_rows(&rows, &human, &policy)), vec!["C"]);
    }

    #[test]
    fn test_min_trials_treats_missing_as_zero() {
        let rows = vec![
            RowBuilder::new("A", "m").trials(Some(5)).build(),
            RowBuilder::new("B", "m").trials(Some(4)).build(),
            RowBuilder::new("C", "m").trials(None).build(),
        ];
        let state = FilterState { min_trials: 5, ..open_state() };
        assert_eq!(models(&filter_rows(&rows, &state, &FilterConfig::default())), vec!["A"]);
    }

    #[test]
    fn test_cache_key_is_structural() {
        let a = FilterState { selected_harm_levels: vec!["Severe".into()], min_trials: 5, ..open_state() };
        let b = a.clone();
        assert_eq!(a.cache_key("Accuracy"), b.cache_key("Accuracy"));
        assert_ne!(a.cache_key("Accuracy"), a.cache_key("Safety"));

        let c = FilterState { min_trials: 10, ..a.clone() };
        assert_ne!(a.cache_key("Accuracy"), c.cache_key("Accuracy"));
    }
}
