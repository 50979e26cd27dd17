//! End-to-end pass over a small artifact: default filters, grouping,
//! ranking, formatting and radar axes.

use noharm_common::DatasetArtifact;
use noharm_config::NoharmConfig;
use noharm_ranker::view::{default_filter_state, derive_team_groups, trials_range};
use noharm_ranker::{
    dataset_summary, filter_rows, format_metric_value, group_rows_by_combination, pick_rows_for_metric,
    radar_points, select_top_bottom, sort_rows_for_metric, CaseSubset, FilterState, FormatOptions,
};
use pretty_assertions::assert_eq;

const ARTIFACT: &str = r#"{
  "generatedAt": "2025-01-15T12:00:00Z",
  "rows": [
    {"model": "Model A", "team": "Agent1", "condition": "Solo", "harm": "", "metric": "Accuracy", "trials": 10, "mean": 0.9},
    {"model": "Model A", "team": "Agent1", "condition": "Solo", "harm": "Severe", "metric": "normalized", "trials": 10, "mean": 1.2},
    {"model": "Model B", "role": "Agent2", "condition": "Guardian", "harm": null, "metric": "Accuracy", "trials": 10, "mean": 0.85},
    {"model": "Model B", "role": "Agent2", "condition": "Guardian", "harm": "Severe", "metric": "normalized", "trials": 10, "mean": 0.8},
    {"model": "Model B", "role": "Agent2", "condition": "Guardian", "harm": "Mild", "metric": "normalized", "trials": 10, "mean": 0.3},
    {"model": "Physician", "team": "Human", "condition": "Human", "harm": "", "metric": "Accuracy", "trials": 4, "mean": 0.6, "cases": "HumanCases"},
    {"model": "Model C", "team": "Agent1", "condition": "Guardian", "harm": "", "metric": "Accuracy", "trials": 2, "mean": 0.95}
  ],
  "metadata": [
    {"id": "Accuracy", "order": 1, "range": "percent", "displayLabel": "Accuracy", "description": "", "betterDirection": "higher"},
    {"id": "normalized", "order": 2, "range": "absolute", "displayLabel": "Normalized", "description": "", "betterDirection": "lower", "axisMax": 2}
  ]
}"#;

fn load() -> (DatasetArtifact, NoharmConfig) {
    (DatasetArtifact::from_json_str(ARTIFACT).unwrap(), NoharmConfig::default())
}

fn default_state(artifact: &DatasetArtifact, config: &NoharmConfig) -> FilterState {
    let groups = derive_team_groups(&artifact.rows, &config.filters);
    let range = trials_range(&artifact.rows, config.filters.trials_step);
    default_filter_state(&groups, &config.filters, &range)
}

#[test]
fn test_default_view_ranks_and_formats() {
    let (artifact, config) = load();
    let catalog = artifact.catalog();
    let state = default_state(&artifact, &config);

    assert_eq!(state.selected_harm_levels, vec!["Severe".to_string()]);
    assert_eq!(state.min_trials, 5);

    // Mild is off, Physician is HumanCases only, Model C has too few trials.
    let filtered = filter_rows(&artifact.rows, &state, &config.filters);
    assert_eq!(filtered.len(), 4);

    let accuracy = pick_rows_for_metric(&filtered, "Accuracy");
    let split = select_top_bottom(&accuracy, catalog.higher_is_better("Accuracy"), 1, &[], &config.ranking);
    assert_eq!(split.top[0].row.model, "Model A");
    assert_eq!(split.bottom[0].row.model, "Model B");
    assert_eq!(split.bottom[0].rank, 2);

    let meta = catalog.get("Accuracy");
    assert_eq!(format_metric_value(split.top[0].row.mean, meta, FormatOptions::default()), "90.0%");

    let normalized = pick_rows_for_metric(&filtered, "normalized");
    let sorted = sort_rows_for_metric(&normalized, catalog.higher_is_better("normalized"), None);
    let order: Vec<&str> = sorted.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(order, vec!["Model B", "Model A"]);
    assert_eq!(format_metric_value(sorted[0].mean, catalog.get("normalized"), FormatOptions::default()), "0.80");
}

#[test]
fn test_grouped_entries_feed_radar() {
    let (artifact, config) = load();
    let catalog = artifact.catalog();
    let filtered = filter_rows(&artifact.rows, &default_state(&artifact, &config), &config.filters);
    let entries = group_rows_by_combination(&filtered);
    assert_eq!(entries.len(), 4);

    let severe_a = entries.iter().find(|e| e.model == "Model A" && e.harm == "Severe").unwrap();
    let severe_b = entries.iter().find(|e| e.model == "Model B" && e.harm == "Severe").unwrap();
    assert_eq!(severe_a.mean("Accuracy"), Some(0.9));
    assert_eq!(severe_b.mean("Accuracy"), Some(0.85));
    assert_eq!(severe_b.team, "Agent2");

    let points = radar_points(Some(severe_a), Some(severe_b), &catalog, &config.ranking.radar_order);
    let ids: Vec<&str> = points.iter().map(|p| p.metric_id.as_str()).collect();
    assert_eq!(ids, vec!["Accuracy", "normalized"]);
    assert!((points[1].primary.unwrap() - 0.4).abs() < 1e-9);
    assert!((points[1].comparison.unwrap() - 0.6).abs() < 1e-9);
}

#[test]
fn test_human_cases_view() {
    let (artifact, config) = load();
    let state = FilterState {
        selected_case: CaseSubset::HumanCases,
        min_trials: 1,
        ..default_state(&artifact, &config)
    };
    let filtered = filter_rows(&artifact.rows, &state, &config.filters);
    let models: Vec<&str> = filtered.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(models, vec!["Physician"]);
}

#[test]
fn test_summary_counts_all_rows() {
    let (artifact, _) = load();
    let summary = dataset_summary(&artifact.rows);
    assert_eq!((summary.total_rows, summary.total_metrics, summary.total_models), (7, 2, 4));
}
