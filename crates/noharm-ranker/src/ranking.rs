//! Per-metric ranking: picking rows, ordering them by mean, and splitting
//! the ordering into best, worst and pinned groups for the bar chart.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use noharm_common::DataRow;
use noharm_config::RankingConfig;

/// A row with its 1-based position in the best-first ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub rank: usize,
    pub row: DataRow,
}

/// Best performers, worst performers and pinned rows outside both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopBottom {
    pub top: Vec<RankedRow>,
    pub bottom: Vec<RankedRow>,
    pub selected: Vec<RankedRow>,
}

/// Rows for `metric_id` that have a mean.
pub fn pick_rows_for_metric(rows: &[DataRow], metric_id: &str) -> Vec<DataRow> {
    rows.iter()
        .filter(|r| r.metric == metric_id && r.mean.is_some())
        .cloned()
        .collect()
}

/// Best-first comparison of two means.
///
/// Missing means sort last in both directions. Treating them as negative
/// infinity would float them to the top of a lower-is-better ordering.
fn compare_means(a: Option<f64>, b: Option<f64>, higher_is_better: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if higher_is_better => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Indices of `rows` in stable order, best first when `higher_is_better`
/// matches the metric's direction.
fn ordered_indices(rows: &[DataRow], higher_is_better: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.sort_by(|&a, &b| compare_means(rows[a].mean, rows[b].mean, higher_is_better));
    indices
}

/// Stable sort by mean, best first, truncated to `max_items`.
/// Rows without a mean always come after rows with one.
pub fn sort_rows_for_metric(rows: &[DataRow], higher_is_better: bool, max_items: Option<usize>) -> Vec<DataRow> {
    let limit = max_items.unwrap_or(rows.len());
    ordered_indices(rows, higher_is_better)
        .into_iter()
        .take(limit)
        .map(|i| rows[i].clone())
        .collect()
}

/// Reference baselines are matched case-insensitively against model,
/// display label and team.
fn is_baseline(row: &DataRow, markers: &[String]) -> bool {
    let fields = [
        row.model.to_lowercase(),
        row.display_label.to_lowercase(),
        row.team.to_lowercase(),
    ];
    markers
        .iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .any(|m| fields.iter().any(|f| f.contains(&m)))
}

/// Split `rows` (already picked for a single metric) into the `n` best, the
/// `n` worst and any pinned combinations outside both.
///
/// The bottom group never repeats a top row and never lists a baseline.
/// Pinned ids not present in `rows` are ignored.
pub fn select_top_bottom(
    rows: &[DataRow],
    higher_is_better: bool,
    n: usize,
    pinned: &[String],
    policy: &RankingConfig,
) -> TopBottom {
    let best = ordered_indices(rows, higher_is_better);
    let mut rank_of = vec![0usize; rows.len()];
    for (pos, &idx) in best.iter().enumerate() {
        rank_of[idx] = pos + 1;
    }
    let ranked = |idx: usize| RankedRow { rank: rank_of[idx], row: rows[idx].clone() };

    let top_idx: Vec<usize> = best.iter().copied().take(n).collect();
    let top_ids: HashSet<String> = top_idx.iter().map(|&i| rows[i].combination()).collect();

    let mut bottom_ids = HashSet::new();
    let mut bottom_idx = Vec::new();
    if n > 0 {
        for idx in ordered_indices(rows, !higher_is_better) {
            let id = rows[idx].combination();
            if top_ids.contains(&id) || is_baseline(&rows[idx], &policy.baseline_markers) {
                continue;
            }
            if bottom_ids.insert(id) {
                bottom_idx.push(idx);
                if bottom_idx.len() == n {
                    break;
                }
            }
        }
    }

    let mut seen = HashSet::new();
    let mut selected_idx: Vec<usize> = pinned
        .iter()
        .filter(|id| !top_ids.contains(*id) && !bottom_ids.contains(*id))
        .filter(|id| seen.insert(*id))
        .filter_map(|id| best.iter().copied().find(|&i| rows[i].combination() == *id))
        .collect();
    selected_idx.sort_by_key(|&i| rank_of[i]);

    TopBottom {
        top: top_idx.into_iter().map(ranked).collect(),
        bottom: bottom_idx.into_iter().map(ranked).collect(),
        selected: selected_idx.into_iter().map(ranked).collect(),
    }
}

/// [`select_top_bottom`] with the group size taken from `policy.top_n`.
pub fn select_for_chart(rows: &[DataRow], higher_is_better: bool, pinned: &[String], policy: &RankingConfig) -> TopBottom {
    select_top_bottom(rows, higher_is_better, policy.top_n, pinned, policy)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
