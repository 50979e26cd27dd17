//! Folding per-metric rows into per-combination entries.
//!
//! Rows with an empty harm scope carry metrics that apply to every harm
//! bucket (Accuracy is measured once per configuration). Those rows are shared
//! with every entry that has the same base key, i.e. the same combination
//! identity with harm left out. An entry's own row for a metric always takes
//! precedence over a shared one, which keeps the result independent of row order.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::trace;

use noharm_common::{CombinationEntry, DataRow};

#[derive(Default)]
struct Grouping {
    entries: Vec<CombinationEntry>,
    /// Metric ids each entry received from its own rows.
    own: Vec<HashSet<String>>,
    by_id: HashMap<String, usize>,
    siblings: HashMap<String, Vec<usize>>,
    shared: HashMap<String, BTreeMap<String, DataRow>>,
}

impl Grouping {
    fn entry_for(&mut self, row: &DataRow, base_key: &str) -> usize {
        let id = row.combination();
        if let Some(&idx) = self.by_id.get(&id) {
            return idx;
        }

        let idx = self.entries.len();
        let mut entry = CombinationEntry::from_row(row);
        if let Some(shared) = self.shared.get(base_key) {
            entry.metrics.extend(shared.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self.entries.push(entry);
        self.own.push(HashSet::new());
        self.by_id.insert(id, idx);
        self.siblings.entry(base_key.to_string()).or_default().push(idx);
        idx
    }

    fn add(&mut self, row: &DataRow) {
        let base_key = row.base_key();
        let idx = self.entry_for(row, &base_key);

        self.entries[idx].metrics.insert(row.metric.clone(), row.clone());
        self.own[idx].insert(row.metric.clone());

        if row.is_harm_agnostic() {
            self.shared
                .entry(base_key.clone())
                .or_default()
                .insert(row.metric.clone(), row.clone());

            for &sibling in self.siblings.get(&base_key).into_iter().flatten() {
                if !self.own[sibling].contains(&row.metric) {
                    self.entries[sibling].metrics.insert(row.metric.clone(), row.clone());
                }
            }
        }
    }
}

/// Group rows by combination id, sharing harm-agnostic metrics across harm
/// siblings. Entries come back in order of first occurrence.
pub fn group_rows_by_combination(rows: &[DataRow]) -> Vec<CombinationEntry> {
    let mut grouping = Grouping::default();
    for row in rows {
        grouping.add(row);
    }
    trace!(rows = rows.len(), entries = grouping.entries.len(), "Grouped rows by combination");
    grouping.entries
}

// ── Tests ─────────────────────────────────────────────────────────────────────
