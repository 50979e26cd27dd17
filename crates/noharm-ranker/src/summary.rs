//! Dataset-level counts for the header cards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use noharm_common::DataRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub total_metrics: usize,
    pub total_models: usize,
}

/// Row count plus the number of distinct metric and model ids.
pub fn dataset_summary(rows: &[DataRow]) -> DatasetSummary {
    let metrics: HashSet<&str> = rows.iter().map(|r| r.metric.as_str()).collect();
    let models: HashSet<&str> = rows.iter().map(|r| r.model.as_str()).collect();
    DatasetSummary {
        total_rows: rows.len(),
        total_metrics: metrics.len(),
        total_models: models.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noharm_test_utils::row;

    #[test]
    fn test_counts_distinct_ids() {
        let rows = vec![
            row("A", "Accuracy", 0.9),
            row("A", "Safety", 0.8),
            row("B", "Accuracy", 0.7),
        ];
        let summary = dataset_summary(&rows);
        assert_eq!(summary, DatasetSummary { total_rows: 3, total_metrics: 2, total_models: 2 });
    }

    #[test]
    fn test_empty() {
        assert_eq!(dataset_summary(&[]), DatasetSummary::default());
    }
}
