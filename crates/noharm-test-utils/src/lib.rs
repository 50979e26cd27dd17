//! Shared fixtures for NOHARM tests: row and metadata builders, float
//! assertions, and a seeded shuffle.

use noharm_common::entities::{color_key, combination_id};
use noharm_common::{BetterDirection, DataRow, MetricMetadata, RangeKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub use pretty_assertions;

/// Builder for `DataRow` with derived fields kept consistent.
#[derive(Debug, Clone)]
pub struct RowBuilder {
    row: DataRow,
}

impl RowBuilder {
    pub fn new(model: &str, metric: &str) -> Self {
        Self {
            row: DataRow {
                model: model.to_string(),
                team: String::new(),
                condition: String::new(),
                harm: String::new(),
                metric: metric.to_string(),
                trials: Some(10),
                mean: None,
                sd: None,
                se: None,
                ci: None,
                order1: None,
                order2: None,
                format: None,
                cases: None,
                grading: None,
                kind: None,
                label: None,
                display_label: String::new(),
                combination_id: String::new(),
                color_key: String::new(),
            },
        }
    }

    pub fn team(mut self, team: &str) -> Self {
        self.row.team = team.to_string();
        self
    }

    pub fn condition(mut self, condition: &str) -> Self {
        self.row.condition = condition.to_string();
        self
    }

    pub fn harm(mut self, harm: &str) -> Self {
        self.row.harm = harm.to_string();
        self
    }

    pub fn mean(mut self, mean: f64) -> Self {
        self.row.mean = Some(mean);
        self
    }

    pub fn no_mean(mut self) -> Self {
        self.row.mean = None;
        self
    }

    pub fn ci(mut self, ci: f64) -> Self {
        self.row.ci = Some(ci);
        self
    }

    pub fn trials(mut self, trials: Option<u32>) -> Self {
        self.row.trials = trials;
        self
    }

    pub fn cases(mut self, cases: &str) -> Self {
        self.row.cases = Some(cases.to_string());
        self
    }

    pub fn grading(mut self, grading: &str) -> Self {
        self.row.grading = Some(grading.to_string());
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.row.kind = Some(kind.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.row.display_label = label.to_string();
        self
    }

    /// Finish the row, filling the derived id, label and color key.
    pub fn build(mut self) -> DataRow {
        let row = &mut self.row;
        row.combination_id = combination_id(
            &row.model,
            &row.team,
            &row.condition,
            &row.harm,
            row.kind.as_deref(),
            row.cases.as_deref(),
            row.grading.as_deref(),
        );
        if row.display_label.is_empty() {
            row.display_label = row.model.clone();
        }
        row.color_key = color_key(&row.condition, &row.team);
        self.row
    }
}

/// Shorthand for a row with just a model, metric and mean.
pub fn row(model: &str, metric: &str, mean: f64) -> DataRow {
    RowBuilder::new(model, metric).mean(mean).build()
}

/// Percent-range metadata.
pub fn percent_meta(id: &str, direction: BetterDirection) -> MetricMetadata {
    MetricMetadata {
        range: RangeKind::Percent,
        better_direction: direction,
        ..MetricMetadata::new(id)
    }
}

/// Absolute-range metadata with an optional axis max.
pub fn absolute_meta(id: &str, direction: BetterDirection, axis_max: Option<f64>) -> MetricMetadata {
    MetricMetadata {
        range: RangeKind::Absolute,
        better_direction: direction,
        axis_max,
        ..MetricMetadata::new(id)
    }
}

/// Deterministically shuffled copy.
pub fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(&mut StdRng::seed_from_u64(seed));
    out
}

/// Assert two floats are within `1e-9`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
