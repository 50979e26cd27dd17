//! Radar-chart normalization.
//!
//! Every metric is mapped onto [0, 1] with higher always meaning better, so
//! metrics with different ranges and directions can share one radar axis set.

use serde::{Deserialize, Serialize};

use noharm_common::{CombinationEntry, MetricCatalog, MetricMetadata};

/// Clamp a ratio into [0, 1]. Non-finite ratios map to 0.
fn unit_clamp(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Normalize a metric value onto [0, 1], higher is better.
///
/// Percent metrics are clamped directly. Absolute metrics with a finite
/// `axis_min`..`axis_max` span are min-max scaled onto it; with only a
/// positive `axis_max` they are divided by it, otherwise by `max(|value|, 1)`.
/// Lower-is-better metrics are inverted after scaling.
pub fn normalize_for_radar(value: Option<f64>, meta: &MetricMetadata) -> Option<f64> {
    let value = value.filter(|v| v.is_finite())?;

    let finite = |bound: Option<f64>| bound.filter(|b| b.is_finite());
    let scaled = if meta.is_percent() {
        unit_clamp(value)
    } else {
        match (finite(meta.axis_min), finite(meta.axis_max)) {
            (Some(min), Some(max)) if max > min => unit_clamp((value - min) / (max - min)),
            (_, Some(max)) if max > 0.0 => unit_clamp(value / max),
            _ => unit_clamp(value / value.abs().max(1.0)),
        }
    };

    Some(if meta.higher_is_better() { scaled } else { 1.0 - scaled })
}

/// One radar axis with normalized and raw values for both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub metric_id: String,
    pub label: String,
    pub primary: Option<f64>,
    pub comparison: Option<f64>,
    pub primary_raw: Option<f64>,
    pub comparison_raw: Option<f64>,
}

/// Radar axes for a primary entry and an optional comparison entry.
///
/// Only metrics flagged for the radar are used, and an axis is dropped when
/// neither side has a value. Metrics named in `preferred_order` come first in
/// that order; the rest follow by their `radar_order` position, then catalog
/// order. Metrics without a `radar_order` go after those with one.
pub fn radar_points(
    primary: Option<&CombinationEntry>,
    comparison: Option<&CombinationEntry>,
    catalog: &MetricCatalog,
    preferred_order: &[String],
) -> Vec<RadarPoint> {
    let mut ranked: Vec<((usize, f64, usize), RadarPoint)> = catalog
        .iter()
        .enumerate()
        .filter(|(_, meta)| meta.include_in_radar)
        .filter_map(|(catalog_pos, meta)| {
            let primary_raw = primary.and_then(|e| e.mean(&meta.id));
            let comparison_raw = comparison.and_then(|e| e.mean(&meta.id));
            let point = RadarPoint {
                metric_id: meta.id.clone(),
                label: meta.label().to_string(),
                primary: normalize_for_radar(primary_raw, meta),
                comparison: normalize_for_radar(comparison_raw, meta),
                primary_raw,
                comparison_raw,
            };
            if point.primary.is_none() && point.comparison.is_none() {
                return None;
            }
            let preferred = preferred_order
                .iter()
                .position(|id| id == &meta.id)
                .unwrap_or(preferred_order.len());
            let position = meta.radar_order.filter(|o| o.is_finite()).unwrap_or(f64::INFINITY);
            Some(((preferred, position, catalog_pos), point))
        })
        .collect();

    ranked.sort_by(|((pa, oa, ca), _), ((pb, ob, cb), _)| {
        pa.cmp(pb).then(oa.total_cmp(ob)).then(ca.cmp(cb))
    });
    ranked.into_iter().map(|(_, point)| point).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use noharm_common::BetterDirection;
    use noharm_test_utils::{absolute_meta, assert_close, percent_meta, RowBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_percent_clamped_and_inverted() {
        let higher = percent_meta("Accuracy", BetterDirection::Higher);
        let lower = percent_meta("Harm", BetterDirection::Lower);

        assert_eq!(normalize_for_radar(Some(0.8), &higher), Some(0.8));
        assert_eq!(normalize_for_radar(Some(1.4), &higher), Some(1.0));
        assert_eq!(normalize_for_radar(Some(-0.2), &higher), Some(0.0));
        assert_close(normalize_for_radar(Some(0.8), &lower).unwrap(), 0.2);
    }

    #[test]
    fn test_absolute_with_axis_max() {
        let meta = absolute_meta("nnh", BetterDirection::Higher, Some(50.0));
        assert_close(normalize_for_radar(Some(25.0), &meta).unwrap(), 0.5);
        assert_eq!(normalize_for_radar(Some(80.0), &meta), Some(1.0));

        let lower = absolute_meta("normalized", BetterDirection::Lower, Some(4.0));
        assert_close(normalize_for_radar(Some(1.0), &lower).unwrap(), 0.75);
    }

    #[test]
    fn test_absolute_without_axis_max() {
        let meta = absolute_meta("score", BetterDirection::Higher, None);
        assert_eq!(normalize_for_radar(Some(0.4), &meta), Some(0.4));
        assert_eq!(normalize_for_radar(Some(12.0), &meta), Some(1.0));
        assert_eq!(normalize_for_radar(Some(-3.0), &meta), Some(0.0));

        let zero_axis = absolute_meta("score", BetterDirection::Higher, Some(0.0));
        assert_eq!(normalize_for_radar(Some(0.4), &zero_axis), Some(0.4));
    }

    #[test]
    fn test_missing_and_non_finite() {
        let meta = percent_meta("Accuracy", BetterDirection::Higher);
        assert_eq!(normalize_for_radar(None, &meta), None);
        assert_eq!(normalize_for_radar(Some(f64::NAN), &meta), None);
        assert_eq!(normalize_for_radar(Some(f64::INFINITY), &meta), None);
    }

    #[test]
    fn test_bounds_hold_across_inputs() {
        let metas = [
            percent_meta("p", BetterDirection::Higher),
            percent_meta("p", BetterDirection::Lower),
            absolute_meta("a", BetterDirection::Higher, Some(10.0)),
            absolute_meta("a", BetterDirection::Lower, None),
        ];
        for meta in &metas {
            for value in [-1e9, -5.0, -0.5, 0.0, 0.3, 1.0, 7.5, 1e12] {
                let n = normalize_for_radar(Some(value), meta).unwrap();
                assert!((0.0..=1.0).contains(&n), "{value} -> {n}");
            }
        }
    }

    #[test]
    fn test_radar_points_order_and_drop() {
        let mut hidden = percent_meta("Hidden", BetterDirection::Higher);
        hidden.include_in_radar = false;
        let catalog = MetricCatalog::new(vec![
            absolute_meta("normalized", BetterDirection::Lower, Some(4.0)),
            percent_meta("Safety", BetterDirection::Higher),
            percent_meta("Accuracy", BetterDirection::Higher),
            percent_meta("Empty", BetterDirection::Higher),
            hidden,
        ]);

        let rows = [
            RowBuilder::new("A", "normalized").mean(1.0).build(),
            RowBuilder::new("A", "Safety").mean(0.9).build(),
            RowBuilder::new("A", "Accuracy").mean(0.7).build(),
            RowBuilder::new("A", "Hidden").mean(0.5).build(),
        ];
        let mut entry = CombinationEntry::from_row(&rows[0]);
        for row in &rows {
            entry.metrics.insert(row.metric.clone(), row.clone());
        }

        let order = vec!["Accuracy".to_string(), "Restraint".to_string(), "Safety".to_string()];
        let points = radar_points(Some(&entry), None, &catalog, &order);
        let ids: Vec<&str> = points.iter().map(|p| p.metric_id.as_str()).collect();
        assert_eq!(ids, vec!["Accuracy", "Safety", "normalized"]);
        assert_close(points[2].primary.unwrap(), 0.75);
        assert_eq!(points[2].primary_raw, Some(1.0));
        assert!(points.iter().all(|p| p.comparison.is_none()));
    }

    #[test]
    fn test_absolute_with_axis_span() {
        let mut meta = absolute_meta("delta", BetterDirection::Higher, Some(10.0));
        meta.axis_min = Some(-10.0);
        assert_close(normalize_for_radar(Some(0.0), &meta).unwrap(), 0.5);
        assert_eq!(normalize_for_radar(Some(-15.0), &meta), Some(0.0));

        meta.better_direction = BetterDirection::Lower;
        assert_close(normalize_for_radar(Some(5.0), &meta).unwrap(), 0.25);

        let mut inverted = absolute_meta("delta", BetterDirection::Higher, Some(10.0));
        inverted.axis_min = Some(20.0);
        assert_close(normalize_for_radar(Some(5.0), &inverted).unwrap(), 0.5);
    }

    #[test]
    fn test_radar_points_follow_metadata_order() {
        let mut first = percent_meta("Late", BetterDirection::Higher);
        first.radar_order = Some(2.0);
        let mut second = percent_meta("Early", BetterDirection::Higher);
        second.radar_order = Some(1.0);
        let unordered = percent_meta("Plain", BetterDirection::Higher);
        let catalog = MetricCatalog::new(vec![unordered, first, second]);

        let rows = [
            RowBuilder::new("A", "Late").mean(0.5).build(),
            RowBuilder::new("A", "Early").mean(0.5).build(),
            RowBuilder::new("A", "Plain").mean(0.5).build(),
        ];
        let mut entry = CombinationEntry::from_row(&rows[0]);
        for row in &rows {
            entry.metrics.insert(row.metric.clone(), row.clone());
        }

        let ids = |order: &[String]| -> Vec<String> {
            radar_points(Some(&entry), None, &catalog, order).into_iter().map(|p| p.metric_id).collect()
        };
        assert_eq!(ids(&[]), vec!["Early", "Late", "Plain"]);
        assert_eq!(ids(&["Plain".to_string()]), vec!["Plain", "Early", "Late"]);
    }

    #[test]
    fn test_radar_points_without_entries() {
        let catalog = MetricCatalog::new(vec![percent_meta("Accuracy", BetterDirection::Higher)]);
        assert!(radar_points(None, None, &catalog, &[]).is_empty());
    }
}
