//! Field coercion and row normalization.
//!
//! Required fields (`Model`, `Metric`) fail fast with a validation error.
//! Optional numeric and string fields fail soft: anything unparsable becomes
//! `None` without an error.

use std::sync::OnceLock;

use regex::Regex;

use noharm_common::entities::{color_key, combination_id};
use noharm_common::{BetterDirection, DataRow, MetricMetadata, NoharmError, RangeKind, Result};

use crate::models::{RawMetadataRecord, RawMetricRecord};

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Parse a numeric cell. Blank, "NA" and non-finite values become `None`.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trim a string cell. Blank and "na" become `None`.
pub fn clean_string(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Strip `<...>` tags and trim. `None` gives "".
pub fn sanitize_label(raw: Option<&str>) -> String {
    match raw {
        Some(label) => tag_regex().replace_all(label, "").trim().to_string(),
        None => String::new(),
    }
}

/// Trial counts are non-negative integers; anything else is `None`.
fn parse_trials(raw: Option<&str>) -> Option<u32> {
    parse_number(raw)
        .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32)
}

/// `Include` column: only "true" includes a metric. A blank cell excludes
/// it; a file without the column includes everything.
fn include_flag(raw: Option<&str>) -> bool {
    raw.map_or(true, |value| value.trim().eq_ignore_ascii_case("true"))
}

/// `Radar` column: optional, so blank or "true" keeps the metric on the radar.
fn radar_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => true,
        Some(value) => value.eq_ignore_ascii_case("true"),
    }
}

/// Normalize one `metrics.csv` record into a typed row with derived fields.
/// `record` is the record's position in its batch, used in error messages.
pub fn normalize_row(raw: &RawMetricRecord, record: usize) -> Result<DataRow> {
    let model = clean_string(raw.model.as_deref()).ok_or_else(|| NoharmError::missing(record, "Model"))?;
    let metric = clean_string(raw.metric.as_deref()).ok_or_else(|| NoharmError::missing(record, "Metric"))?;

    let team = clean_string(raw.team.as_deref()).unwrap_or_default();
    let condition = clean_string(raw.condition.as_deref()).unwrap_or_default();
    let harm = clean_string(raw.harm.as_deref()).unwrap_or_default();

    let format = clean_string(raw.format.as_deref());
    let cases = clean_string(raw.cases.as_deref());
    let grading = clean_string(raw.grading.as_deref());
    let kind = clean_string(raw.kind.as_deref());
    let label = clean_string(raw.label.as_deref());

    let sanitized = sanitize_label(label.as_deref());
    let display_label = if sanitized.is_empty() { model.clone() } else { sanitized };

    let combination_id = combination_id(
        &model,
        &team,
        &condition,
        &harm,
        kind.as_deref(),
        cases.as_deref(),
        grading.as_deref(),
    );
    let color_key = color_key(&condition, &team);

    Ok(DataRow {
        trials: parse_trials(raw.trials.as_deref()),
        mean: parse_number(raw.mean.as_deref()),
        sd: parse_number(raw.sd.as_deref()),
        se: parse_number(raw.se.as_deref()),
        ci: parse_number(raw.ci.as_deref()),
        order1: parse_number(raw.order1.as_deref()),
        order2: parse_number(raw.order2.as_deref()),
        model,
        team,
        condition,
        harm,
        metric,
        format,
        cases,
        grading,
        kind,
        label,
        display_label,
        combination_id,
        color_key,
    })
}

/// Normalize one `metadata.csv` record.
/// Returns `Ok(None)` for metrics marked as not included.
pub fn normalize_metadata(raw: &RawMetadataRecord, record: usize) -> Result<Option<MetricMetadata>> {
    let id = clean_string(raw.metric.as_deref()).ok_or_else(|| NoharmError::missing(record, "Metric"))?;
    let order = parse_number(raw.order.as_deref()).ok_or_else(|| NoharmError::Validation {
        record,
        field: "Order",
        reason: format!("must be a number (got {:?})", raw.order.as_deref().unwrap_or("")),
    })?;
    let display_label = clean_string(raw.display.as_deref()).ok_or_else(|| NoharmError::missing(record, "Display"))?;

    if !include_flag(raw.include.as_deref()) {
        return Ok(None);
    }

    Ok(Some(MetricMetadata {
        id,
        order,
        range: raw.range.as_deref().map(RangeKind::parse).unwrap_or_default(),
        display_label,
        description: raw.description.as_deref().map(str::trim).unwrap_or("").to_string(),
        better_direction: raw.better.as_deref().map(BetterDirection::parse).unwrap_or_default(),
        axis_min: parse_number(raw.axis_min.as_deref()),
        axis_max: parse_number(raw.axis_max.as_deref()),
        include_in_radar: radar_flag(raw.radar.as_deref()),
        radar_order: parse_number(raw.radar_order.as_deref()),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
