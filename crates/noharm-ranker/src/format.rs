//! Display formatting for metric values.

use noharm_common::MetricMetadata;

/// Placeholder shown for missing or non-finite values.
pub const MISSING: &str = "NA";

/// Number formatting knobs. `digits` of `None` uses the range default
/// (1 for percent, 2 for absolute).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub digits: Option<usize>,
    pub include_symbol: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { digits: None, include_symbol: true }
    }
}

impl FormatOptions {
    pub fn with_digits(digits: usize) -> Self {
        Self { digits: Some(digits), ..Self::default() }
    }

    pub fn without_symbol(self) -> Self {
        Self { include_symbol: false, ..self }
    }
}

/// Round to `digits` decimals with ties going away from zero, so 0.125
/// shows as 0.13 rather than the round-half-even 0.12.
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits.min(15) as i32);
    let scaled = (value * factor).round() / factor;
    if scaled.is_finite() { scaled } else { value }
}

/// Format a metric value for display.
///
/// Percent metrics are scaled by 100 and suffixed with `%` unless the symbol
/// is turned off. Without metadata the value is treated as absolute.
pub fn format_metric_value(value: Option<f64>, meta: Option<&MetricMetadata>, options: FormatOptions) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return MISSING.to_string(),
    };

    if meta.is_some_and(MetricMetadata::is_percent) {
        let digits = options.digits.unwrap_or(1);
        let symbol = if options.include_symbol { "%" } else { "" };
        format!("{:.prec$}{symbol}", round_half_away(value * 100.0, digits), prec = digits)
    } else {
        let digits = options.digits.unwrap_or(2);
        format!("{:.prec$}", round_half_away(value, digits), prec = digits)
    }
}

/// Format a mean with its confidence half-width, e.g. `87.5% ± 2.1%`.
/// A missing or zero `ci` gives just the mean.
pub fn format_with_ci(
    mean: Option<f64>,
    ci: Option<f64>,
    meta: Option<&MetricMetadata>,
    options: FormatOptions,
) -> String {
    let formatted = format_metric_value(mean, meta, options);
    match ci {
        Some(ci) if ci.is_finite() && ci != 0.0 && formatted != MISSING => {
            format!("{formatted} ± {}", format_metric_value(Some(ci), meta, options))
        }
        _ => formatted,
    }
}
