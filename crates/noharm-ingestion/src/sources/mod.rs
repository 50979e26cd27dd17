//! Source file readers.
//!
//! `metrics_csv`: per-row benchmark results (`metrics.csv`)
//! `metadata_csv`: the metric catalog (`metadata.csv`)

pub mod csv_source;

pub use csv_source::{read_metadata_records, read_metric_records, MetricSource};
