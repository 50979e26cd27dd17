//! noharm-ingestion: Turns the benchmark CSV exports into the dataset artifact.
//! Covers:
//! - Raw record models for `metrics.csv` and `metadata.csv`
//! - Field coercion and label sanitization
//! - Row normalization with derived keys
//! - Allow-list and exclusion filtering
//! - Artifact assembly and JSON output

pub mod models;
pub mod normalise;
pub mod pipeline;
pub mod sources;

pub use normalise::{clean_string, normalize_metadata, normalize_row, parse_number, sanitize_label};
pub use pipeline::{build_artifact, load_artifact, normalize_records, write_artifact, BuildInputs};
