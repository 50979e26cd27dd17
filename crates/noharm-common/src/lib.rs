//! noharm-common: Shared types, errors, and lookups used across all NOHARM crates.

pub mod error;
pub mod entities;
pub mod metadata;
pub mod artifact;

// Re-export commonly used types
pub use artifact::DatasetArtifact;
pub use entities::{CombinationEntry, DataRow, KEY_SEPARATOR};
pub use error::{NoharmError, Result};
pub use metadata::{BetterDirection, MetricCatalog, MetricMetadata, RangeKind};
