use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoharmError {
    /// A record broke the source schema (missing required field, bad shape).
    /// `record` is the zero-based position of the record in its batch.
    #[error("Validation error in record {record}: field `{field}` {reason}")]
    Validation {
        record: usize,
        field: &'static str,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NoharmError {
    /// Shorthand for a required field that is absent or blank.
    pub fn missing(record: usize, field: &'static str) -> Self {
        NoharmError::Validation {
            record,
            field,
            reason: "is required but missing".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NoharmError>;
