//! Error types for the upsert engine.

use record_source::MalformedRecordError;
use table_sink::StorageError;
use text_types::ConversionError;
use thiserror::Error;

/// Every problem found while validating an upsert configuration.
///
/// Validation runs before any I/O and reports all problems together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid configuration: {}", .problems.join("; "))]
pub struct ConfigurationError {
    problems: Vec<String>,
}

impl ConfigurationError {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }

    /// Build an error from collected problems. Returns `None` if there are none.
    pub fn from_problems(problems: Vec<String>) -> Option<Self> {
        if problems.is_empty() {
            None
        } else {
            Some(Self { problems })
        }
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

/// Errors that fail a whole upsert operation.
#[derive(Error, Debug)]
pub enum UpsertError {
    /// Invalid strategy, key columns or batch semantics
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The record source could not decode its next record
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),

    /// A field value does not match its column's type
    #[error("Field '{field}' of record {record_index}: {source}")]
    Conversion {
        field: String,
        /// Zero-based position of the record in the stream
        record_index: usize,
        #[source]
        source: ConversionError,
    },

    /// Connectivity loss, missing table or a failed transaction
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
