//! Storage error type.

/// Error raised by a target store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The connection could not be acquired or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// The target table does not exist
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// A statement referenced a column the table does not have
    #[error("Column '{column}' not found in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// The store refused one row (constraint violation, invalid data)
    #[error("Row rejected: {0}")]
    Rejected(String),

    /// Any other statement or transaction failure
    #[error("Statement failed: {0}")]
    Statement(String),
}

impl StorageError {
    /// Whether this error concerns only the row being written, leaving the
    /// connection usable for the next row.
    pub fn is_row_level(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
