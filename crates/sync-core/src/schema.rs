//! Target table metadata.
//!
//! `TableDefinition` is loaded once from the target database catalog at the
//! start of an upsert operation and is not modified while the operation runs.
//! Columns keep catalog order.

use crate::types::UniversalType;
use serde::{Deserialize, Serialize};

// ============================================================================
// Column / Table
// ============================================================================

/// Column definition loaded from the target catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Normalized value type, selects the converter
    #[serde(rename = "type")]
    pub column_type: UniversalType,

    /// Database-specific type name (e.g. `"pg_catalog"."numeric"`), used by
    /// stores that need to cast pass-through values
    #[serde(default)]
    pub native_type: Option<String>,

    /// Whether this column accepts NULL
    #[serde(default)]
    pub nullable: bool,

    /// Whether this column is part of the primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Create a new NOT NULL column definition.
    pub fn new(name: impl Into<String>, column_type: UniversalType) -> Self {
        Self {
            name: name.into(),
            column_type,
            native_type: None,
            nullable: false,
            primary_key: false,
        }
    }

    /// Create a new nullable column definition.
    pub fn nullable(name: impl Into<String>, column_type: UniversalType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, column_type)
        }
    }

    /// Mark this column as part of the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Attach the database-specific type name.
    pub fn with_native_type(mut self, native_type: impl Into<String>) -> Self {
        self.native_type = Some(native_type.into());
        self
    }
}

/// Target table metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDefinition {
    /// Table name as given by the caller
    pub name: String,

    /// Columns in catalog order
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check whether the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Get the type of a column by name.
    pub fn get_column_type(&self, name: &str) -> Option<UniversalType> {
        self.get_column(name).map(|c| c.column_type)
    }

    /// Position of a column in catalog order.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get all column names in catalog order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the primary key columns, in catalog order.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}
