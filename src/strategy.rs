//! Row identity policies.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use sync_core::TableDefinition;

/// How rows of a batch are matched against stored rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Insert every row unconditionally
    InsertOnly,
    /// Match on the table's declared primary key
    #[default]
    MergeByPrimaryKey,
    /// Match on an explicit, non-empty list of columns
    MergeByKeyColumns(Vec<String>),
}

impl MatchStrategy {
    /// Names accepted by [`MatchStrategy::parse`].
    pub const NAMES: [&'static str; 3] = ["pk", "key_columns", "insert_only"];

    /// Build a strategy from its configuration name and key columns.
    ///
    /// Key columns are only used by `key_columns`.
    pub fn parse(name: &str, key_columns: &[String]) -> Result<Self, ConfigurationError> {
        let strategy = match name.trim().to_lowercase().as_str() {
            "pk" | "primary_key" => MatchStrategy::MergeByPrimaryKey,
            "key_columns" => MatchStrategy::MergeByKeyColumns(key_columns.to_vec()),
            "insert_only" => MatchStrategy::InsertOnly,
            other => {
                return Err(ConfigurationError::new(format!(
                    "Unknown match strategy '{other}'. Expected one of: {}",
                    Self::NAMES.join(", ")
                )))
            }
        };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchStrategy::InsertOnly => "insert_only",
            MatchStrategy::MergeByPrimaryKey => "pk",
            MatchStrategy::MergeByKeyColumns(_) => "key_columns",
        }
    }

    /// Check the strategy without looking at any table.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let MatchStrategy::MergeByKeyColumns(columns) = self else {
            return Ok(());
        };

        let mut problems = Vec::new();
        if columns.is_empty() {
            problems.push("Match strategy 'key_columns' requires at least one key column".to_string());
        }
        for (i, column) in columns.iter().enumerate() {
            if column.trim().is_empty() {
                problems.push(format!("Key column {} is blank", i + 1));
            } else if columns[..i].contains(column) {
                problems.push(format!("Key column '{column}' is listed more than once"));
            }
        }
        match ConfigurationError::from_problems(problems) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Columns identifying a row in `table`, or `None` for insert-only.
    ///
    /// Fails if the table has no primary key when one is needed, or if a
    /// configured key column does not exist in the table.
    pub fn identity_columns(
        &self,
        table: &TableDefinition,
    ) -> Result<Option<Vec<String>>, ConfigurationError> {
        match self {
            MatchStrategy::InsertOnly => Ok(None),
            MatchStrategy::MergeByPrimaryKey => {
                let key = table.primary_key_columns();
                if key.is_empty() {
                    return Err(ConfigurationError::new(format!(
                        "Table '{}' has no primary key; use match strategy 'key_columns' or 'insert_only'",
                        table.name
                    )));
                }
                Ok(Some(key.into_iter().map(str::to_string).collect()))
            }
            MatchStrategy::MergeByKeyColumns(columns) => {
                self.validate()?;
                let problems: Vec<String> = columns
                    .iter()
                    .filter(|c| !table.has_column(c))
                    .map(|c| format!("Key column '{c}' not found in table '{}'", table.name))
                    .collect();
                match ConfigurationError::from_problems(problems) {
                    Some(err) => Err(err),
                    None => Ok(Some(columns.clone())),
                }
            }
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStrategy::MergeByKeyColumns(columns) => {
                write!(f, "key_columns({})", columns.join(", "))
            }
            other => f.write_str(other.name()),
        }
    }
}
