//! Batch failure semantics.
//!
//! Provides the `BatchSemantics` enum selecting how storage failures during
//! one upsert operation affect the rest of the batch.

use serde::{Deserialize, Serialize};

/// How a storage failure affects the rest of the batch.
///
/// Target stores declare which of these they support; the choice is part of
/// the operation's configuration and is never made implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatchSemantics {
    /// Every row is written on its own.
    ///
    /// A row rejected by the store is reported as failed and the remaining
    /// rows are still processed.
    #[default]
    #[serde(rename = "row", alias = "row_independent")]
    RowIndependent,
    /// The whole batch is written in one transaction.
    ///
    /// Any storage failure rolls the batch back and fails the operation.
    #[serde(rename = "atomic")]
    Atomic,
}

impl std::fmt::Display for BatchSemantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowIndependent => write!(f, "row"),
            Self::Atomic => write!(f, "atomic"),
        }
    }
}

impl std::str::FromStr for BatchSemantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "row" | "row_independent" => Ok(Self::RowIndependent),
            "atomic" => Ok(Self::Atomic),
            _ => Err(format!(
                "Invalid batch semantics: '{s}'. Expected 'row' or 'atomic'"
            )),
        }
    }
}
