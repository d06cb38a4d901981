//! Per-row outcomes and the aggregate result of one upsert.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use table_sink::StorageError;

/// What happened to one row of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RowOutcome {
    Inserted,
    Updated,
    Unchanged,
    Failed,
}

impl RowOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowOutcome::Inserted => "Inserted",
            RowOutcome::Updated => "Updated",
            RowOutcome::Unchanged => "Unchanged",
            RowOutcome::Failed => "Failed",
        }
    }
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row the store rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// Zero-based position of the row in the batch
    pub row_index: usize,
    #[serde(serialize_with = "serialize_display")]
    pub error: StorageError,
}

fn serialize_display<S: serde::Serializer>(
    error: &StorageError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome counts of one upsert operation.
///
/// Only outcomes that occurred have an entry; [`SaveStats::count`] returns 0
/// for the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveStats {
    counts: BTreeMap<RowOutcome, u64>,
    failures: Vec<RowFailure>,
}

impl SaveStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: RowOutcome) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    /// Record a `Failed` row together with its error.
    pub fn record_failure(&mut self, row_index: usize, error: StorageError) {
        self.record(RowOutcome::Failed);
        self.failures.push(RowFailure { row_index, error });
    }

    pub fn count(&self, outcome: RowOutcome) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn inserted(&self) -> u64 {
        self.count(RowOutcome::Inserted)
    }

    pub fn updated(&self) -> u64 {
        self.count(RowOutcome::Updated)
    }

    pub fn unchanged(&self) -> u64 {
        self.count(RowOutcome::Unchanged)
    }

    pub fn failed(&self) -> u64 {
        self.count(RowOutcome::Failed)
    }

    /// Number of rows that received an outcome.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn failures(&self) -> &[RowFailure] {
        &self.failures
    }
}

impl fmt::Display for SaveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return f.write_str("no rows");
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(outcome, count)| format!("{outcome}: {count}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
