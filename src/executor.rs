//! Upsert executor: reconcile a batch against the target table.
//!
//! For each row, in batch order:
//!
//! - insert-only: insert the row
//! - merge strategies: look up stored rows with the same identity values; if
//!   none exist insert the row, if every stored match already holds the
//!   row's values skip it, otherwise update the matches
//!
//! Comparisons use typed values, so formatting differences in the input
//! (`"007"` vs `7`, `"1.50"` vs `1.5`) never cause an update.
//!
//! Within one batch the last row for a given identity wins; earlier rows with
//! the same identity are dropped without an outcome. Rows whose identity
//! contains a null never match and are always inserted.

use crate::align::align;
use crate::batch::{materialize, Batch};
use crate::config::UpsertConfig;
use crate::error::{ConfigurationError, UpsertError};
use crate::stats::{RowOutcome, SaveStats};
use record_source::RecordSource;
use std::collections::HashMap;
use sync_core::{TableDefinition, UniversalValue};
use table_sink::{
    BatchSemantics, ColumnValue, ConnectionProvider, StorageError, TableConnection,
};
use text_types::ConverterRegistry;
use tracing::{debug, info, warn};

/// Read every record of `source` and upsert it into the configured table.
///
/// Configuration and provider capability are checked before a connection
/// is acquired. The connection is held for the whole operation and released
/// on every exit path.
pub async fn upsert_records<P, S>(
    provider: &P,
    registry: &ConverterRegistry,
    source: &mut S,
    config: &UpsertConfig,
) -> Result<SaveStats, UpsertError>
where
    P: ConnectionProvider,
    S: RecordSource + ?Sized,
{
    check_capability(provider, config)?;

    let mut connection = provider.connect().await?;
    let table = connection.table_metadata(config.table()).await?;

    let fields = align(source.field_names(), &table, registry);
    let columns: Vec<&str> = fields.iter().map(|f| f.column.as_str()).collect();
    require_columns(&table, &columns)?;
    identity_positions(config, &table, &columns)?;

    let batch = materialize(source, fields)?;
    upsert(&mut connection, &table, &batch, config).await
}

/// Fail if the provider cannot honor the configured batch semantics.
pub fn check_capability<P: ConnectionProvider>(
    provider: &P,
    config: &UpsertConfig,
) -> Result<(), ConfigurationError> {
    config.strategy().validate()?;
    if !provider.supports(config.semantics()) {
        return Err(ConfigurationError::new(format!(
            "Target store does not support '{}' batch semantics",
            config.semantics()
        )));
    }
    Ok(())
}

/// Reconcile `batch` against `table` over an open connection.
pub async fn upsert<C: TableConnection>(
    connection: &mut C,
    table: &TableDefinition,
    batch: &Batch,
    config: &UpsertConfig,
) -> Result<SaveStats, UpsertError> {
    require_columns(table, &batch.columns())?;
    let identity = identity_positions(config, table, &batch.columns())?;

    info!(
        "Upserting {} rows into '{}' (strategy: {}, batch semantics: {})",
        batch.len(),
        table.name,
        config.strategy(),
        config.semantics()
    );
    if config.dry_run() {
        info!("Running in dry-run mode - no data will be written");
    }

    let mut reconciler = Reconciler {
        connection,
        table,
        batch,
        identity,
        dry_run: config.dry_run(),
        row_independent: config.semantics() == BatchSemantics::RowIndependent,
    };

    let stats = if config.semantics() == BatchSemantics::Atomic && !config.dry_run() {
        reconciler.run_atomic().await?
    } else {
        reconciler.run().await?
    };

    info!("Upsert into '{}' complete: {}", table.name, stats);
    Ok(stats)
}

/// Fail if no source field maps to a column of `table`.
fn require_columns(table: &TableDefinition, columns: &[&str]) -> Result<(), ConfigurationError> {
    if columns.is_empty() {
        return Err(ConfigurationError::new(format!(
            "No source field matches a column of table '{}'",
            table.name
        )));
    }
    Ok(())
}

/// Positions of the identity columns within the batch, or `None` for
/// insert-only.
fn identity_positions(
    config: &UpsertConfig,
    table: &TableDefinition,
    columns: &[&str],
) -> Result<Option<Vec<usize>>, ConfigurationError> {
    let Some(identity) = config.strategy().identity_columns(table)? else {
        return Ok(None);
    };

    let mut positions = Vec::with_capacity(identity.len());
    let mut missing = Vec::new();
    for column in &identity {
        match columns.iter().position(|c| c == column) {
            Some(position) => positions.push(position),
            None => missing.push(format!(
                "Identity column '{column}' is not provided by the record source"
            )),
        }
    }
    match ConfigurationError::from_problems(missing) {
        Some(err) => Err(err),
        None => Ok(Some(positions)),
    }
}

struct Reconciler<'a, C> {
    connection: &'a mut C,
    table: &'a TableDefinition,
    batch: &'a Batch,
    identity: Option<Vec<usize>>,
    dry_run: bool,
    row_independent: bool,
}

impl<C: TableConnection> Reconciler<'_, C> {
    async fn run_atomic(&mut self) -> Result<SaveStats, UpsertError> {
        self.connection.begin().await?;
        match self.run().await {
            Ok(stats) => {
                self.connection.commit().await?;
                Ok(stats)
            }
            Err(err) => {
                if let Err(rollback) = self.connection.rollback().await {
                    warn!("Rollback of '{}' failed: {}", self.table.name, rollback);
                }
                Err(err)
            }
        }
    }

    async fn run(&mut self) -> Result<SaveStats, UpsertError> {
        let superseded = self.superseded_rows();
        let mut stats = SaveStats::new();

        for (index, row) in self.batch.rows().iter().enumerate() {
            if superseded[index] {
                debug!("Row {index}: superseded by a later row with the same identity");
                continue;
            }

            match self.reconcile_row(row).await {
                Ok(outcome) => {
                    debug!("Row {index}: {outcome}");
                    stats.record(outcome);
                }
                Err(err) if self.row_independent && err.is_row_level() => {
                    warn!("Row {index} failed: {err}");
                    stats.record_failure(index, err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(stats)
    }

    /// Flags rows whose identity reappears later in the batch.
    fn superseded_rows(&self) -> Vec<bool> {
        let rows = self.batch.rows();
        let mut superseded = vec![false; rows.len()];
        let Some(identity) = &self.identity else {
            return superseded;
        };

        let mut last_seen: HashMap<Vec<&UniversalValue>, usize> = HashMap::new();
        for (index, row) in rows.iter().enumerate() {
            let key: Vec<&UniversalValue> = identity.iter().map(|p| &row[*p]).collect();
            if key.iter().any(|v| v.is_null()) {
                continue;
            }
            if let Some(previous) = last_seen.insert(key, index) {
                superseded[previous] = true;
            }
        }
        superseded
    }

    async fn reconcile_row(&mut self, row: &[UniversalValue]) -> Result<RowOutcome, StorageError> {
        let columns = self.batch.columns();
        let Some(identity) = &self.identity else {
            return self.insert(&columns, row).await;
        };

        let key: Vec<ColumnValue<'_>> = identity.iter().map(|p| (columns[*p], &row[*p])).collect();
        let (rest_columns, rest_values): (Vec<&str>, Vec<&UniversalValue>) = columns
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(position, _)| !identity.contains(position))
            .map(|(_, (column, value))| (*column, value))
            .unzip();

        let existing = self
            .connection
            .find_rows(self.table, &key, &rest_columns)
            .await?;

        if existing.is_empty() {
            return self.insert(&columns, row).await;
        }

        let unchanged = existing.iter().all(|stored| {
            stored.len() == rest_values.len()
                && stored.iter().zip(&rest_values).all(|(a, b)| a == *b)
        });
        if unchanged {
            return Ok(RowOutcome::Unchanged);
        }

        if !self.dry_run {
            let values: Vec<ColumnValue<'_>> = rest_columns.into_iter().zip(rest_values).collect();
            self.connection
                .update_rows(self.table, &key, &values)
                .await?;
        }
        Ok(RowOutcome::Updated)
    }

    async fn insert(
        &mut self,
        columns: &[&str],
        row: &[UniversalValue],
    ) -> Result<RowOutcome, StorageError> {
        if !self.dry_run {
            let values: Vec<ColumnValue<'_>> = columns.iter().copied().zip(row).collect();
            self.connection.insert_row(self.table, &values).await?;
        }
        Ok(RowOutcome::Inserted)
    }
}
