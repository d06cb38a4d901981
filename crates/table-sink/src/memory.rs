//! In-memory target store.
//!
//! `MemoryStore` keeps tables as vectors of rows in catalog column order and
//! enforces NOT NULL and primary key uniqueness the way a relational store
//! would, rejecting the offending row. Transactions snapshot every table on
//! `begin` and restore the snapshot on `rollback` or when a connection is
//! dropped mid-transaction.
//!
//! Clones share the same tables, so a test can keep one handle for seeding
//! and inspection while the engine connects through another.

use crate::error::StorageError;
use crate::semantics::BatchSemantics;
use crate::traits::{ColumnValue, ConnectionProvider, TableConnection};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use sync_core::{TableDefinition, UniversalValue};
use tracing::debug;

#[derive(Debug, Clone)]
struct MemoryTable {
    definition: TableDefinition,
    rows: Vec<Vec<UniversalValue>>,
}

impl MemoryTable {
    fn position(&self, column: &str) -> Result<usize, StorageError> {
        self.definition
            .column_index(column)
            .ok_or_else(|| StorageError::UnknownColumn {
                table: self.definition.name.clone(),
                column: column.to_string(),
            })
    }

    fn key_positions(
        &self,
        key: &[ColumnValue<'_>],
    ) -> Result<Vec<(usize, UniversalValue)>, StorageError> {
        key.iter()
            .map(|(column, value)| Ok((self.position(column)?, (*value).clone())))
            .collect()
    }

    fn matching_rows(&self, key: &[(usize, UniversalValue)]) -> Vec<usize> {
        // NULL never equals anything, including NULL
        if key.iter().any(|(_, value)| value.is_null()) {
            return Vec::new();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| key.iter().all(|(pos, value)| &row[*pos] == value))
            .map(|(index, _)| index)
            .collect()
    }

    fn check_not_null(&self, row: &[UniversalValue]) -> Result<(), StorageError> {
        for (column, value) in self.definition.columns.iter().zip(row) {
            if value.is_null() && !column.nullable {
                return Err(StorageError::Rejected(format!(
                    "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                    column.name, self.definition.name
                )));
            }
        }
        Ok(())
    }

    fn check_unique(
        &self,
        rows: &[Vec<UniversalValue>],
        index: usize,
        row: &[UniversalValue],
    ) -> Result<(), StorageError> {
        let pk: Vec<usize> = self
            .definition
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary_key)
            .map(|(pos, _)| pos)
            .collect();
        if pk.is_empty() {
            return Ok(());
        }

        let duplicate = rows
            .iter()
            .enumerate()
            .any(|(other, existing)| other != index && pk.iter().all(|p| existing[*p] == row[*p]));
        if duplicate {
            let key: Vec<String> = pk.iter().map(|p| row[*p].to_string()).collect();
            return Err(StorageError::Rejected(format!(
                "duplicate key value violates unique constraint \"{}_pkey\": ({})",
                self.definition.name,
                key.join(", ")
            )));
        }
        Ok(())
    }

    fn insert(&mut self, values: &[ColumnValue<'_>]) -> Result<(), StorageError> {
        let mut row = vec![UniversalValue::Null; self.definition.columns.len()];
        for (column, value) in values {
            row[self.position(column)?] = (*value).clone();
        }
        self.check_not_null(&row)?;
        self.check_unique(&self.rows, usize::MAX, &row)?;
        self.rows.push(row);
        Ok(())
    }

    fn update(
        &mut self,
        key: &[ColumnValue<'_>],
        values: &[ColumnValue<'_>],
    ) -> Result<u64, StorageError> {
        let key = self.key_positions(key)?;
        let assignments: Vec<(usize, UniversalValue)> = values
            .iter()
            .map(|(column, value)| Ok((self.position(column)?, (*value).clone())))
            .collect::<Result<_, StorageError>>()?;

        let matching = self.matching_rows(&key);
        let mut rows = self.rows.clone();
        for index in &matching {
            for (pos, value) in &assignments {
                rows[*index][*pos] = value.clone();
            }
        }
        for index in &matching {
            self.check_not_null(&rows[*index])?;
            self.check_unique(&rows, *index, &rows[*index])?;
        }

        self.rows = rows;
        Ok(matching.len() as u64)
    }
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, MemoryTable>,
    writes: usize,
    write_limit: Option<usize>,
}

impl State {
    fn check_connection(&self) -> Result<(), StorageError> {
        match self.write_limit {
            Some(limit) if self.writes >= limit => Err(StorageError::Connection(
                "connection to in-memory store lost".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn table(&self, name: &str) -> Result<&MemoryTable, StorageError> {
        self.check_connection()?;
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable, StorageError> {
        self.check_connection()?;
        self.tables
            .get_mut(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    connections_opened: AtomicUsize,
    connections_open: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory target store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    transactions: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store supporting both batch semantics.
    pub fn new() -> Self {
        Self {
            shared: Arc::default(),
            transactions: true,
        }
    }

    /// A handle on the same tables that refuses transactions.
    pub fn without_transactions(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            transactions: false,
        }
    }

    /// Create (or replace) a table.
    pub fn create_table(&self, definition: TableDefinition) {
        let mut state = self.shared.lock();
        state.tables.insert(
            definition.name.clone(),
            MemoryTable {
                definition,
                rows: Vec::new(),
            },
        );
    }

    /// Insert a row given in catalog column order.
    pub fn insert(&self, table: &str, row: Vec<UniversalValue>) -> Result<(), StorageError> {
        let mut state = self.shared.lock();
        let table = state
            .tables
            .get_mut(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;
        let names: Vec<String> = table
            .definition
            .columns
            .iter()
            .map(|c| c.name.clone())
            .collect();
        let values: Vec<ColumnValue<'_>> = names.iter().map(String::as_str).zip(&row).collect();
        table.insert(&values)
    }

    /// Rows of a table in insertion order, in catalog column order.
    pub fn rows(&self, table: &str) -> Vec<Vec<UniversalValue>> {
        let state = self.shared.lock();
        state
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Total number of connections handed out so far.
    pub fn connections_opened(&self) -> usize {
        self.shared.connections_opened.load(Ordering::SeqCst)
    }

    /// Number of connections currently alive.
    pub fn connections_open(&self) -> usize {
        self.shared.connections_open.load(Ordering::SeqCst)
    }

    /// Simulate losing the connection once `writes` more writes succeeded.
    pub fn fail_writes_after(&self, writes: usize) {
        let mut state = self.shared.lock();
        state.write_limit = Some(state.writes + writes);
    }
}

#[async_trait::async_trait]
impl ConnectionProvider for MemoryStore {
    type Connection = MemoryConnection;

    fn supports(&self, semantics: BatchSemantics) -> bool {
        match semantics {
            BatchSemantics::RowIndependent => true,
            BatchSemantics::Atomic => self.transactions,
        }
    }

    async fn connect(&self) -> Result<MemoryConnection, StorageError> {
        self.shared.lock().check_connection()?;
        let opened = self.shared.connections_opened.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.connections_open.fetch_add(1, Ordering::SeqCst);
        debug!("Opened in-memory connection #{opened}");
        Ok(MemoryConnection {
            shared: Arc::clone(&self.shared),
            transactions: self.transactions,
            snapshot: None,
        })
    }
}

/// Connection to a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryConnection {
    shared: Arc<Shared>,
    transactions: bool,
    snapshot: Option<HashMap<String, MemoryTable>>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            debug!("Connection dropped inside a transaction, rolling back");
            self.shared.lock().tables = snapshot;
        }
        self.shared.connections_open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl TableConnection for MemoryConnection {
    async fn table_metadata(&mut self, table: &str) -> Result<TableDefinition, StorageError> {
        let state = self.shared.lock();
        Ok(state.table(table)?.definition.clone())
    }

    async fn find_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        columns: &[&str],
    ) -> Result<Vec<Vec<UniversalValue>>, StorageError> {
        let state = self.shared.lock();
        let stored = state.table(&table.name)?;
        let key = stored.key_positions(key)?;
        let positions: Vec<usize> = columns
            .iter()
            .map(|c| stored.position(c))
            .collect::<Result<_, _>>()?;

        Ok(stored
            .matching_rows(&key)
            .into_iter()
            .map(|index| {
                positions
                    .iter()
                    .map(|pos| stored.rows[index][*pos].clone())
                    .collect()
            })
            .collect())
    }

    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        values: &[ColumnValue<'_>],
    ) -> Result<(), StorageError> {
        let mut state = self.shared.lock();
        state.table_mut(&table.name)?.insert(values)?;
        state.writes += 1;
        Ok(())
    }

    async fn update_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        values: &[ColumnValue<'_>],
    ) -> Result<u64, StorageError> {
        let mut state = self.shared.lock();
        let updated = state.table_mut(&table.name)?.update(key, values)?;
        state.writes += 1;
        Ok(updated)
    }

    async fn begin(&mut self) -> Result<(), StorageError> {
        if !self.transactions {
            return Err(StorageError::Statement(
                "transactions are not supported by this store".to_string(),
            ));
        }
        if self.snapshot.is_some() {
            return Err(StorageError::Statement(
                "a transaction is already in progress".to_string(),
            ));
        }
        self.snapshot = Some(self.shared.lock().tables.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        self.shared.lock().check_connection()?;
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        if let Some(snapshot) = self.snapshot.take() {
            self.shared.lock().tables = snapshot;
        }
        Ok(())
    }
}
