//! Target store trait definitions.
//!
//! These traits are the only channel the upsert engine uses to read and write
//! the target table. Implementations translate the calls into statements for
//! their database; the in-memory store in this crate implements them for tests.

use crate::error::StorageError;
use crate::semantics::BatchSemantics;
use sync_core::{TableDefinition, UniversalValue};

/// A column name paired with a value.
pub type ColumnValue<'a> = (&'a str, &'a UniversalValue);

/// Yields connections to a target store.
///
/// # Usage Pattern
///
/// The engine is generic over the provider, so all calls are statically
/// dispatched:
///
/// ```ignore
/// pub async fn upsert<P: ConnectionProvider>(provider: &P, ...) -> Result<SaveStats, UpsertError> {
///     let mut connection = provider.connect().await?;
///     let table = connection.table_metadata(&config.table).await?;
///     ...
/// }
/// ```
#[async_trait::async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Connection: TableConnection;

    /// Whether connections from this provider can honor the given semantics.
    fn supports(&self, semantics: BatchSemantics) -> bool;

    /// Acquire a connection. The connection is released when dropped.
    async fn connect(&self) -> Result<Self::Connection, StorageError>;
}

/// A live session against the target store.
///
/// Column names in every call are target column names. Key lookups follow SQL
/// semantics: a `NULL` key value never matches a stored row.
#[async_trait::async_trait]
pub trait TableConnection: Send {
    /// Load table metadata from the catalog.
    ///
    /// Fails with [`StorageError::TableNotFound`] if the table does not exist.
    async fn table_metadata(&mut self, table: &str) -> Result<TableDefinition, StorageError>;

    /// Fetch the `columns` of every stored row whose key columns equal `key`.
    async fn find_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        columns: &[&str],
    ) -> Result<Vec<Vec<UniversalValue>>, StorageError>;

    /// Insert one row. Columns not listed take their default.
    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        values: &[ColumnValue<'_>],
    ) -> Result<(), StorageError>;

    /// Set `values` on every stored row whose key columns equal `key`,
    /// returning the number of rows changed.
    async fn update_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        values: &[ColumnValue<'_>],
    ) -> Result<u64, StorageError>;

    /// Start a transaction spanning the following calls.
    async fn begin(&mut self) -> Result<(), StorageError>;

    async fn commit(&mut self) -> Result<(), StorageError>;

    async fn rollback(&mut self) -> Result<(), StorageError>;
}
