//! PostgreSQL connection provider and table connection.

use crate::catalog;
use crate::error::classify;
use crate::sql;
use postgresql_types::{param_refs, row_to_universal_values, to_sql_param};
use sync_core::{TableDefinition, UniversalType, UniversalValue};
use table_sink::{BatchSemantics, ColumnValue, ConnectionProvider, StorageError, TableConnection};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

/// Hands out PostgreSQL connections for one connection string.
///
/// PostgreSQL runs every statement in its own implicit transaction unless a
/// transaction is open, so both batch semantics are supported.
#[derive(Debug, Clone)]
pub struct PostgreSQLProvider {
    connection_string: String,
}

impl PostgreSQLProvider {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }
}

#[async_trait::async_trait]
impl ConnectionProvider for PostgreSQLProvider {
    type Connection = PostgreSQLConnection;

    fn supports(&self, _semantics: BatchSemantics) -> bool {
        true
    }

    async fn connect(&self) -> Result<PostgreSQLConnection, StorageError> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Spawn connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        debug!("Connected to PostgreSQL");
        Ok(PostgreSQLConnection { client })
    }
}

/// A PostgreSQL session. Dropping it closes the connection, which rolls back
/// any open transaction.
pub struct PostgreSQLConnection {
    client: Client,
}

fn split_pairs<'a>(pairs: &'a [ColumnValue<'_>]) -> (Vec<&'a str>, Vec<&'a UniversalValue>) {
    pairs.iter().map(|(column, value)| (*column, *value)).unzip()
}

#[async_trait::async_trait]
impl TableConnection for PostgreSQLConnection {
    async fn table_metadata(&mut self, table: &str) -> Result<TableDefinition, StorageError> {
        catalog::load_table(&self.client, table).await
    }

    async fn find_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        columns: &[&str],
    ) -> Result<Vec<Vec<UniversalValue>>, StorageError> {
        // NULL = NULL is never true, so no stored row can match
        if key.iter().any(|(_, value)| value.is_null()) {
            return Ok(Vec::new());
        }

        let (key_columns, key_values) = split_pairs(key);
        let statement = sql::select_sql(table, &key_columns, columns)?;
        let params: Vec<_> = key_values.into_iter().map(to_sql_param).collect();

        let column_types: Vec<UniversalType> = columns
            .iter()
            .map(|c| table.get_column_type(c).unwrap_or(UniversalType::Other))
            .collect();

        let rows = self
            .client
            .query(&statement, &param_refs(&params))
            .await
            .map_err(classify)?;

        rows.iter()
            .map(|row| {
                row_to_universal_values(row, &column_types)
                    .map_err(|e| StorageError::Statement(e.to_string()))
            })
            .collect()
    }

    async fn insert_row(
        &mut self,
        table: &TableDefinition,
        values: &[ColumnValue<'_>],
    ) -> Result<(), StorageError> {
        let (columns, values) = split_pairs(values);
        let statement = sql::insert_sql(table, &columns)?;
        let params: Vec<_> = values.into_iter().map(to_sql_param).collect();

        self.client
            .execute(&statement, &param_refs(&params))
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn update_rows(
        &mut self,
        table: &TableDefinition,
        key: &[ColumnValue<'_>],
        values: &[ColumnValue<'_>],
    ) -> Result<u64, StorageError> {
        if values.is_empty() || key.iter().any(|(_, value)| value.is_null()) {
            return Ok(0);
        }

        let (key_columns, key_values) = split_pairs(key);
        let (columns, values) = split_pairs(values);
        let statement = sql::update_sql(table, &key_columns, &columns)?;
        let params: Vec<_> = values
            .into_iter()
            .chain(key_values)
            .map(to_sql_param)
            .collect();

        self.client
            .execute(&statement, &param_refs(&params))
            .await
            .map_err(classify)
    }

    async fn begin(&mut self) -> Result<(), StorageError> {
        self.client.batch_execute("BEGIN").await.map_err(classify)
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        self.client.batch_execute("COMMIT").await.map_err(classify)
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        self.client.batch_execute("ROLLBACK").await.map_err(classify)
    }
}
