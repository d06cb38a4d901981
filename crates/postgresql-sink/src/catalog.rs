//! Target table metadata from the PostgreSQL catalog.

use crate::error::classify;
use crate::sql::quote_table_name;
use postgresql_types::{postgresql_column_to_universal_type, qualified_type_name};
use sync_core::{ColumnDefinition, TableDefinition};
use table_sink::StorageError;
use tokio_postgres::types::ToSql;
use tokio_postgres::Client;
use tracing::debug;

const COLUMNS_QUERY: &str = "
    SELECT column_name::text, data_type::text, udt_schema::text, udt_name::text, is_nullable::text
    FROM information_schema.columns
    WHERE table_schema::text = COALESCE($1::text, current_schema())
    AND table_name::text = $2::text
    ORDER BY ordinal_position
";

const PRIMARY_KEY_QUERY: &str = "
    SELECT a.attname::text AS column_name
    FROM pg_index i
    JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey)
    WHERE i.indrelid = $1::text::regclass
    AND i.indisprimary
    ORDER BY array_position(i.indkey, a.attnum)
";

/// Split `schema.table` into its parts. An unqualified name resolves
/// against the session's current schema.
pub fn split_table_name(table: &str) -> (Option<&str>, &str) {
    match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    }
}

/// Load columns, nullability and primary key of `table`.
pub async fn load_table(client: &Client, table: &str) -> Result<TableDefinition, StorageError> {
    let (schema, name) = split_table_name(table);
    let params: [&(dyn ToSql + Sync); 2] = [&schema, &name];
    let rows = client
        .query(COLUMNS_QUERY, &params)
        .await
        .map_err(classify)?;

    if rows.is_empty() {
        return Err(StorageError::TableNotFound(table.to_string()));
    }

    let primary_key = primary_key_columns(client, table).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let column_name: String = row.try_get(0).map_err(classify)?;
        let data_type: String = row.try_get(1).map_err(classify)?;
        let udt_schema: String = row.try_get(2).map_err(classify)?;
        let udt_name: String = row.try_get(3).map_err(classify)?;
        let is_nullable: String = row.try_get(4).map_err(classify)?;

        let mut column = ColumnDefinition::new(
            column_name,
            postgresql_column_to_universal_type(&data_type),
        )
        .with_native_type(qualified_type_name(&udt_schema, &udt_name));
        column.nullable = is_nullable == "YES";
        if primary_key.contains(&column.name) {
            column = column.primary_key();
        }
        columns.push(column);
    }

    debug!(
        "Loaded {} columns for table '{}' (primary key: {:?})",
        columns.len(),
        table,
        primary_key
    );

    Ok(TableDefinition::new(table, columns))
}

/// Get primary key columns for a table, in key order.
async fn primary_key_columns(client: &Client, table: &str) -> Result<Vec<String>, StorageError> {
    let qualified = quote_table_name(table);
    let rows = client
        .query(PRIMARY_KEY_QUERY, &[&qualified])
        .await
        .map_err(classify)?;
    rows.iter()
        .map(|row| row.try_get::<_, String>(0).map_err(classify))
        .collect()
}
