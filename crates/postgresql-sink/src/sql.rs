//! SQL text for lookups and writes.
//!
//! Every value is a positional parameter. Columns tagged
//! [`UniversalType::Other`] exchange their values as text: parameters are
//! cast from text to the column's native type, and selected columns are cast
//! to text.

use postgresql_types::quote_identifier;
use sync_core::{ColumnDefinition, TableDefinition, UniversalType};
use table_sink::StorageError;

/// Quote a possibly schema-qualified table name (`schema.table`).
pub fn quote_table_name(table: &str) -> String {
    match table.split_once('.') {
        Some((schema, name)) => format!("{}.{}", quote_identifier(schema), quote_identifier(name)),
        None => quote_identifier(table),
    }
}

fn column<'a>(table: &'a TableDefinition, name: &str) -> Result<&'a ColumnDefinition, StorageError> {
    table
        .get_column(name)
        .ok_or_else(|| StorageError::UnknownColumn {
            table: table.name.clone(),
            column: name.to_string(),
        })
}

fn is_text_exchanged(column: &ColumnDefinition) -> bool {
    column.column_type == UniversalType::Other && column.native_type.is_some()
}

/// Placeholder for parameter `index` bound to `column`.
fn placeholder(column: &ColumnDefinition, index: usize) -> String {
    match (&column.native_type, is_text_exchanged(column)) {
        (Some(native), true) => format!("${index}::text::{native}"),
        _ => format!("${index}"),
    }
}

/// Select-list expression for `column`.
fn select_expr(column: &ColumnDefinition) -> String {
    let quoted = quote_identifier(&column.name);
    if is_text_exchanged(column) {
        format!("{quoted}::text")
    } else {
        quoted
    }
}

/// `WHERE` conditions for key columns, numbering parameters from `first`.
fn key_conditions(
    table: &TableDefinition,
    key: &[&str],
    first: usize,
) -> Result<String, StorageError> {
    let conditions = key
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let column = column(table, name)?;
            Ok(format!(
                "{} = {}",
                quote_identifier(&column.name),
                placeholder(column, first + i)
            ))
        })
        .collect::<Result<Vec<_>, StorageError>>()?;
    Ok(conditions.join(" AND "))
}

/// `SELECT <columns> FROM <table> WHERE <key> = ...`
///
/// Key parameters are `$1..$n` in key order.
pub fn select_sql(
    table: &TableDefinition,
    key: &[&str],
    columns: &[&str],
) -> Result<String, StorageError> {
    let select_list = columns
        .iter()
        .map(|name| column(table, name).map(select_expr))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "SELECT {} FROM {} WHERE {}",
        select_list.join(", "),
        quote_table_name(&table.name),
        key_conditions(table, key, 1)?
    ))
}

/// `INSERT INTO <table> (<columns>) VALUES (...)`
pub fn insert_sql(table: &TableDefinition, columns: &[&str]) -> Result<String, StorageError> {
    if columns.is_empty() {
        return Err(StorageError::Statement(format!(
            "Insert into '{}' names no columns",
            table.name
        )));
    }
    let mut names = Vec::with_capacity(columns.len());
    let mut placeholders = Vec::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        let column = column(table, name)?;
        names.push(quote_identifier(&column.name));
        placeholders.push(placeholder(column, i + 1));
    }
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_table_name(&table.name),
        names.join(", "),
        placeholders.join(", ")
    ))
}

/// `UPDATE <table> SET <columns> = ... WHERE <key> = ...`
///
/// Assigned values are `$1..$m`, key values follow.
pub fn update_sql(
    table: &TableDefinition,
    key: &[&str],
    columns: &[&str],
) -> Result<String, StorageError> {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let column = column(table, name)?;
            Ok(format!(
                "{} = {}",
                quote_identifier(&column.name),
                placeholder(column, i + 1)
            ))
        })
        .collect::<Result<Vec<_>, StorageError>>()?;
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        quote_table_name(&table.name),
        assignments.join(", "),
        key_conditions(table, key, columns.len() + 1)?
    ))
}
