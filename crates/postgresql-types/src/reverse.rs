//! Reverse conversion: PostgreSQL row value → UniversalValue
//!
//! This module reads values fetched for existing-row comparison back into
//! sync-core's `UniversalValue`, using the column's type tag to pick the Rust
//! type to decode into.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres_types::FromSqlOwned;
use rust_decimal::Decimal;
use sync_core::{UniversalType, UniversalValue};
use thiserror::Error;
use tokio_postgres::Row;
use uuid::Uuid;

/// Errors that can occur during PostgreSQL to UniversalValue conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The column could not be decoded as the expected Rust type
    #[error("Failed to decode column {index} as {expected}: {source}")]
    Decode {
        index: usize,
        expected: UniversalType,
        #[source]
        source: tokio_postgres::Error,
    },
}

/// Decode the value at `index` of `row` as a value of `column_type`.
///
/// Columns of [`UniversalType::Other`] must have been selected as text.
pub fn row_value_to_universal(
    row: &Row,
    index: usize,
    column_type: UniversalType,
) -> Result<UniversalValue, ConversionError> {
    match column_type {
        UniversalType::Bool => get(row, index, column_type, UniversalValue::Bool),
        UniversalType::SmallInt => get(row, index, column_type, UniversalValue::Int16),
        UniversalType::Int => get(row, index, column_type, UniversalValue::Int32),
        UniversalType::BigInt => get(row, index, column_type, UniversalValue::Int64),
        UniversalType::Float => get(row, index, column_type, UniversalValue::Float32),
        UniversalType::Double => get(row, index, column_type, UniversalValue::Float64),
        UniversalType::Decimal => get::<Decimal>(row, index, column_type, UniversalValue::Decimal),
        UniversalType::Text | UniversalType::Other => {
            get::<String>(row, index, column_type, UniversalValue::String)
        }
        UniversalType::Uuid => get::<Uuid>(row, index, column_type, UniversalValue::Uuid),
        UniversalType::Date => get::<NaiveDate>(row, index, column_type, UniversalValue::Date),
        UniversalType::Time => get::<NaiveTime>(row, index, column_type, UniversalValue::Time),
        UniversalType::DateTime => {
            get::<NaiveDateTime>(row, index, column_type, UniversalValue::DateTime)
        }
        UniversalType::TimestampTz => {
            get::<DateTime<Utc>>(row, index, column_type, UniversalValue::TimestampTz)
        }
        UniversalType::Json => {
            get::<serde_json::Value>(row, index, column_type, UniversalValue::Json)
        }
    }
}

/// Decode every column of `row`, with `column_types` giving each column's tag.
pub fn row_to_universal_values(
    row: &Row,
    column_types: &[UniversalType],
) -> Result<Vec<UniversalValue>, ConversionError> {
    column_types
        .iter()
        .enumerate()
        .map(|(index, column_type)| row_value_to_universal(row, index, *column_type))
        .collect()
}

fn get<T: FromSqlOwned>(
    row: &Row,
    index: usize,
    expected: UniversalType,
    wrap: fn(T) -> UniversalValue,
) -> Result<UniversalValue, ConversionError> {
    row.try_get::<_, Option<T>>(index)
        .map(|value| value.map(wrap).unwrap_or(UniversalValue::Null))
        .map_err(|source| ConversionError::Decode {
            index,
            expected,
            source,
        })
}
