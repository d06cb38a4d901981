//! PostgreSQL schema column type conversion.
//!
//! This module provides conversion from PostgreSQL INFORMATION_SCHEMA column types
//! to `UniversalType` for loading target table metadata.

use sync_core::UniversalType;

/// Convert PostgreSQL INFORMATION_SCHEMA column type to UniversalType.
///
/// This function maps PostgreSQL data types (as returned in
/// `information_schema.columns.data_type`, or as `udt_name`) to the type tag
/// that selects the column's converter.
///
/// Types without a dedicated tag map to [`UniversalType::Other`]. Values of such
/// columns are exchanged with the database as text.
///
/// # Example
///
/// ```
/// use postgresql_types::postgresql_column_to_universal_type;
/// use sync_core::UniversalType;
///
/// assert_eq!(postgresql_column_to_universal_type("integer"), UniversalType::Int);
/// assert_eq!(postgresql_column_to_universal_type("inet"), UniversalType::Other);
/// ```
pub fn postgresql_column_to_universal_type(data_type: &str) -> UniversalType {
    match data_type.to_lowercase().as_str() {
        // Numeric types
        "smallint" | "int2" => UniversalType::SmallInt,
        "integer" | "int" | "int4" => UniversalType::Int,
        "bigint" | "int8" => UniversalType::BigInt,
        "real" | "float4" => UniversalType::Float,
        "double precision" | "float8" => UniversalType::Double,
        "numeric" | "decimal" => UniversalType::Decimal,

        // Boolean
        "boolean" | "bool" => UniversalType::Bool,

        // String types. Fixed-width char pads with blanks, so equality with
        // the raw string would not hold; it goes through text instead.
        "text" | "varchar" | "character varying" => UniversalType::Text,

        // Date/Time types
        "date" => UniversalType::Date,
        "time" | "time without time zone" => UniversalType::Time,
        "timestamp" | "timestamp without time zone" => UniversalType::DateTime,
        "timestamptz" | "timestamp with time zone" => UniversalType::TimestampTz,

        // UUID
        "uuid" => UniversalType::Uuid,

        // JSON types
        "json" | "jsonb" => UniversalType::Json,

        _ => UniversalType::Other,
    }
}

/// Quote an identifier for use in SQL text.
///
/// ```
/// use postgresql_types::quote_identifier;
///
/// assert_eq!(quote_identifier("users"), "\"users\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Qualified, quoted type name usable in a cast (`"schema"."type"`).
pub fn qualified_type_name(udt_schema: &str, udt_name: &str) -> String {
    format!(
        "{}.{}",
        quote_identifier(udt_schema),
        quote_identifier(udt_name)
    )
}
