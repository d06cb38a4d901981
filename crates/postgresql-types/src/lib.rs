//! PostgreSQL type conversions for sync-core types.
//!
//! This crate provides bidirectional type conversions between sync-core's
//! `UniversalValue` and PostgreSQL's native types via `tokio-postgres`.
//!
//! # Modules
//!
//! - [`schema`] - INFORMATION_SCHEMA type name → UniversalType, identifier quoting
//! - [`forward`] - UniversalValue → PostgreSQL parameter conversion
//! - [`reverse`] - PostgreSQL row value → UniversalValue conversion
//!
//! # Example
//!
//! ```ignore
//! use postgresql_types::{param_refs, to_sql_param};
//! use sync_core::UniversalValue;
//!
//! let params = vec![to_sql_param(&UniversalValue::Int32(1))];
//! client.execute("DELETE FROM \"t\" WHERE \"id\" = $1", &param_refs(&params)).await?;
//! ```

pub mod forward;
pub mod reverse;
pub mod schema;

pub use forward::{param_refs, to_sql_param, SqlNull};
pub use reverse::{row_to_universal_values, row_value_to_universal, ConversionError};
pub use schema::{postgresql_column_to_universal_type, qualified_type_name, quote_identifier};
