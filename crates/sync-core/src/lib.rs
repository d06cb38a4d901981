//! Core types for the table-upsert engine.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`UniversalType`] - Closed tag naming the native value type of a target column
//! - [`UniversalValue`] - A normalized, typed value with typed equality
//! - [`ColumnDefinition`] / [`TableDefinition`] - Target table metadata
//!
//! # Architecture
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── text-types        (string → UniversalValue converters)
//!    ├─── record-source     (raw string records)
//!    ├─── table-sink        (target store interface, in-memory store)
//!    ├─── postgresql-types  (UniversalValue ⇄ PostgreSQL)
//!    └─── postgresql-sink   (PostgreSQL target store)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sync_core::{ColumnDefinition, TableDefinition, UniversalType, UniversalValue};
//!
//! let table = TableDefinition::new(
//!     "test_table",
//!     vec![
//!         ColumnDefinition::new("id", UniversalType::BigInt).primary_key(),
//!         ColumnDefinition::nullable("name", UniversalType::Text),
//!     ],
//! );
//! assert_eq!(table.primary_key_columns(), vec!["id"]);
//! assert_eq!(UniversalValue::Int64(1), UniversalValue::Int64(1));
//! ```

pub mod schema;
pub mod types;
pub mod values;

pub use schema::{ColumnDefinition, TableDefinition};
pub use types::UniversalType;
pub use values::UniversalValue;
