//! PostgreSQL target store.
//!
//! Implements the `table-sink` traits over `tokio-postgres`:
//!
//! - table metadata from `information_schema.columns` and `pg_index`
//! - parameterized row lookups, inserts and updates
//! - transactions for atomic batches
//!
//! Storage errors are classified by SQLSTATE so that constraint violations
//! and invalid data are reported per row while connectivity failures abort
//! the operation.

pub mod catalog;
mod connection;
mod error;
pub mod sql;

pub use connection::{PostgreSQLConnection, PostgreSQLProvider};
pub use error::classify;
