//! Target table store abstraction.
//!
//! This crate defines the `ConnectionProvider` and `TableConnection` traits
//! through which the upsert engine reads table metadata, looks up existing
//! rows and writes inserts and updates. `postgresql-sink` implements them for
//! PostgreSQL; [`MemoryStore`] implements them in memory.
//!
//! The traits use sync-core types (`TableDefinition`, `UniversalValue`) so the
//! engine never touches database-specific types.

mod error;
mod memory;
mod semantics;
mod traits;

pub use error::StorageError;
pub use memory::{MemoryConnection, MemoryStore};
pub use semantics::BatchSemantics;
pub use traits::{ColumnValue, ConnectionProvider, TableConnection};
