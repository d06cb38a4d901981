//! Upsert engine tests against the in-memory store.
//!
//! Each test seeds a `MemoryStore`, runs an upsert from an in-memory record
//! source, and checks both the returned `SaveStats` and the final table
//! contents.

mod scenarios;
