//! Raw string record sources.
//!
//! A record source exposes an ordered field-name schema and a lazy sequence
//! of records whose values are optional strings. Typing the values is left to
//! the consumer, which knows the target column types.
//!
//! Implementations:
//!
//! - [`CsvRecordSource`] - CSV with a header row or explicit column names
//! - [`JsonlRecordSource`] - JSON Lines, schema from the first object
//! - [`VecRecordSource`] - rows held in memory

pub mod csv;
pub mod jsonl;
pub mod memory;
pub mod record;

pub use crate::csv::{CsvConfig, CsvRecordSource};
pub use jsonl::JsonlRecordSource;
pub use memory::VecRecordSource;
pub use record::{MalformedRecordError, RawRecord, RecordSource};
