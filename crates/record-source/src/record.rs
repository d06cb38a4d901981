//! Record source interface.

use std::sync::Arc;

/// Error raised when a source cannot decode its next record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed record at line {line}: {message}")]
pub struct MalformedRecordError {
    /// One-based line of the offending input
    pub line: u64,
    pub message: String,
}

impl MalformedRecordError {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// One record read from a source.
///
/// Values are positionally aligned with the source's field names; `None` is
/// a null value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    fields: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl RawRecord {
    /// Create a record. Missing trailing values are treated as null and
    /// surplus values are dropped.
    pub fn new(fields: Arc<[String]>, mut values: Vec<Option<String>>) -> Self {
        values.resize(fields.len(), None);
        Self { fields, values }
    }

    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Raw value of a field by name. Returns `None` for null values and for
    /// fields the source does not have.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .position(|f| f == name)
            .and_then(|pos| self.get_at(pos))
    }

    /// Raw value at a field position.
    pub fn get_at(&self, position: usize) -> Option<&str> {
        self.values.get(position).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered field schema plus a lazy sequence of records.
///
/// `next_record` returns `Ok(None)` at end of stream; decoding failures are
/// reported as [`MalformedRecordError`] and are distinct from end of stream.
pub trait RecordSource {
    /// Field names in source order.
    fn field_names(&self) -> &[String];

    /// Read the next record.
    fn next_record(&mut self) -> Result<Option<RawRecord>, MalformedRecordError>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn field_names(&self) -> &[String] {
        (**self).field_names()
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, MalformedRecordError> {
        (**self).next_record()
    }
}
