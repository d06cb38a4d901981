//! In-memory record source.

use crate::record::{MalformedRecordError, RawRecord, RecordSource};
use std::collections::VecDeque;
use std::sync::Arc;

/// A record source over rows held in memory.
///
/// Decoding failures can be queued between rows with [`with_error`], which
/// makes this source useful for exercising error paths.
///
/// [`with_error`]: VecRecordSource::with_error
#[derive(Debug, Clone)]
pub struct VecRecordSource {
    fields: Arc<[String]>,
    items: VecDeque<Result<Vec<Option<String>>, String>>,
    line: u64,
}

impl VecRecordSource {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            items: VecDeque::new(),
            line: 0,
        }
    }

    /// Append a row. Values are positional.
    pub fn with_row<S: Into<String>>(mut self, values: impl IntoIterator<Item = Option<S>>) -> Self {
        self.items
            .push_back(Ok(values.into_iter().map(|v| v.map(Into::into)).collect()));
        self
    }

    /// Append a row of non-null values.
    pub fn with_values<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.with_row(values.into_iter().map(Some))
    }

    /// Append a decoding failure.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.items.push_back(Err(message.into()));
        self
    }

    /// Number of rows and errors not yet read.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl RecordSource for VecRecordSource {
    fn field_names(&self) -> &[String] {
        &self.fields
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, MalformedRecordError> {
        let Some(item) = self.items.pop_front() else {
            return Ok(None);
        };
        self.line += 1;

        let values = item.map_err(|message| MalformedRecordError::new(self.line, message))?;
        if values.len() != self.fields.len() {
            return Err(MalformedRecordError::new(
                self.line,
                format!(
                    "Expected {} values, found {}",
                    self.fields.len(),
                    values.len()
                ),
            ));
        }
        Ok(Some(RawRecord::new(self.fields.clone(), values)))
    }
}
