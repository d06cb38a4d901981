//! CSV record source.

use crate::record::{MalformedRecordError, RawRecord, RecordSource};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Configuration for reading CSV input
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Whether the first row holds the field names (default: true)
    pub has_headers: bool,

    /// Field delimiter (default: ',')
    pub delimiter: u8,

    /// Field names to use when `has_headers` is false.
    /// When absent, fields are named `column_0`, `column_1`, ...
    pub column_names: Option<Vec<String>>,

    /// Read empty cells as null (default: true)
    pub empty_as_null: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
            column_names: None,
            empty_as_null: true,
        }
    }
}

/// Reads records from CSV input.
pub struct CsvRecordSource<R: Read> {
    reader: csv::Reader<R>,
    fields: Arc<[String]>,
    // First data row, consumed early to count columns
    pending: Option<csv::StringRecord>,
    empty_as_null: bool,
}

impl<R: Read> CsvRecordSource<R> {
    /// Create a source, reading the header row if there is one.
    pub fn new(reader: R, config: &CsvConfig) -> Result<Self, MalformedRecordError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_headers)
            .delimiter(config.delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut pending = None;
        let fields: Vec<String> = if config.has_headers {
            reader
                .headers()
                .map_err(|e| malformed(e, 1))?
                .iter()
                .map(str::to_string)
                .collect()
        } else if let Some(column_names) = &config.column_names {
            column_names.clone()
        } else {
            let mut first = csv::StringRecord::new();
            if reader.read_record(&mut first).map_err(|e| malformed(e, 1))? {
                let column_count = first.len();
                pending = Some(first);
                (0..column_count).map(|i| format!("column_{i}")).collect()
            } else {
                Vec::new()
            }
        };

        debug!("CSV headers/columns: {fields:?}");

        Ok(Self {
            reader,
            fields: fields.into(),
            pending,
            empty_as_null: config.empty_as_null,
        })
    }

    fn read_next(&mut self) -> Result<Option<csv::StringRecord>, MalformedRecordError> {
        if let Some(record) = self.pending.take() {
            return Ok(Some(record));
        }
        let line = self.reader.position().line();
        let mut record = csv::StringRecord::new();
        if self
            .reader
            .read_record(&mut record)
            .map_err(|e| malformed(e, line))?
        {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}

impl<R: Read> RecordSource for CsvRecordSource<R> {
    fn field_names(&self) -> &[String] {
        &self.fields
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, MalformedRecordError> {
        let Some(record) = self.read_next()? else {
            return Ok(None);
        };

        if record.len() != self.fields.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(MalformedRecordError::new(
                line,
                format!(
                    "Column count mismatch: expected {} columns ({}), but found {} columns",
                    self.fields.len(),
                    self.fields.join(", "),
                    record.len()
                ),
            ));
        }

        let values = record
            .iter()
            .map(|value| {
                if value.is_empty() && self.empty_as_null {
                    None
                } else {
                    Some(value.to_string())
                }
            })
            .collect();
        Ok(Some(RawRecord::new(self.fields.clone(), values)))
    }
}

fn malformed(err: csv::Error, fallback_line: u64) -> MalformedRecordError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    MalformedRecordError::new(line, err.to_string())
}
