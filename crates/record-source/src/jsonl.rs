//! JSON Lines record source.
//!
//! Each non-blank line holds one JSON object. The field schema is taken from
//! the keys of the first object, in document order. Later objects may omit
//! fields (read as null); keys outside the schema are ignored.

use crate::record::{MalformedRecordError, RawRecord, RecordSource};
use serde_json::{Map, Value};
use std::io::BufRead;
use std::sync::Arc;
use tracing::debug;

/// Reads records from JSON Lines input.
pub struct JsonlRecordSource<R: BufRead> {
    lines: std::io::Lines<R>,
    fields: Arc<[String]>,
    line: u64,
    pending: Option<Map<String, Value>>,
}

impl<R: BufRead> JsonlRecordSource<R> {
    /// Create a source, reading ahead to the first object for the schema.
    pub fn new(reader: R) -> Result<Self, MalformedRecordError> {
        let mut source = Self {
            lines: reader.lines(),
            fields: Arc::from(Vec::<String>::new()),
            line: 0,
            pending: None,
        };

        if let Some(first) = source.read_object()? {
            source.fields = first.keys().cloned().collect();
            source.pending = Some(first);
        }
        debug!("JSONL fields: {:?}", source.fields);

        Ok(source)
    }

    fn read_object(&mut self) -> Result<Option<Map<String, Value>>, MalformedRecordError> {
        for line in self.lines.by_ref() {
            self.line += 1;
            let line = line.map_err(|e| MalformedRecordError::new(self.line, e.to_string()))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(object)) => Ok(Some(object)),
                Ok(other) => Err(MalformedRecordError::new(
                    self.line,
                    format!("Expected a JSON object, found {}", json_kind(&other)),
                )),
                Err(e) => Err(MalformedRecordError::new(self.line, e.to_string())),
            };
        }
        Ok(None)
    }
}

impl<R: BufRead> RecordSource for JsonlRecordSource<R> {
    fn field_names(&self) -> &[String] {
        &self.fields
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, MalformedRecordError> {
        let object = match self.pending.take() {
            Some(object) => object,
            None => match self.read_object()? {
                Some(object) => object,
                None => return Ok(None),
            },
        };

        let values = self
            .fields
            .iter()
            .map(|field| object.get(field).and_then(render_value))
            .collect();
        Ok(Some(RawRecord::new(self.fields.clone(), values)))
    }
}

/// Render a JSON value as the raw string a CSV cell would hold.
/// Nested values are kept as JSON text.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
