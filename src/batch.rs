//! Batch materialization.

use crate::align::AlignedField;
use crate::error::UpsertError;
use record_source::RecordSource;
use sync_core::UniversalValue;
use tracing::debug;

/// Normalized rows plus the aligned fields labelling their positions.
///
/// Every row has exactly one value per aligned field.
#[derive(Debug, Clone)]
pub struct Batch {
    fields: Vec<AlignedField>,
    rows: Vec<Vec<UniversalValue>>,
}

impl Batch {
    pub fn fields(&self) -> &[AlignedField] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<UniversalValue>] {
        &self.rows
    }

    /// Target column names in field order.
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }

    /// Position of a target column within each row.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.column == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drain `source` into a [`Batch`] using the aligned `fields`.
///
/// Stops at the first malformed record or conversion failure; no partial
/// batch is returned.
pub fn materialize<S: RecordSource + ?Sized>(
    source: &mut S,
    fields: Vec<AlignedField>,
) -> Result<Batch, UpsertError> {
    let mut rows = Vec::new();

    while let Some(record) = source.next_record()? {
        let record_index = rows.len();
        let row = fields
            .iter()
            .map(|field| {
                field
                    .converter
                    .convert(record.get_at(field.source_position))
                    .map_err(|source| UpsertError::Conversion {
                        field: field.source_name.clone(),
                        record_index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    debug!(
        "Materialized {} records into {} columns",
        rows.len(),
        fields.len()
    );
    Ok(Batch { fields, rows })
}
