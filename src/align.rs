//! Schema alignment: source fields to target columns.

use sync_core::{TableDefinition, UniversalType};
use text_types::{ConverterRegistry, FieldConverter};
use tracing::{info, warn};

/// A source field that has a column of the same name in the target table.
#[derive(Debug, Clone)]
pub struct AlignedField {
    /// Field name in the record source
    pub source_name: String,
    /// Position of the field in the record source's schema
    pub source_position: usize,
    /// Target column name
    pub column: String,
    pub converter: FieldConverter,
}

impl AlignedField {
    pub fn column_type(&self) -> UniversalType {
        self.converter.target_type()
    }
}

/// Map source field names onto the columns of `table`.
///
/// The result follows source field order. Fields without a matching column
/// are skipped with a diagnostic, as are repeated field names after their
/// first occurrence.
pub fn align(
    field_names: &[String],
    table: &TableDefinition,
    registry: &ConverterRegistry,
) -> Vec<AlignedField> {
    let mut aligned: Vec<AlignedField> = Vec::with_capacity(field_names.len());

    for (position, name) in field_names.iter().enumerate() {
        let Some(column) = table.get_column(name) else {
            info!(
                "Skipping field '{}': column not present in target table '{}'",
                name, table.name
            );
            continue;
        };
        if aligned.iter().any(|f| f.column == column.name) {
            warn!(
                "Skipping field '{}' at position {}: already mapped to column '{}'",
                name, position, column.name
            );
            continue;
        }

        aligned.push(AlignedField {
            source_name: name.clone(),
            source_position: position,
            column: column.name.clone(),
            converter: registry.converter_for(column.column_type),
        });
    }

    aligned
}
