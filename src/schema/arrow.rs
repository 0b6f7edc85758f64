// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use std::sync::Arc;

use super::types::{ColumnKind, OUTPUT_COLUMNS};

/// Map a column kind onto the Arrow type it is held in once cleaned.
///
/// - Text    → Utf8
/// - Date    → Date32 (calendar days, no timezone)
/// - Numeric → Float64
pub fn map_to_arrow_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Text => DataType::Utf8,
        ColumnKind::Date => DataType::Date32,
        ColumnKind::Numeric => DataType::Float64,
    }
}

/// Type the CSV reader should decode a column as. Dates are read as text and
/// parsed afterwards so that several calendar formats are accepted.
pub fn map_to_read_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Date => DataType::Utf8,
        other => map_to_arrow_type(other),
    }
}

/// The schema of the cleaned table, in the fixed output order.
pub fn output_schema() -> SchemaRef {
    let fields: Vec<ArrowField> = OUTPUT_COLUMNS
        .iter()
        .map(|col| ArrowField::new(col.name, map_to_arrow_type(col.kind), true))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// Build the full reader schema for a source header row: required columns get
/// their read type, every other column stays Utf8 and is projected away.
pub fn build_read_schema(headers: &[String]) -> SchemaRef {
    let fields: Vec<ArrowField> = headers
        .iter()
        .map(|name| {
            let ty = OUTPUT_COLUMNS
                .iter()
                .find(|col| col.name == name)
                .map(|col| map_to_read_type(col.kind))
                .unwrap_or(DataType::Utf8);
            ArrowField::new(name, ty, true)
        })
        .collect();
    Arc::new(ArrowSchema::new(fields))
}
