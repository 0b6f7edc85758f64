pub mod arrow;
pub mod types;

pub use self::arrow::{build_read_schema, map_to_arrow_type, output_schema};
pub use types::{output_column_names, Column, ColumnKind, DATE, ISO_CODE, OUTPUT_COLUMNS, TOTAL_TESTS};

use crate::error::{PipelineError, PipelineResult};

/// Locate every required column in `headers`, returning source indices in
/// output order. Fails with a schema error naming all absent columns.
pub fn resolve_projection(headers: &[String]) -> PipelineResult<Vec<usize>> {
    let mut indices = Vec::with_capacity(OUTPUT_COLUMNS.len());
    let mut missing = Vec::new();

    for col in OUTPUT_COLUMNS.iter() {
        match headers.iter().position(|h| h == col.name) {
            Some(idx) => indices.push(idx),
            None => missing.push(col.name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(PipelineError::Schema { missing })
    }
}
