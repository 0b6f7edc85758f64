use arrow::{
    array::{Array, Date32Array, StringArray, UInt32Array},
    compute::take_record_batch,
    record_batch::RecordBatch,
};
use std::collections::HashMap;

use crate::error::{PipelineError, PipelineResult};
use crate::schema::{DATE, ISO_CODE};

/// Group rows by `iso_code` and keep, for each, the row with the greatest
/// date. When several rows share that date the last one in input order wins.
///
/// Survivors come back ordered by date, then by input position. Rows with a
/// null identifier or date are ignored.
pub fn latest_per_identifier(batch: &RecordBatch) -> PipelineResult<RecordBatch> {
    let codes = typed_column::<StringArray>(batch, ISO_CODE)?;
    let dates = typed_column::<Date32Array>(batch, DATE)?;

    let mut best: HashMap<&str, (i32, usize)> = HashMap::new();
    for row in 0..batch.num_rows() {
        if codes.is_null(row) || dates.is_null(row) {
            continue;
        }
        let (code, date) = (codes.value(row), dates.value(row));
        best.entry(code)
            .and_modify(|cur| {
                if date >= cur.0 {
                    *cur = (date, row);
                }
            })
            .or_insert((date, row));
    }

    let mut keep: Vec<(i32, usize)> = best.into_values().collect();
    keep.sort_unstable();

    let indices = UInt32Array::from_iter_values(keep.into_iter().map(|(_, row)| row as u32));
    Ok(take_record_batch(batch, &indices)?)
}

fn typed_column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
) -> PipelineResult<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| PipelineError::Schema {
            missing: vec![name.to_string()],
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Float64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn batch(rows: &[(&str, i32, f64)]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("iso_code", DataType::Utf8, true),
            Field::new("date", DataType::Date32, true),
            Field::new("total_tests", DataType::Float64, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.0))),
                Arc::new(Date32Array::from_iter_values(rows.iter().map(|r| r.1))),
                Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.2))),
            ],
        )
        .unwrap()
    }

    fn tests_column(batch: &RecordBatch) -> Vec<f64> {
        batch
            .column_by_name("total_tests")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn keeps_latest_row_per_identifier_in_date_order() -> anyhow::Result<()> {
        let b = batch(&[
            ("USA", 10, 1.0),
            ("FRA", 12, 2.0),
            ("USA", 14, 3.0),
            ("FRA", 11, 4.0),
            ("DEU", 9, 5.0),
        ]);
        let out = latest_per_identifier(&b)?;
        assert_eq!(tests_column(&out), vec![5.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn ties_go_to_the_last_occurrence() -> anyhow::Result<()> {
        let b = batch(&[("USA", 10, 1.0), ("USA", 10, 2.0), ("USA", 9, 3.0)]);
        let out = latest_per_identifier(&b)?;
        assert_eq!(tests_column(&out), vec![2.0]);
        Ok(())
    }

    #[test]
    fn empty_input_keeps_schema() -> anyhow::Result<()> {
        let b = batch(&[]);
        let out = latest_per_identifier(&b)?;
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.schema(), b.schema());
        Ok(())
    }
}
