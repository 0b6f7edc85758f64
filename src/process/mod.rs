// src/process/mod.rs
pub mod date_parser;
pub mod latest;

use arrow::{
    array::{Array, ArrayRef, Date32Array, StringArray},
    compute::{concat_batches, filter_record_batch, is_not_null},
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use regex::Regex;
use std::{fs::File, path::Path, sync::Arc};
use tracing::{debug, info};

use crate::countries::{filter_countries, AllowList};
use crate::error::{PipelineError, PipelineResult};
use crate::schema::{
    build_read_schema, output_column_names, resolve_projection, DATE, TOTAL_TESTS,
};

pub use latest::latest_per_identifier;

const BATCH_SIZE: usize = 8_192;

/// Field values read as missing, in any column.
const NULL_TOKENS: &str =
    r"^(|NaN|nan|-NaN|-nan|NA|N/A|n/a|<NA>|#N/A|NULL|null|None)$";

/// Turn a raw OWID CSV into the cleaned table:
///
/// 1. read the file, headers from the first row, dates parsed to calendar days
/// 2. keep only the required columns (fails if any is absent)
/// 3. keep only allow-listed countries
/// 4. drop rows without `total_tests`
/// 5. keep the latest row per `iso_code`
/// 6. re-project onto the output columns
#[tracing::instrument(level = "info", skip(path, allow), fields(path = %path.as_ref().display()))]
pub fn preprocess<P: AsRef<Path>>(path: P, allow: &AllowList) -> PipelineResult<RecordBatch> {
    let path = path.as_ref();

    let table = load_required_columns(path)?;
    info!(rows = table.num_rows(), "loaded source table");

    let table = filter_countries(&table, allow)?;
    let table = drop_missing_tests(&table)?;
    debug!(rows = table.num_rows(), "rows with test data");

    let table = latest_per_identifier(&table)?;
    let table = select_output_columns(&table)?;
    info!(rows = table.num_rows(), "cleaned table ready");
    Ok(table)
}

/// Steps 1 and 2: read only the required columns, in output order, with the
/// `date` column converted to Date32.
pub fn load_required_columns(path: &Path) -> PipelineResult<RecordBatch> {
    let headers = read_headers(path)?;
    let projection = resolve_projection(&headers)?;
    let read_schema = build_read_schema(&headers);

    let null_regex = Regex::new(NULL_TOKENS).map_err(|e| PipelineError::decode(path, e))?;

    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let reader = ReaderBuilder::new(read_schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .with_null_regex(null_regex)
        .with_projection(projection.clone())
        .build(file)
        .map_err(|e| PipelineError::decode(path, e))?;

    let projected = Arc::new(read_schema.project(&projection)?);
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.map_err(|e| PipelineError::decode(path, e))?);
    }
    let raw = concat_batches(&projected, &batches)?;

    parse_date_column(&raw).map_err(|reason| PipelineError::decode(path, reason))
}

/// Header row of `path`. A file with no header row yields no names, which the
/// projection step reports as every column missing.
fn read_headers(path: &Path) -> PipelineResult<Vec<String>> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::decode(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    Ok(headers)
}

/// Replace the textual `date` column with a Date32 column. Missing dates stay
/// null; a present value that does not parse is an error.
fn parse_date_column(batch: &RecordBatch) -> Result<RecordBatch, String> {
    let schema = batch.schema();
    let idx = schema
        .index_of(DATE)
        .map_err(|_| format!("no `{DATE}` column"))?;
    let text = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| format!("`{DATE}` column is not text"))?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(text.len());
    for (row, value) in text.iter().enumerate() {
        let raw = match value.map(str::trim) {
            None | Some("") => {
                days.push(None);
                continue;
            }
            Some(raw) => raw,
        };
        let date = date_parser::parse_calendar_date(raw)
            .ok_or_else(|| format!("row {}: invalid date {raw:?}", row + 1))?;
        days.push(Some(date_parser::to_date32(date)));
    }

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns[idx] = Arc::new(Date32Array::from(days));

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if i == idx {
                Field::new(DATE, DataType::Date32, true)
            } else {
                (**f).clone()
            }
        })
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(|e| e.to_string())
}

/// Step 4: a row survives only when its `total_tests` value is present.
pub fn drop_missing_tests(batch: &RecordBatch) -> PipelineResult<RecordBatch> {
    let tests = batch
        .column_by_name(TOTAL_TESTS)
        .ok_or_else(|| PipelineError::Schema {
            missing: vec![TOTAL_TESTS.to_string()],
        })?;
    let mask = is_not_null(tests.as_ref())?;
    Ok(filter_record_batch(batch, &mask)?)
}

/// Step 6: project by name onto the output columns, in output order.
pub fn select_output_columns(batch: &RecordBatch) -> PipelineResult<RecordBatch> {
    let schema = batch.schema();
    let mut indices = Vec::new();
    let mut missing = Vec::new();
    for name in output_column_names() {
        match schema.index_of(name) {
            Ok(i) => indices.push(i),
            Err(_) => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }
    Ok(batch.project(&indices)?)
}
