// src/output.rs

use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::schema::output_column_names;

/// Render the cleaned table as CSV: one header row with the output columns in
/// fixed order, then one line per record. No index column.
pub fn to_csv_bytes(batch: &RecordBatch) -> PipelineResult<Vec<u8>> {
    let mut buf = Vec::new();

    // header is written explicitly so an empty table still gets one
    {
        let mut header = csv::Writer::from_writer(&mut buf);
        header
            .write_record(output_column_names())
            .map_err(|e| PipelineError::io("<csv header>", e.into()))?;
        header
            .flush()
            .map_err(|e| PipelineError::io("<csv header>", e))?;
    }

    {
        let mut writer = WriterBuilder::new().with_header(false).build(&mut buf);
        writer.write(batch)?;
    }

    Ok(buf)
}

/// Write the cleaned table to `path` atomically: the bytes go to a temporary
/// file next to the destination which is then renamed over it.
pub fn write_csv<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> PipelineResult<PathBuf> {
    let path = path.as_ref();
    let bytes = to_csv_bytes(batch)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| PipelineError::io(&dir, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PipelineError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;

    info!(path = %path.display(), rows = batch.num_rows(), bytes = bytes.len(), "wrote cleaned table");
    Ok(path.to_path_buf())
}
