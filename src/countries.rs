// src/countries.rs

use arrow::{
    array::{Array, BooleanArray, StringArray},
    compute::filter_record_batch,
    record_batch::RecordBatch,
};
use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::schema::ISO_CODE;

/// Layout of the countries YAML document.
#[derive(Debug, Deserialize)]
struct CountriesFile {
    iso_code: Vec<String>,
}

/// Identifiers a run keeps. Read once, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    codes: Vec<String>,
    members: HashSet<String>,
}

impl AllowList {
    /// Load the allow-list from a YAML file holding an `iso_code` sequence.
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::configuration(path, format!("cannot read: {e}")))?;
        Self::from_yaml_str(&text).map_err(|reason| PipelineError::configuration(path, reason))
    }

    /// Parse an allow-list document held in memory.
    pub fn from_yaml_str(text: &str) -> Result<Self, String> {
        let doc: CountriesFile = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        Ok(Self::from_codes(doc.iso_code))
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(|c| c.into().trim().to_string()).collect();
        let members = codes.iter().cloned().collect();
        Self { codes, members }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.members.contains(code)
    }

    /// Codes in the order the document lists them.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Keep the rows whose `iso_code` is allow-listed, in their original order.
pub fn filter_countries(batch: &RecordBatch, allow: &AllowList) -> PipelineResult<RecordBatch> {
    let idx = batch
        .schema()
        .index_of(ISO_CODE)
        .map_err(|_| PipelineError::Schema {
            missing: vec![ISO_CODE.to_string()],
        })?;
    let codes = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| PipelineError::Schema {
            missing: vec![ISO_CODE.to_string()],
        })?;

    let mask: BooleanArray = codes
        .iter()
        .map(|code| Some(code.is_some_and(|c| allow.contains(c))))
        .collect();

    let filtered = filter_record_batch(batch, &mask)?;
    debug!(
        before = batch.num_rows(),
        after = filtered.num_rows(),
        allowed = allow.len(),
        "filtered countries"
    );
    Ok(filtered)
}
