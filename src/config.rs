// src/config.rs

use std::path::PathBuf;
use url::Url;

use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_SOURCE_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_COUNTRIES_PATH: &str = "countries.yaml";
pub const DEFAULT_OUTPUT_PATH: &str = "data/data_processed.csv";

const ENV_SOURCE_URL: &str = "OWID_SOURCE_URL";
const ENV_DATA_DIR: &str = "OWID_DATA_DIR";
const ENV_COUNTRIES: &str = "OWID_COUNTRIES";
const ENV_OUTPUT: &str = "OWID_OUTPUT";
const ENV_INPUT: &str = "OWID_INPUT";

/// Everything a run needs to know, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Remote CSV to download.
    pub source_url: Url,
    /// Directory the raw download lands in.
    pub data_dir: PathBuf,
    /// YAML allow-list with an `iso_code` sequence.
    pub countries_path: PathBuf,
    /// Where the cleaned table is written.
    pub output_path: PathBuf,
    /// Already-downloaded source CSV; when set the download is skipped.
    pub input_path: Option<PathBuf>,
}

impl Settings {
    /// Defaults, overridden by any `OWID_*` variable present in the environment.
    pub fn from_env() -> PipelineResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let raw_url = get(ENV_SOURCE_URL, DEFAULT_SOURCE_URL);
        let source_url = Url::parse(raw_url.trim()).map_err(|e| {
            PipelineError::invalid_setting(ENV_SOURCE_URL, format!("invalid URL {raw_url:?}: {e}"))
        })?;
        if !matches!(source_url.scheme(), "http" | "https") {
            return Err(PipelineError::invalid_setting(
                ENV_SOURCE_URL,
                format!("unsupported scheme {:?}", source_url.scheme()),
            ));
        }

        Ok(Self {
            source_url,
            data_dir: PathBuf::from(get(ENV_DATA_DIR, DEFAULT_DATA_DIR)),
            countries_path: PathBuf::from(get(ENV_COUNTRIES, DEFAULT_COUNTRIES_PATH)),
            output_path: PathBuf::from(get(ENV_OUTPUT, DEFAULT_OUTPUT_PATH)),
            input_path: lookup(ENV_INPUT)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
