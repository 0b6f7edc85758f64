// src/run.rs

use reqwest::Client;
use std::path::PathBuf;
use tokio::time::Instant;
use tracing::info;

use crate::config::Settings;
use crate::countries::AllowList;
use crate::error::PipelineResult;
use crate::{fetch, output, process};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub rows: usize,
}

/// One full run, stages in order: allow-list, source, transform, write.
/// Any failure stops the run before the output file is touched.
#[tracing::instrument(level = "info", skip_all)]
pub async fn run(settings: &Settings, client: &Client) -> PipelineResult<RunSummary> {
    // ─── 1) allow-list ───────────────────────────────────────────────
    let allow = AllowList::load(&settings.countries_path)?;
    info!(
        countries = allow.len(),
        path = %settings.countries_path.display(),
        "loaded allow-list"
    );

    // ─── 2) source table ─────────────────────────────────────────────
    let start = Instant::now();
    let source_path = match &settings.input_path {
        Some(path) => {
            info!(path = %path.display(), "using local source, skipping download");
            path.clone()
        }
        None => fetch::download_dataset(client, &settings.source_url, &settings.data_dir).await?,
    };
    info!(path = %source_path.display(), elapsed = ?start.elapsed(), "source ready");

    // ─── 3) transform ────────────────────────────────────────────────
    let cleaned = {
        let path = source_path.clone();
        tokio::task::spawn_blocking(move || process::preprocess(&path, &allow)).await??
    };

    // ─── 4) persist ──────────────────────────────────────────────────
    let output_path = output::write_csv(&cleaned, &settings.output_path)?;

    Ok(RunSummary {
        source_path,
        output_path,
        rows: cleaned.num_rows(),
    })
}
