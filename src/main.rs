use anyhow::{Context, Result};
use owidscraper::{run, Settings};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) settings ─────────────────────────────────────────────────
    let settings = Settings::from_env().context("configuration stage failed")?;

    // ─── 3) pipeline ─────────────────────────────────────────────────
    let summary = run(&settings, &Client::new()).await.map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("{stage} stage failed"))
    })?;

    info!(
        rows = summary.rows,
        path = %summary.output_path.display(),
        "all done"
    );
    Ok(())
}
