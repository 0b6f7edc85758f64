// src/fetch/mod.rs

use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

use crate::error::{PipelineError, PipelineResult};

const FALLBACK_FILE_NAME: &str = "download.csv";

/// Last non-empty path segment of `url`, or a fixed fallback.
pub fn target_file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
}

/// Download `url` into `dest_dir` under its original filename and return the
/// saved path. A transport failure or non-success status is a network error;
/// nothing is retried.
pub async fn download_dataset(
    client: &Client,
    url: &Url,
    dest_dir: impl AsRef<Path>,
) -> PipelineResult<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let dest_path = dest_dir.join(target_file_name(url));

    fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| PipelineError::io(dest_dir, e))?;

    let network = |source: reqwest::Error| PipelineError::Network {
        url: url.to_string(),
        source,
    };
    let resp = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(network)?;
    let bytes = resp.bytes().await.map_err(network)?;

    fs::write(&dest_path, &bytes)
        .await
        .map_err(|e| PipelineError::io(&dest_path, e))?;

    info!(url = %url, path = %dest_path.display(), bytes = bytes.len(), "downloaded dataset");
    Ok(dest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(status: &'static str, body: &'static str) -> anyhow::Result<Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = sock.read(&mut buf).await;
                let reply = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        Ok(Url::parse(&format!("http://{addr}/public/owid-covid-data.csv"))?)
    }

    #[test]
    fn file_name_comes_from_last_segment() -> anyhow::Result<()> {
        let url = Url::parse("https://covid.ourworldindata.org/data/owid-covid-data.csv")?;
        assert_eq!(target_file_name(&url), "owid-covid-data.csv");

        let bare = Url::parse("https://example.com/")?;
        assert_eq!(target_file_name(&bare), "download.csv");
        Ok(())
    }

    #[tokio::test]
    async fn saves_body_under_original_name() -> anyhow::Result<()> {
        let url = serve_once("200 OK", "iso_code,date\nUSA,2021-01-01\n").await?;
        let dir = tempfile::tempdir()?;
        let dest = dir.path().join("data");

        let saved = download_dataset(&Client::new(), &url, &dest).await?;

        assert_eq!(saved, dest.join("owid-covid-data.csv"));
        assert_eq!(
            std::fs::read_to_string(&saved)?,
            "iso_code,date\nUSA,2021-01-01\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn http_error_status_is_a_network_error() -> anyhow::Result<()> {
        let url = serve_once("404 Not Found", "").await?;
        let dir = tempfile::tempdir()?;

        let err = download_dataset(&Client::new(), &url, dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Network { .. }));
        assert!(!dir.path().join("owid-covid-data.csv").exists());
        Ok(())
    }
}
