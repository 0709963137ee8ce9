//! Result payload retrieval
//!
//! A [`ResultFetcher`] turns a URL into parsed JSON; [`load_result_info`]
//! maps that JSON into a [`ResultInfo`] for a [`VersionItem`]. Retrieval
//! is attempted once: there is no retry and no timeout at this layer.

use async_trait::async_trait;
use std::time::Instant;

use super::{map_to_result_info, ResultInfo, VersionItem};
use crate::error::{Error, Result};

/// Retrieves a raw result payload and parses it as JSON
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
}

/// Fetches payloads over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResultFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::fetch(url, e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Reads payloads from the local filesystem; accepts plain paths and `file://` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl ResultFetcher for FileFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        let body = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Dispatches on the URL scheme: `http(s)://` goes to [`HttpFetcher`],
/// everything else to [`FileFetcher`]
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` for `http(s)://` URLs
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: HttpFetcher::with_client(client),
            file: FileFetcher,
        }
    }
}

#[async_trait]
impl ResultFetcher for DefaultFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.http.fetch_json(url).await
        } else {
            self.file.fetch_json(url).await
        }
    }
}

/// Fetch and normalize the results published for `version`
pub async fn load_result_info<F>(fetcher: &F, version: &VersionItem) -> Result<ResultInfo>
where
    F: ResultFetcher + ?Sized,
{
    tracing::debug!(version = %version.tag_name, url = %version.fetch_url, "fetching results");
    let start = Instant::now();

    let raw = fetcher.fetch_json(&version.fetch_url).await?;
    let info = map_to_result_info(&version.tag_name, raw)?;

    tracing::info!(
        version = %info.version,
        suites = info.results.suite_count(),
        tests = info.results.test_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded conformance results"
    );
    Ok(info)
}
