// src/loader/fetch.rs
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Fetches the raw content of one candidate location.
///
/// Locations are either http(s) URLs or filesystem paths; the distinction is
/// made per location so a single candidate list can mix both.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Production fetcher: GET over HTTP(S) with caching disabled, plain file
/// reads for everything else.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let resp = self
                .client
                .get(location)
                .header(reqwest::header::CACHE_CONTROL, "no-store")
                .send()
                .await
                .with_context(|| format!("GET {location}"))?;
            let status = resp.status();
            if !status.is_success() {
                anyhow::bail!("HTTP {status}");
            }
            resp.text().await.context("reading response body")
        } else {
            tokio::fs::read_to_string(location)
                .await
                .with_context(|| format!("reading {location}"))
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// In-memory fetcher for tests and offline runs; resolves locations from a
/// fixed map.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    entries: std::collections::HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, content: &str) -> Self {
        self.entries.insert(location.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl ResourceFetcher for FixtureFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no fixture for {location}"))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
