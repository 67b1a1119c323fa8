//! HTTP data source

use crate::{decode_records, RECORDS_PATH, STATS_PATH};
use async_trait::async_trait;
use medicat_catalog::{CatalogSource, Record, SourceError, SourceResult, Stats};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the dataset and statistics documents from a web server.
///
/// Dataset requests carry a `t=<unix millis>` query parameter so that
/// intermediary caches are bypassed.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
    records_path: String,
    stats_path: String,
}

impl HttpCatalogSource {
    /// Create a source rooted at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> SourceResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
            records_path: RECORDS_PATH.to_string(),
            stats_path: STATS_PATH.to_string(),
        })
    }

    /// Override the document paths, relative to the base URL.
    pub fn with_paths(mut self, records_path: &str, stats_path: &str) -> Self {
        self.records_path = records_path.trim_start_matches('/').to_string();
        self.stats_path = stats_path.trim_start_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self) -> String {
        format!(
            "{}{}?t={}",
            self.base_url,
            self.records_path,
            chrono::Utc::now().timestamp_millis()
        )
    }

    fn stats_url(&self) -> String {
        format!("{}{}", self.base_url, self.stats_path)
    }

    async fn get_bytes(&self, url: &str) -> SourceResult<Vec<u8>> {
        debug!(url, "Fetching catalog document");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_records(&self) -> SourceResult<Vec<Record>> {
        let bytes = self.get_bytes(&self.records_url()).await?;
        decode_records(&bytes)
    }

    async fn fetch_stats(&self) -> SourceResult<Stats> {
        let bytes = self.get_bytes(&self.stats_url()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}
