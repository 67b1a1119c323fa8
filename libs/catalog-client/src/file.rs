//! Filesystem data source

use crate::{decode_records, RECORDS_PATH, STATS_PATH};
use async_trait::async_trait;
use medicat_catalog::{CatalogSource, Record, SourceResult, Stats};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the dataset and statistics documents from a directory laid out
/// like the web root (`api/medicaments.json`, `api/stats.json`).
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    records_file: PathBuf,
    stats_file: PathBuf,
}

impl FileCatalogSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            records_file: root.join(RECORDS_PATH),
            stats_file: root.join(STATS_PATH),
        }
    }

    /// Use explicit document files instead of the web-root layout.
    pub fn with_files(records_file: impl Into<PathBuf>, stats_file: impl Into<PathBuf>) -> Self {
        Self {
            records_file: records_file.into(),
            stats_file: stats_file.into(),
        }
    }

    pub fn records_file(&self) -> &Path {
        &self.records_file
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_records(&self) -> SourceResult<Vec<Record>> {
        debug!(path = %self.records_file.display(), "Reading catalog document");
        let bytes = tokio::fs::read(&self.records_file).await?;
        decode_records(&bytes)
    }

    async fn fetch_stats(&self) -> SourceResult<Stats> {
        debug!(path = %self.stats_file.display(), "Reading statistics document");
        let bytes = tokio::fs::read(&self.stats_file).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
