//! Data source seam for the catalog cache

use crate::error::{SourceError, SourceResult};
use crate::model::{Record, Stats};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Asynchronous provider of the dataset and its statistics document.
///
/// The cache only ever calls `fetch_records` once per successful load, so
/// implementations do not need to cache anything themselves.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_records(&self) -> SourceResult<Vec<Record>>;

    async fn fetch_stats(&self) -> SourceResult<Stats>;
}

/// Source serving a fixed, in-memory dataset.
#[derive(Debug, Default)]
pub struct StaticSource {
    records: Vec<Record>,
    stats: Option<Stats>,
    record_fetches: AtomicUsize,
    stats_fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Number of times the dataset has been requested.
    pub fn record_fetches(&self) -> usize {
        self.record_fetches.load(Ordering::SeqCst)
    }

    /// Number of times the statistics document has been requested.
    pub fn stats_fetches(&self) -> usize {
        self.stats_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch_records(&self) -> SourceResult<Vec<Record>> {
        self.record_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }

    async fn fetch_stats(&self) -> SourceResult<Stats> {
        self.stats_fetches.fetch_add(1, Ordering::SeqCst);
        self.stats
            .clone()
            .ok_or_else(|| SourceError::Other("no statistics document".into()))
    }
}
