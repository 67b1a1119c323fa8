
use async_trait::async_trait;
use medicat_catalog::{CatalogSource, Record, SourceError, SourceResult, Stats};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub fn record(id: i64, denomination: &str, substance: &str, titulaires: &str, forme: &str) -> Record {
    serde_json::from_value(json!({
        "id": id,
        "denomination": denomination,
        "substance": substance,
        "titulaires": titulaires,
        "formePharma": forme,
        "etatCommercial": "Commercialisé"
    }))
    .expect("valid record")
}

/// Source whose dataset fetch blocks until `release` is called.
/// The first `failures` fetches fail.
pub struct GatedSource {
    records: Vec<Record>,
    failures: usize,
    fetches: AtomicUsize,
    gate: Notify,
}

impl GatedSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            failures: 0,
            fetches: AtomicUsize::new(0),
            gate: Notify::new(),
        }
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for GatedSource {
    async fn fetch_records(&self) -> SourceResult<Vec<Record>> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        if attempt < self.failures {
            return Err(SourceError::Other("connection reset".into()));
        }
        Ok(self.records.clone())
    }

    async fn fetch_stats(&self) -> SourceResult<Stats> {
        Ok(json!({ "total": self.records.len() }))
    }
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
