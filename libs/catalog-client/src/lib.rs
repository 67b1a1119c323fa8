//! Data sources for the medicines catalog
//!
//! [`HttpCatalogSource`] fetches the published JSON documents over HTTP;
//! [`FileCatalogSource`] reads the same documents from a local directory.
//! Both implement [`medicat_catalog::CatalogSource`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use medicat_catalog::CatalogCache;
//! use medicat_client::HttpCatalogSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpCatalogSource::new("https://example.org/")?;
//! let cache = CatalogCache::new(Arc::new(source));
//! let medicines = cache.ensure_loaded().await;
//! # let _ = medicines;
//! # Ok(())
//! # }
//! ```

use medicat_catalog::{Record, SourceResult};

pub mod file;
pub mod http;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;

/// Dataset document path, relative to the source root.
pub const RECORDS_PATH: &str = "api/medicaments.json";
/// Statistics document path, relative to the source root.
pub const STATS_PATH: &str = "api/stats.json";

/// Decode the dataset document. A `null` document is an empty dataset.
pub(crate) fn decode_records(bytes: &[u8]) -> SourceResult<Vec<Record>> {
    let records: Option<Vec<Record>> = serde_json::from_slice(bytes)?;
    Ok(records.unwrap_or_default())
}
