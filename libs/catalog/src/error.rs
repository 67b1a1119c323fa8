//! Error types for the medicines catalog

use thiserror::Error;

/// Result type alias for data source calls
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Failures reported by a [`CatalogSource`](crate::CatalogSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request error: {0}")]
    Http(String),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source error: {0}")]
    Other(String),
}

/// Descriptor of a failed fetch, kept by the cache for callers to inspect.
///
/// Both variants are absorbed inside the cache: callers only ever see an
/// empty or absent result. Only [`LoadError::Records`] is ever stored as the
/// cache's last error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Failed to load medicines: {0}")]
    Records(String),

    #[error("Failed to load statistics: {0}")]
    Stats(String),
}
