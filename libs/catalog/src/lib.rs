//! Medicines catalog
//!
//! An in-memory, load-once copy of a medicines dataset with textual search,
//! multi-criteria filtering, autocomplete suggestions and facet enumeration.
//!
//! The dataset itself comes from a [`CatalogSource`], injected when the
//! [`CatalogCache`] is built. The cache fetches it at most once (concurrent
//! callers share one in-flight load) and serves every query from memory.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use medicat_catalog::{CatalogCache, SearchFilters, StaticSource};
//!
//! # async fn example() {
//! let cache = CatalogCache::new(Arc::new(StaticSource::new(Vec::new())));
//! let filters = SearchFilters::default().with_laboratoire("sanofi");
//! let results = cache.search("dolip", &filters).await;
//! let suggestions = cache.suggest("do").await;
//! let forms = cache.formes_pharma();
//! # let _ = (results, suggestions, forms);
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod facets;
pub mod model;
pub mod search;
pub mod source;
pub mod suggest;

pub use cache::{Catalog, CatalogCache};
pub use error::{LoadError, SourceError, SourceResult};
pub use model::{Record, RecordId, Stats, Suggestion, SuggestionKind};
pub use search::{parse_record_id, SearchFilters};
pub use source::{CatalogSource, StaticSource};
pub use suggest::{
    build_suggestions, MAX_HOLDER_SUGGESTIONS, MAX_RECORD_SUGGESTIONS, MAX_SUBSTANCE_SUGGESTIONS,
    MAX_SUGGESTIONS, MIN_QUERY_LEN,
};
