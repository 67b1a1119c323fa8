//! Load-once cache of the medicines dataset
//!
//! The cache moves between two record states: not loaded and loaded. A load
//! that succeeds with an empty dataset still counts as loaded and is not
//! fetched again; a load that fails leaves the cache not loaded, so the next
//! caller retries.
//!
//! At most one dataset fetch is in flight at a time. The first caller spawns
//! the fetch on the Tokio runtime and publishes it as a shared future; every
//! concurrent caller awaits that same future. The spawned task commits the
//! result into the cache even when all callers have stopped waiting.

use crate::error::{LoadError, SourceResult};
use crate::model::{Record, Stats};
use crate::source::CatalogSource;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Immutable snapshot of the loaded dataset, in load order.
pub type Catalog = Arc<[Arc<Record>]>;

type LoadOutcome = Result<Catalog, LoadError>;
type PendingLoad = Shared<BoxFuture<'static, LoadOutcome>>;

#[derive(Clone, Default)]
enum Records {
    #[default]
    NotLoaded,
    Loaded(Catalog),
}

#[derive(Default)]
struct CacheState {
    records: Records,
    stats: Option<Stats>,
    loading: bool,
    last_error: Option<LoadError>,
    pending: Option<PendingLoad>,
}

/// Shared handle to the catalog cache.
///
/// Cloning the handle shares the underlying state and data source.
#[derive(Clone)]
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    state: Arc<Mutex<CacheState>>,
}

impl CatalogCache {
    /// Create an empty cache backed by `source`.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        lock_state(&self.state)
    }

    /// Return the dataset, fetching it first if the cache is not loaded.
    ///
    /// Never fails: when the fetch fails an empty catalog is returned and
    /// the failure is available through [`CatalogCache::last_error`].
    /// Must be called from within a Tokio runtime.
    pub async fn ensure_loaded(&self) -> Catalog {
        let pending = {
            let mut state = self.lock();
            if let Records::Loaded(catalog) = &state.records {
                debug!(count = catalog.len(), "Medicines already cached");
                return Arc::clone(catalog);
            }
            match state.pending.clone() {
                Some(pending) => {
                    debug!("Joining in-flight medicines load");
                    pending
                }
                None => self.start_load(&mut state),
            }
        };

        pending.await.unwrap_or_else(|_| empty_catalog())
    }

    fn start_load(&self, state: &mut CacheState) -> PendingLoad {
        info!("Loading medicines from data source");
        state.loading = true;
        state.last_error = None;

        let source = Arc::clone(&self.source);
        let shared_state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let outcome = source.fetch_records().await;
            commit_load(&shared_state, outcome)
        });

        let shared_state = Arc::clone(&self.state);
        let pending = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    let err = LoadError::Records(format!("load task failed: {join_error}"));
                    error!(error = %err, "Medicines load task did not complete");
                    let mut state = lock_state(&shared_state);
                    state.loading = false;
                    state.pending = None;
                    state.last_error = Some(err.clone());
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        state.pending = Some(pending.clone());
        pending
    }

    /// Return the statistics document, fetching it if not cached.
    ///
    /// Failures are logged and reported as `None`; nothing is cached so the
    /// next call fetches again.
    pub async fn load_stats(&self) -> Option<Stats> {
        if let Some(stats) = self.lock().stats.clone() {
            return Some(stats);
        }

        match self.source.fetch_stats().await {
            Ok(stats) if stats.is_null() => {
                warn!("Statistics document is empty");
                None
            }
            Ok(stats) => {
                self.lock().stats = Some(stats.clone());
                Some(stats)
            }
            Err(err) => {
                let err = LoadError::Stats(err.to_string());
                warn!(error = %err, "Error while loading statistics");
                None
            }
        }
    }

    /// Drop the cached dataset and statistics.
    ///
    /// Leaves the loading flag and last error untouched. A fetch already in
    /// flight still commits its result when it completes.
    pub fn reset(&self) {
        info!("Clearing medicines cache");
        let mut state = self.lock();
        state.records = Records::NotLoaded;
        state.stats = None;
    }

    /// Current dataset without triggering a load; empty when not loaded.
    pub fn snapshot(&self) -> Catalog {
        match &self.lock().records {
            Records::Loaded(catalog) => Arc::clone(catalog),
            Records::NotLoaded => empty_catalog(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.lock().records, Records::Loaded(_))
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn last_error(&self) -> Option<LoadError> {
        self.lock().last_error.clone()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        match &self.lock().records {
            Records::Loaded(catalog) => catalog.len(),
            Records::NotLoaded => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        let records = match &state.records {
            Records::Loaded(catalog) => Some(catalog.len()),
            Records::NotLoaded => None,
        };
        f.debug_struct("CatalogCache")
            .field("records", &records)
            .field("has_stats", &state.stats.is_some())
            .field("loading", &state.loading)
            .field("last_error", &state.last_error)
            .finish()
    }
}

fn lock_state(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn commit_load(state: &Mutex<CacheState>, outcome: SourceResult<Vec<Record>>) -> LoadOutcome {
    let mut state = lock_state(state);
    state.loading = false;
    state.pending = None;

    match outcome {
        Ok(records) => {
            let catalog: Catalog = records.into_iter().map(Arc::new).collect();
            info!(
                count = catalog.len(),
                with_rcp = catalog.iter().filter(|r| r.has_rcp()).count(),
                "Medicines loaded"
            );
            state.records = Records::Loaded(Arc::clone(&catalog));
            Ok(catalog)
        }
        Err(err) => {
            let err = LoadError::Records(err.to_string());
            error!(error = %err, "Error while loading medicines");
            state.last_error = Some(err.clone());
            Err(err)
        }
    }
}

fn empty_catalog() -> Catalog {
    Vec::<Arc<Record>>::new().into()
}
