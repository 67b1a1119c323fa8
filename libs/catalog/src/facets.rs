//! Distinct facet values over the cached catalog
//!
//! These read the cache as it is and never trigger a load: call them after
//! [`CatalogCache::ensure_loaded`].

use crate::cache::CatalogCache;
use crate::model::Record;
use std::collections::BTreeSet;
use std::sync::Arc;

impl CatalogCache {
    /// Sorted, distinct pharmaceutical forms.
    pub fn formes_pharma(&self) -> Vec<String> {
        distinct_sorted(&self.snapshot(), |record| &record.forme_pharma)
    }

    /// Sorted, distinct holders.
    pub fn laboratoires(&self) -> Vec<String> {
        distinct_sorted(&self.snapshot(), |record| &record.titulaires)
    }

    /// Sorted, distinct active substances.
    pub fn substances(&self) -> Vec<String> {
        distinct_sorted(&self.snapshot(), |record| &record.substance)
    }
}

fn distinct_sorted<F>(records: &[Arc<Record>], field: F) -> Vec<String>
where
    F: Fn(&Record) -> &String,
{
    records
        .iter()
        .map(|record| field(record.as_ref()).as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
