//! Free-text search and structured filtering
//!
//! A record matches when the query (if any) is found in one of its text
//! fields and every filter that is set accepts it. Results keep cache
//! order; there is no ranking.

use crate::cache::CatalogCache;
use crate::model::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Structured search criteria. Unset or empty criteria are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Case-insensitive substring of the holder.
    pub laboratoire: Option<String>,
    /// Exact pharmaceutical form.
    pub forme_pharma: Option<String>,
    /// Case-insensitive substring of the active substance.
    pub substance: Option<String>,
    /// Exact commercial status.
    pub etat_commercial: Option<String>,
}

impl SearchFilters {
    pub fn with_laboratoire(mut self, laboratoire: impl Into<String>) -> Self {
        self.laboratoire = Some(laboratoire.into());
        self
    }

    pub fn with_forme_pharma(mut self, forme_pharma: impl Into<String>) -> Self {
        self.forme_pharma = Some(forme_pharma.into());
        self
    }

    pub fn with_substance(mut self, substance: impl Into<String>) -> Self {
        self.substance = Some(substance.into());
        self
    }

    pub fn with_etat_commercial(mut self, etat_commercial: impl Into<String>) -> Self {
        self.etat_commercial = Some(etat_commercial.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.laboratoire,
            &self.forme_pharma,
            &self.substance,
            &self.etat_commercial,
        ]
        .into_iter()
        .all(|criterion| present(criterion).is_none())
    }

    /// Whether `record` satisfies every criterion that is set.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(laboratoire) = present(&self.laboratoire) {
            if !contains_ignore_case(&record.titulaires, &laboratoire.to_lowercase()) {
                return false;
            }
        }
        if let Some(forme_pharma) = present(&self.forme_pharma) {
            if record.forme_pharma != forme_pharma {
                return false;
            }
        }
        if let Some(substance) = present(&self.substance) {
            if !contains_ignore_case(&record.substance, &substance.to_lowercase()) {
                return false;
            }
        }
        if let Some(etat_commercial) = present(&self.etat_commercial) {
            if record.etat_commercial != etat_commercial {
                return false;
            }
        }
        true
    }
}

fn present(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|value| !value.is_empty())
}

/// `needle` must already be lowercase.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Lowercased, trimmed search term; `None` for a blank query.
pub fn normalize_query(query: &str) -> Option<String> {
    let term = query.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

/// Whether the normalized `term` occurs in any searchable text field.
pub fn matches_term(record: &Record, term: &str) -> bool {
    [
        &record.denomination,
        &record.substance,
        &record.titulaires,
        &record.forme_pharma,
    ]
    .into_iter()
    .any(|field| contains_ignore_case(field, term))
}

/// Apply a query and filters to `records`, keeping their order.
pub fn filter_records(
    records: &[Arc<Record>],
    query: &str,
    filters: &SearchFilters,
) -> Vec<Arc<Record>> {
    let term = normalize_query(query);
    records
        .iter()
        .filter(|record| term.as_deref().map_or(true, |t| matches_term(record, t)))
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

/// Parse an identifier the way a URL segment is read: optional leading
/// whitespace and sign, then the leading run of digits. Trailing garbage
/// is ignored; no digits at all yields `None`.
pub fn parse_record_id(input: &str) -> Option<RecordId> {
    let trimmed = input.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - sign_len);
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

impl CatalogCache {
    /// Search the catalog, loading it first if needed.
    ///
    /// An empty query with no filters returns the whole catalog.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Vec<Arc<Record>> {
        let catalog = self.ensure_loaded().await;
        let results = filter_records(&catalog, query, filters);
        debug!(
            query,
            filtered = !filters.is_empty(),
            results = results.len(),
            "Catalog search"
        );
        results
    }

    /// Look up a record by the textual form of its identifier.
    pub async fn get_by_id(&self, id: &str) -> Option<Arc<Record>> {
        let Some(id_num) = parse_record_id(id) else {
            debug!(id, "Not a medicine identifier");
            return None;
        };
        self.get(id_num).await
    }

    /// Look up a record by identifier. The first match in cache order wins.
    pub async fn get(&self, id: RecordId) -> Option<Arc<Record>> {
        let catalog = self.ensure_loaded().await;
        let found = catalog.iter().find(|record| record.id == id).cloned();
        match &found {
            Some(record) => debug!(
                id,
                has_rcp = record.has_rcp(),
                has_notice = record.has_notice(),
                "Medicine found"
            ),
            None => debug!(id, "Medicine not found"),
        }
        found
    }
}
