//! Autocomplete suggestions across records, substances and holders

use crate::cache::CatalogCache;
use crate::model::{Record, Suggestion, SuggestionKind};
use crate::search::contains_ignore_case;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Queries shorter than this (in characters) get no suggestions.
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_RECORD_SUGGESTIONS: usize = 5;
pub const MAX_SUBSTANCE_SUGGESTIONS: usize = 3;
pub const MAX_HOLDER_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 10;

const SUBSTANCE_SUBTITLE: &str = "Substance active";

impl CatalogCache {
    /// Suggestions for `query`: matching records first, then substances,
    /// then holders, at most [`MAX_SUGGESTIONS`] in total.
    ///
    /// A query shorter than [`MIN_QUERY_LEN`] returns nothing and does not
    /// load the catalog.
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let catalog = self.ensure_loaded().await;
        let suggestions = build_suggestions(&catalog, query);
        debug!(query, count = suggestions.len(), "Suggestions computed");
        suggestions
    }
}

/// Build the suggestion list for `query` over `records`.
///
/// Each group is capped on its own before the whole list is cut to
/// [`MAX_SUGGESTIONS`]; the cut can remove holder suggestions.
pub fn build_suggestions(records: &[Arc<Record>], query: &str) -> Vec<Suggestion> {
    let needle = query.to_lowercase();
    let mut suggestions = Vec::with_capacity(
        MAX_RECORD_SUGGESTIONS + MAX_SUBSTANCE_SUGGESTIONS + MAX_HOLDER_SUGGESTIONS,
    );

    suggestions.extend(
        records
            .iter()
            .filter(|record| contains_ignore_case(&record.denomination, &needle))
            .take(MAX_RECORD_SUGGESTIONS)
            .map(|record| Suggestion {
                id: record.id.to_string(),
                title: record.denomination.clone(),
                subtitle: format!("{} - {}", record.forme_pharma, record.titulaires),
                kind: SuggestionKind::Record,
            }),
    );

    suggestions.extend(
        distinct(records.iter().map(|record| record.substance.as_str()))
            .filter(|substance| contains_ignore_case(substance, &needle))
            .take(MAX_SUBSTANCE_SUGGESTIONS)
            .map(|substance| Suggestion {
                id: substance.to_string(),
                title: substance.to_string(),
                subtitle: SUBSTANCE_SUBTITLE.to_string(),
                kind: SuggestionKind::Substance,
            }),
    );

    suggestions.extend(
        distinct(records.iter().map(|record| record.titulaires.as_str()))
            .filter(|holder| contains_ignore_case(holder, &needle))
            .take(MAX_HOLDER_SUGGESTIONS)
            .map(|holder| {
                let count = records.iter().filter(|r| r.titulaires == holder).count();
                Suggestion {
                    id: holder.to_string(),
                    title: holder.to_string(),
                    subtitle: medicine_count_label(count),
                    kind: SuggestionKind::Holder,
                }
            }),
    );

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn medicine_count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} médicament")
    } else {
        format!("{count} médicaments")
    }
}

/// Distinct values in first-occurrence order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> impl Iterator<Item = &'a str> {
    let mut seen = HashSet::new();
    values.filter(move |value| seen.insert(*value))
}
