use medicat_catalog::{CatalogCache, SearchFilters, StaticSource, SuggestionKind};
use serde_json::json;
use std::sync::Arc;

fn doliprane_source() -> Arc<StaticSource> {
    let record = serde_json::from_value(json!({
        "id": 1,
        "denomination": "Doliprane",
        "substance": "Paracetamol",
        "titulaires": "Sanofi",
        "formePharma": "Comprimé",
        "etatCommercial": "Commercialisé"
    }))
    .expect("valid record");
    Arc::new(StaticSource::new(vec![record]))
}

#[tokio::test]
async fn search_filters_and_lookup_on_single_record_catalog() {
    let source = doliprane_source();
    let cache = CatalogCache::new(source.clone());

    let found = cache.search("dolip", &SearchFilters::default()).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    let by_lab = cache
        .search("", &SearchFilters::default().with_laboratoire("sanofi"))
        .await;
    assert_eq!(by_lab.len(), 1);

    let by_form = cache
        .search("", &SearchFilters::default().with_forme_pharma("Gel"))
        .await;
    assert!(by_form.is_empty());

    assert_eq!(cache.get_by_id("1").await.map(|r| r.id), Some(1));
    assert!(cache.get_by_id("99").await.is_none());
    assert!(cache.get_by_id("not-an-id").await.is_none());

    assert_eq!(source.record_fetches(), 1);
}

#[tokio::test]
async fn full_search_returns_cache_in_order() {
    let cache = CatalogCache::new(doliprane_source());
    let all = cache.search("", &SearchFilters::default()).await;
    let snapshot = cache.snapshot();

    assert_eq!(all.len(), snapshot.len());
    assert!(all.iter().zip(snapshot.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
}

#[tokio::test]
async fn suggestions_for_single_record_catalog() {
    let cache = CatalogCache::new(doliprane_source());

    let suggestions = cache.suggest("do").await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].kind, SuggestionKind::Record);
    assert_eq!(suggestions[0].title, "Doliprane");
    assert_eq!(suggestions[0].subtitle, "Comprimé - Sanofi");
}

#[tokio::test]
async fn short_queries_do_not_load_the_catalog() {
    let source = doliprane_source();
    let cache = CatalogCache::new(source.clone());

    assert!(cache.suggest("").await.is_empty());
    assert!(cache.suggest("d").await.is_empty());
    assert!(cache.suggest("é").await.is_empty());

    assert_eq!(source.record_fetches(), 0);
    assert!(!cache.is_loaded());
}

#[tokio::test]
async fn reset_then_search_fetches_exactly_once_more() {
    let source = doliprane_source();
    let cache = CatalogCache::new(source.clone());
    cache.ensure_loaded().await;
    assert_eq!(source.record_fetches(), 1);

    cache.reset();
    cache.search("dolip", &SearchFilters::default()).await;
    cache.search("", &SearchFilters::default()).await;

    assert_eq!(source.record_fetches(), 2);
}
