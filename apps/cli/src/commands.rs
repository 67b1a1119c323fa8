//! Subcommands
//!
//! Each command renders its result to a string, human-readable or JSON.

use anyhow::{anyhow, Context};
use clap::{Subcommand, ValueEnum};
use medicat_catalog::{CatalogCache, Record, SearchFilters, Suggestion};
use std::fmt::Write as _;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search medicines by text and filters
    Search {
        /// Matched against name, substance, holder and form
        query: Option<String>,
        /// Holder (substring, case-insensitive)
        #[arg(long)]
        laboratoire: Option<String>,
        /// Pharmaceutical form (exact)
        #[arg(long = "forme")]
        forme_pharma: Option<String>,
        /// Active substance (substring, case-insensitive)
        #[arg(long)]
        substance: Option<String>,
        /// Commercial status (exact)
        #[arg(long = "etat")]
        etat_commercial: Option<String>,
        /// Print at most this many results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one medicine
    Show { id: String },
    /// Autocomplete suggestions
    Suggest { query: String },
    /// List the distinct values of a facet
    Facets {
        #[arg(value_enum)]
        facet: Option<Facet>,
    },
    /// Print the statistics document
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facet {
    Forms,
    Holders,
    Substances,
}

impl Facet {
    fn title(self) -> &'static str {
        match self {
            Facet::Forms => "Formes pharmaceutiques",
            Facet::Holders => "Laboratoires",
            Facet::Substances => "Substances",
        }
    }

    fn values(self, cache: &CatalogCache) -> Vec<String> {
        match self {
            Facet::Forms => cache.formes_pharma(),
            Facet::Holders => cache.laboratoires(),
            Facet::Substances => cache.substances(),
        }
    }
}

pub async fn run(cache: &CatalogCache, command: Command, json: bool) -> anyhow::Result<String> {
    match command {
        Command::Search {
            query,
            laboratoire,
            forme_pharma,
            substance,
            etat_commercial,
            limit,
        } => {
            let filters = SearchFilters {
                laboratoire,
                forme_pharma,
                substance,
                etat_commercial,
            };
            let mut results = cache
                .search(query.as_deref().unwrap_or_default(), &filters)
                .await;
            let total = results.len();
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            let records: Vec<&Record> = results.iter().map(|r| r.as_ref()).collect();
            if json {
                return Ok(serde_json::to_string_pretty(&records)?);
            }
            Ok(render_search(&records, total)?)
        }
        Command::Show { id } => {
            let record = cache
                .get_by_id(&id)
                .await
                .ok_or_else(|| match cache.last_error() {
                    Some(err) => anyhow!("Medicine {id} not found ({err})"),
                    None => anyhow!("Medicine {id} not found"),
                })?;
            if json {
                return Ok(serde_json::to_string_pretty(&*record)?);
            }
            Ok(render_record(&record))
        }
        Command::Suggest { query } => {
            let suggestions = cache.suggest(&query).await;
            if json {
                return Ok(serde_json::to_string_pretty(&suggestions)?);
            }
            Ok(render_suggestions(&suggestions))
        }
        Command::Facets { facet } => {
            cache.ensure_loaded().await;
            let facets = match facet {
                Some(facet) => vec![facet],
                None => vec![Facet::Forms, Facet::Holders, Facet::Substances],
            };
            if json {
                let map: serde_json::Map<String, serde_json::Value> = facets
                    .iter()
                    .map(|facet| {
                        let key = format!("{facet:?}").to_lowercase();
                        (key, serde_json::json!(facet.values(cache)))
                    })
                    .collect();
                return Ok(serde_json::to_string_pretty(&map)?);
            }
            let mut out = String::new();
            for facet in facets {
                let values = facet.values(cache);
                writeln!(out, "{} ({})", facet.title(), values.len())?;
                for value in values {
                    writeln!(out, "  {value}")?;
                }
            }
            Ok(out.trim_end().to_string())
        }
        Command::Stats => {
            let stats = cache
                .load_stats()
                .await
                .context("Statistics are not available")?;
            Ok(serde_json::to_string_pretty(&stats)?)
        }
    }
}

fn render_search(records: &[&Record], total: usize) -> Result<String, std::fmt::Error> {
    let mut out = match total {
        0 => "Aucun médicament trouvé".to_string(),
        1 => "1 médicament".to_string(),
        n => format!("{n} médicaments"),
    };
    for record in records {
        write!(
            out,
            "\n{}\t{}\t{}\t{}",
            record.id, record.denomination, record.forme_pharma, record.titulaires
        )?;
    }
    if records.len() < total {
        write!(out, "\n... {} de plus", total - records.len())?;
    }
    Ok(out)
}

fn render_record(record: &Record) -> String {
    let availability = |present: bool| if present { "disponible" } else { "non disponible" };
    format!(
        "{}\n  Identifiant: {}\n  Substance active: {}\n  Titulaire: {}\n  Forme: {}\n  État commercial: {}\n  RCP: {}\n  Notice: {}",
        record.denomination,
        record.id,
        record.substance,
        record.titulaires,
        record.forme_pharma,
        record.etat_commercial,
        availability(record.has_rcp()),
        availability(record.has_notice()),
    )
}

fn render_suggestions(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .map(|s| format!("[{}] {} ({})", s.kind.as_str(), s.title, s.subtitle))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use medicat_catalog::StaticSource;
    use serde_json::json;
    use std::sync::Arc;

    fn cache() -> CatalogCache {
        let records = serde_json::from_value(json!([
            {
                "id": 1,
                "denomination": "Doliprane",
                "substance": "Paracetamol",
                "titulaires": "Sanofi",
                "formePharma": "Comprimé",
                "etatCommercial": "Commercialisé",
                "sectionsNotice": { "1": "Qu'est-ce que Doliprane" }
            },
            {
                "id": 2,
                "denomination": "Dolirhume",
                "substance": "Pseudoephedrine",
                "titulaires": "Sanofi",
                "formePharma": "Comprimé",
                "etatCommercial": "Commercialisé"
            }
        ]))
        .unwrap();
        CatalogCache::new(Arc::new(
            StaticSource::new(records).with_stats(json!({ "totalMedicaments": 2 })),
        ))
    }

    fn search(query: &str, limit: Option<usize>) -> Command {
        Command::Search {
            query: Some(query.to_string()),
            laboratoire: None,
            forme_pharma: None,
            substance: None,
            etat_commercial: None,
            limit,
        }
    }

    #[tokio::test]
    async fn search_lists_matches_with_count() {
        let out = run(&cache(), search("doli", Some(1)), false).await.unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "2 médicaments");
        assert_eq!(lines[1], "1\tDoliprane\tComprimé\tSanofi");
        assert_eq!(lines[2], "... 1 de plus");
    }

    #[tokio::test]
    async fn search_json_is_an_array_of_records() {
        let out = run(&cache(), search("pseudo", None), true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["formePharma"], "Comprimé");
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn show_reports_sections() {
        let out = run(&cache(), Command::Show { id: "1".into() }, false)
            .await
            .unwrap();
        assert!(out.starts_with("Doliprane"));
        assert!(out.contains("RCP: non disponible"));
        assert!(out.contains("Notice: disponible"));
    }

    #[tokio::test]
    async fn show_unknown_id_fails() {
        let err = run(&cache(), Command::Show { id: "99".into() }, false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Medicine 99 not found");
    }

    #[tokio::test]
    async fn suggest_renders_kind_tags() {
        let out = run(&cache(), Command::Suggest { query: "sanofi".into() }, false)
            .await
            .unwrap();
        assert_eq!(out, "[laboratoire] Sanofi (2 médicaments)");
    }

    #[tokio::test]
    async fn facets_load_the_catalog_first() {
        let out = run(
            &cache(),
            Command::Facets {
                facet: Some(Facet::Holders),
            },
            false,
        )
        .await
        .unwrap();
        assert_eq!(out, "Laboratoires (1)\n  Sanofi");
    }

    #[tokio::test]
    async fn stats_are_printed_as_json() {
        let out = run(&cache(), Command::Stats, false).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totalMedicaments"], 2);
    }
}
