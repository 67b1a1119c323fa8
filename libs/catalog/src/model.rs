//! Catalog data model
//!
//! Wire names follow the published dataset (`formePharma`, `etatCommercial`,
//! `sectionsRCP`, ...). Fields the catalog does not interpret are kept in
//! [`Record::extensions`] so a record serializes back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = i64;

/// Aggregate statistics document. Opaque to the catalog.
pub type Stats = Value;

/// One medicine of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub denomination: String,
    pub substance: String,
    /// Marketing authorisation holder(s).
    pub titulaires: String,
    pub forme_pharma: String,
    pub etat_commercial: String,
    /// Summary of product characteristics, by section.
    #[serde(rename = "sectionsRCP", default, skip_serializing_if = "Option::is_none")]
    pub sections_rcp: Option<Value>,
    /// Patient leaflet, by section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections_notice: Option<Value>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Record {
    pub fn has_rcp(&self) -> bool {
        self.sections_rcp.as_ref().is_some_and(is_truthy)
    }

    pub fn has_notice(&self) -> bool {
        self.sections_notice.as_ref().is_some_and(is_truthy)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Facet an autocomplete candidate was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionKind {
    #[serde(rename = "medicament")]
    Record,
    #[serde(rename = "substance")]
    Substance,
    #[serde(rename = "laboratoire")]
    Holder,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Record => "medicament",
            SuggestionKind::Substance => "substance",
            SuggestionKind::Holder => "laboratoire",
        }
    }
}

/// Autocomplete candidate. Recomputed for every query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}
