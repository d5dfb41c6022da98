use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::QueryExpr;

/// One search against one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub index: String,
    pub query: QueryExpr,
    /// Whether hits should carry the full document source.
    pub fetch_source: bool,
    /// Field values to project into `SearchHit::fields` (field-value
    /// fetch instead of full document fetch).
    #[serde(default)]
    pub fetch_fields: Vec<String>,
    /// Max hits to return. `None` means backend default.
    #[serde(default)]
    pub size: Option<usize>,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: QueryExpr) -> Self {
        Self {
            index: index.into(),
            query,
            fetch_source: true,
            fetch_fields: Vec::new(),
            size: None,
        }
    }

    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.fetch_source = fetch;
        self
    }

    pub fn fetch_field(mut self, field: impl Into<String>) -> Self {
        self.fetch_fields.push(field.into());
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// One matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub index: String,
    pub version: i64,
    /// Present only when the request asked for source.
    pub source: Option<Value>,
    /// Projected field values, keyed by field name.
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    pub score: f64,
}

impl SearchHit {
    /// Projected field value as an integer, if present.
    pub fn field_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub total_hits: u64,
    pub timed_out: bool,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total_hits: 0,
            timed_out: false,
        }
    }
}
