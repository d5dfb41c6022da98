//! The in-memory backend: one `DashMap` of indices, each a map of
//! versioned JSON documents, plus failure-injection switches.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::Value;

use correlate_core::errors::{SearchError, StoreError};
use correlate_core::search::{SearchHit, SearchRequest, SearchResponse};
use correlate_core::traits::{DocWriteOutcome, IDocumentStore, ISearchService, IndexSettings};

use crate::evaluator;

struct StoredDoc {
    source: Value,
    version: i64,
}

struct IndexData {
    settings: IndexSettings,
    docs: BTreeMap<String, StoredDoc>,
}

/// In-memory `ISearchService` + `IDocumentStore`.
#[derive(Default)]
pub struct InMemoryBackend {
    indices: DashMap<String, IndexData>,
    /// Indices whose searches fail as batch items.
    failing: DashSet<String>,
    /// Indices whose searches come back timed out.
    timing_out: DashSet<String>,
    /// Whole-backend outage.
    unavailable: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index if absent (seed helper).
    pub fn seed_index(&self, index: &str) {
        self.indices.entry(index.to_string()).or_insert_with(|| IndexData {
            settings: IndexSettings::default(),
            docs: BTreeMap::new(),
        });
    }

    /// Put a document with a fixed ID (seed helper). Creates the index.
    pub fn seed_doc(&self, index: &str, id: &str, source: Value) {
        self.seed_index(index);
        if let Some(mut data) = self.indices.get_mut(index) {
            let version = data.docs.get(id).map(|d| d.version + 1).unwrap_or(1);
            data.docs.insert(id.to_string(), StoredDoc { source, version });
        }
    }

    /// Make searches against `index` fail as individual batch items.
    pub fn fail_index(&self, index: &str) {
        self.failing.insert(index.to_string());
    }

    /// Make searches against `index` come back timed out.
    pub fn time_out_index(&self, index: &str) {
        self.timing_out.insert(index.to_string());
    }

    /// Toggle a whole-backend outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn doc_count(&self, index: &str) -> usize {
        self.indices.get(index).map(|d| d.docs.len()).unwrap_or(0)
    }

    fn run_search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchError::Unavailable {
                reason: "injected outage".to_string(),
            });
        }
        if self.failing.contains(&request.index) {
            return Err(SearchError::Failed {
                index: request.index.clone(),
                reason: "injected item failure".to_string(),
            });
        }
        if self.timing_out.contains(&request.index) {
            return Ok(SearchResponse {
                hits: Vec::new(),
                total_hits: 0,
                timed_out: true,
            });
        }

        let Some(data) = self.indices.get(&request.index) else {
            return Err(SearchError::Failed {
                index: request.index.clone(),
                reason: "index not found".to_string(),
            });
        };

        let mut hits = Vec::new();
        for (id, doc) in &data.docs {
            if !evaluator::matches(&request.query, id, &doc.source) {
                continue;
            }
            let fields = request
                .fetch_fields
                .iter()
                .filter_map(|field| {
                    doc.source
                        .get(field)
                        .cloned()
                        .map(|value| (field.clone(), value))
                })
                .collect();
            hits.push(SearchHit {
                id: id.clone(),
                index: request.index.clone(),
                version: doc.version,
                source: request.fetch_source.then(|| doc.source.clone()),
                fields,
                score: 1.0,
            });
        }

        let total_hits = hits.len() as u64;
        if let Some(size) = request.size {
            hits.truncate(size);
        }
        Ok(SearchResponse {
            hits,
            total_hits,
            timed_out: false,
        })
    }
}

#[async_trait]
impl ISearchService for InMemoryBackend {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError> {
        self.run_search(&request)
    }

    async fn multi_search(
        &self,
        requests: Vec<SearchRequest>,
    ) -> Vec<Result<SearchResponse, SearchError>> {
        requests
            .iter()
            .map(|request| self.run_search(request))
            .collect()
    }
}

#[async_trait]
impl IDocumentStore for InMemoryBackend {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        Ok(self.indices.contains_key(index))
    }

    async fn create_index(&self, index: &str, settings: IndexSettings) -> Result<(), StoreError> {
        if self.indices.contains_key(index) {
            return Err(StoreError::AlreadyExists {
                index: index.to_string(),
            });
        }
        self.indices.insert(
            index.to_string(),
            IndexData {
                settings,
                docs: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn index_doc(
        &self,
        index: &str,
        id: Option<String>,
        source: Value,
    ) -> Result<DocWriteOutcome, StoreError> {
        let mut data = self
            .indices
            .get_mut(index)
            .ok_or_else(|| StoreError::IndexNotFound {
                index: index.to_string(),
            })?;
        let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let version = data.docs.get(&id).map(|d| d.version + 1).unwrap_or(1);
        data.docs.insert(id.clone(), StoredDoc { source, version });
        Ok(DocWriteOutcome { id, version })
    }

    async fn bulk_index(
        &self,
        index: &str,
        sources: Vec<Value>,
    ) -> Result<Vec<DocWriteOutcome>, StoreError> {
        let mut data = self
            .indices
            .get_mut(index)
            .ok_or_else(|| StoreError::IndexNotFound {
                index: index.to_string(),
            })?;
        let mut outcomes = Vec::with_capacity(sources.len());
        for source in sources {
            let id = uuid::Uuid::new_v4().to_string();
            data.docs.insert(id.clone(), StoredDoc { source, version: 1 });
            outcomes.push(DocWriteOutcome { id, version: 1 });
        }
        Ok(outcomes)
    }

    async fn get_doc(&self, index: &str, id: &str) -> Result<Option<(Value, i64)>, StoreError> {
        Ok(self
            .indices
            .get(index)
            .and_then(|data| data.docs.get(id).map(|d| (d.source.clone(), d.version))))
    }
}

impl InMemoryBackend {
    /// Settings an index was created with (assertion helper).
    pub fn index_settings(&self, index: &str) -> Option<IndexSettings> {
        self.indices.get(index).map(|d| d.settings.clone())
    }
}
