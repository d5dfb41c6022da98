//! Per-field registry of HNSW indexes.
//!
//! Each correlation vector field has its own index and a fixed
//! dimension; the first insert for a field pins the configured
//! dimension and later inserts must match it.

use dashmap::DashMap;
use std::sync::Mutex;

use correlate_core::config::VectorIndexConfig;
use correlate_core::errors::CodecError;
use tracing::debug;

use crate::hnsw::HnswIndex;

/// Concurrent map from field name to its vector index.
pub struct FieldVectorIndexes {
    config: VectorIndexConfig,
    indexes: DashMap<String, Mutex<HnswIndex>>,
}

impl FieldVectorIndexes {
    pub fn new(config: VectorIndexConfig) -> Self {
        Self {
            config,
            indexes: DashMap::new(),
        }
    }

    /// Insert a vector for a document under a field, creating the
    /// field's index on first use.
    pub fn insert(
        &self,
        field: &str,
        doc_id: impl Into<String>,
        vector: Vec<f32>,
    ) -> Result<(), CodecError> {
        if vector.len() != self.config.dimension {
            return Err(CodecError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }

        let entry = self.indexes.entry(field.to_string()).or_insert_with(|| {
            debug!(field, dimension = self.config.dimension, "creating vector index");
            Mutex::new(HnswIndex::new(
                self.config.dimension,
                self.config.m,
                self.config.ef_construction,
            ))
        });
        let mut index = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        index.insert(doc_id, vector)
    }

    /// Approximate k-nearest-neighbor query against one field's index.
    /// An unknown field yields no hits.
    pub fn search(
        &self,
        field: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(String, f64)>, CodecError> {
        match self.indexes.get(field) {
            Some(entry) => {
                let index = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                index.search(query, k)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Number of vectors indexed under a field.
    pub fn field_len(&self, field: &str) -> usize {
        self.indexes
            .get(field)
            .map(|entry| {
                entry
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .len()
            })
            .unwrap_or(0)
    }
}
