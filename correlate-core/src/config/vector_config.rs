use serde::{Deserialize, Serialize};

use crate::constants;

/// Hyperparameters for the correlation vector index.
///
/// `m` and `ef_construction` only affect index quality and build cost,
/// never codec round-trip correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexConfig {
    /// Fixed dimensionality of correlation vectors per field.
    pub dimension: usize,
    /// Max graph connections per HNSW node.
    pub m: usize,
    /// Candidate list size during HNSW construction.
    pub ef_construction: usize,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            dimension: constants::DEFAULT_VECTOR_DIMENSION,
            m: constants::DEFAULT_HNSW_M,
            ef_construction: constants::DEFAULT_HNSW_EF_CONSTRUCTION,
        }
    }
}
