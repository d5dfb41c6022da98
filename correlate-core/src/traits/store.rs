use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

/// Store-side settings for index creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Hidden indices are excluded from wildcard resolution.
    pub hidden: bool,
    pub shards: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            hidden: false,
            shards: 1,
        }
    }
}

/// Outcome of a single document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocWriteOutcome {
    pub id: String,
    pub version: i64,
}

/// Key-value document store over index-like collections. The engine
/// side only needs existence checks, ID-scoped access, and batched
/// writes — never full scans.
#[async_trait]
pub trait IDocumentStore: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    /// Create an index. Racing duplicate creation surfaces as
    /// `StoreError::AlreadyExists`; callers decide whether that is fatal.
    async fn create_index(&self, index: &str, settings: IndexSettings) -> Result<(), StoreError>;

    /// Index one document. `id: None` asks the store to generate one.
    /// Writing to an existing ID bumps the document version.
    async fn index_doc(
        &self,
        index: &str,
        id: Option<String>,
        source: Value,
    ) -> Result<DocWriteOutcome, StoreError>;

    /// Index a batch of documents in one atomic operation.
    async fn bulk_index(
        &self,
        index: &str,
        sources: Vec<Value>,
    ) -> Result<Vec<DocWriteOutcome>, StoreError>;

    /// Fetch one document by ID, with its version.
    async fn get_doc(&self, index: &str, id: &str) -> Result<Option<(Value, i64)>, StoreError>;
}
