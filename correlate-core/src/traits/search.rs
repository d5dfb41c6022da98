use async_trait::async_trait;

use crate::errors::SearchError;
use crate::search::{SearchRequest, SearchResponse};

/// Abstract search capability. The engine only needs single searches
/// and order-preserving batched multi-search; query evaluation itself
/// is delegated to the implementation.
#[async_trait]
pub trait ISearchService: Send + Sync {
    /// Execute one search. Unavailability and timeouts surface as errors.
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SearchError>;

    /// Execute a batch of searches. The result list preserves request
    /// order; a per-item failure must not abort sibling items.
    async fn multi_search(
        &self,
        requests: Vec<SearchRequest>,
    ) -> Vec<Result<SearchResponse, SearchError>>;
}
