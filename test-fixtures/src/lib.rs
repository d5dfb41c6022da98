//! In-memory search and document backend for integration tests.
//!
//! Implements `ISearchService` and `IDocumentStore` over JSON documents
//! held in memory, with a small `QueryExpr` evaluator covering the
//! algebra the engine emits (term/match incl. `_id`, inclusive ranges,
//! bool with minimum-should-match, nested containment, and a
//! `field:value [AND ...]` query-string subset). Failure injection
//! hooks simulate outages, timeouts, and per-index item failures.

mod backend;
mod evaluator;

pub use backend::InMemoryBackend;

/// Initialize a test tracing subscriber once (RUST_LOG respected).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
