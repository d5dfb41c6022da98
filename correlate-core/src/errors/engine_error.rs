use super::SearchError;

/// Correlation engine errors. Only failures that abort a whole request
/// appear here; per-item batch failures are suppressed inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The top-level search dependency was unreachable or timed out.
    /// Fatal to the current request; never retried by the engine itself.
    #[error("search unavailable: {0}")]
    SearchUnavailable(#[source] SearchError),

    /// A rule document in the rule store could not be parsed.
    #[error("malformed rule {id}: {reason}")]
    MalformedRule { id: String, reason: String },
}
