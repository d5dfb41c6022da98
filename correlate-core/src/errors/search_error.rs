/// Failures reported by the external search capability.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("search backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("search timed out on index {index}")]
    TimedOut { index: String },

    #[error("search failed on index {index}: {reason}")]
    Failed { index: String, reason: String },
}
