/// Malformed rule/query input, rejected before matching begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid correlation rule: {reason}")]
    InvalidRule { reason: String },

    #[error("invalid correlation query for index {index}: {reason}")]
    InvalidQuery { index: String, reason: String },
}
