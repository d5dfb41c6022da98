//! Error taxonomy for the correlation engine.
//!
//! Each subsystem has its own error enum; `CorrelationError` is the
//! umbrella type crossing crate boundaries.

mod codec_error;
mod engine_error;
mod search_error;
mod store_error;
mod validation_error;

pub use codec_error::CodecError;
pub use engine_error::EngineError;
pub use search_error::SearchError;
pub use store_error::StoreError;
pub use validation_error::ValidationError;

/// Umbrella error for all correlation subsystems.
#[derive(Debug, thiserror::Error)]
pub enum CorrelationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias used across the workspace.
pub type CorrelationResult<T> = Result<T, CorrelationError>;
