/// Document / index store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("index {index} already exists")]
    AlreadyExists { index: String },

    #[error("index {index} not found")]
    IndexNotFound { index: String },

    #[error("document {id} not found in {index}")]
    DocNotFound { index: String, id: String },

    #[error("index creation failed for {index}: {reason}")]
    CreateFailed { index: String, reason: String },

    #[error("write to {index} failed: {reason}")]
    WriteFailed { index: String, reason: String },
}
