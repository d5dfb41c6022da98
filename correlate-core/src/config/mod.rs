//! Configuration for the correlation engine and its vector index.
//!
//! All structs deserialize with full defaults so an empty config is valid.

mod correlation_config;
mod vector_config;

pub use correlation_config::CorrelationConfig;
pub use vector_config::VectorIndexConfig;
