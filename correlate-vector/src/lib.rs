//! # correlate-vector
//!
//! Storage codec for correlation vectors and the approximate
//! nearest-neighbor (HNSW) index built over them, one index per field.

pub mod codec;
pub mod hnsw;
pub mod registry;

pub use codec::{decode, encode};
pub use hnsw::HnswIndex;
pub use registry::FieldVectorIndexes;
