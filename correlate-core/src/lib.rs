//! # correlate-core
//!
//! Foundation crate for the Correlate events-correlation engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod search;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CorrelationConfig;
pub use errors::{CorrelationError, CorrelationResult};
pub use models::{Correlation, CorrelationOutcome, CorrelationQuery, CorrelationRule};
pub use search::{QueryExpr, SearchHit, SearchRequest, SearchResponse};
