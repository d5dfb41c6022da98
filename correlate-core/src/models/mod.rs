//! Domain models: rules, graph records, and read projections.

mod correlation;
mod correlation_query;
mod correlation_rule;
mod event_with_score;
mod outcome;

pub use correlation::{Correlation, CorrelationDoc};
pub use correlation_query::CorrelationQuery;
pub use correlation_rule::CorrelationRule;
pub use event_with_score::EventWithScore;
pub use outcome::CorrelationOutcome;
