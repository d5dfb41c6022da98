use serde::{Deserialize, Serialize};

/// One per-index entry of a correlation rule: which index participates,
/// the opaque query-language expression that identifies relevant events
/// there, and the field carrying the event timestamp.
///
/// Within one rule, all queries on the same index are assumed to use the
/// same timestamp field. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationQuery {
    pub index: String,
    pub query: String,
    #[serde(rename = "timestampField")]
    pub timestamp_field: String,
}

impl CorrelationQuery {
    pub fn new(
        index: impl Into<String>,
        query: impl Into<String>,
        timestamp_field: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            query: query.into(),
            timestamp_field: timestamp_field.into(),
        }
    }
}
