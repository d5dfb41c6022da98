use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{NO_ID, NO_VERSION};
use crate::errors::CorrelationResult;

use super::CorrelationQuery;

fn no_id() -> String {
    NO_ID.to_string()
}

fn no_version() -> i64 {
    NO_VERSION
}

/// Declarative description of which indices participate in a correlation
/// and what sub-query + timestamp field identifies relevant events per
/// index. Owned by the rule store; mutated only by re-indexing.
///
/// The persisted document carries only `name` and the `correlate` list;
/// `id` and `version` come from the store and default to the
/// not-yet-persisted sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRule {
    #[serde(skip, default = "no_id")]
    pub id: String,
    #[serde(skip, default = "no_version")]
    pub version: i64,
    pub name: String,
    #[serde(rename = "correlate")]
    pub queries: Vec<CorrelationQuery>,
}

impl CorrelationRule {
    /// A not-yet-persisted rule.
    pub fn new(name: impl Into<String>, queries: Vec<CorrelationQuery>) -> Self {
        Self {
            id: no_id(),
            version: NO_VERSION,
            name: name.into(),
            queries,
        }
    }

    /// Parse a stored rule document, attaching the store-assigned identity.
    pub fn parse(source: &Value, id: &str, version: i64) -> CorrelationResult<Self> {
        let mut rule: CorrelationRule = serde_json::from_value(source.clone())?;
        rule.id = id.to_string();
        rule.version = version;
        Ok(rule)
    }

    /// The persisted document form (without identity fields).
    pub fn to_source(&self) -> CorrelationResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// First query entry declared for `index`, if any.
    /// Rules are assumed not to declare the same index twice.
    pub fn query_for_index(&self, index: &str) -> Option<&CorrelationQuery> {
        self.queries.iter().find(|q| q.index == index)
    }

    /// Whether this rule has been assigned an identity by the store.
    pub fn is_persisted(&self) -> bool {
        self.id != NO_ID
    }
}
