use serde::{Deserialize, Serialize};

/// Read projection returned to callers of correlated-events search.
/// Constructed on demand from search results; no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWithScore {
    pub index: String,
    pub event: String,
    pub score: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventWithScore {
    pub fn new(
        index: impl Into<String>,
        event: impl Into<String>,
        score: f64,
        tags: Vec<String>,
    ) -> Self {
        Self {
            index: index.into(),
            event: event.into(),
            score,
            tags,
        }
    }
}
