use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-request adjacency result: either the event is an orphan, or it
/// has at least one neighbor in some index. Neighbor sets are unordered;
/// duplicate IDs across rules deduplicate naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationOutcome {
    pub orphan: bool,
    pub neighbor_events: BTreeMap<String, BTreeSet<String>>,
}

impl CorrelationOutcome {
    /// No rule matched, or no neighbor was found under any matching rule.
    pub fn orphan() -> Self {
        Self {
            orphan: true,
            neighbor_events: BTreeMap::new(),
        }
    }

    /// At least one neighbor was found.
    pub fn correlated(neighbor_events: BTreeMap<String, BTreeSet<String>>) -> Self {
        debug_assert!(!neighbor_events.is_empty());
        Self {
            orphan: false,
            neighbor_events,
        }
    }
}
