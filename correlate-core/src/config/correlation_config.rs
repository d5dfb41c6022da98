use serde::{Deserialize, Serialize};

use crate::constants;

use super::VectorIndexConfig;

/// Correlation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Symmetric time window around an event's timestamp (millis).
    /// A zero or negative value collapses the window to a single instant.
    pub time_window_ms: i64,
    /// Shard count for the correlation history store.
    pub history_shards: usize,
    /// Vector codec / ANN index configuration.
    pub vector: VectorIndexConfig,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            time_window_ms: constants::DEFAULT_TIME_WINDOW_MS,
            history_shards: constants::DEFAULT_HISTORY_SHARDS,
            vector: VectorIndexConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_deserializes_to_defaults() {
        let config: CorrelationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.time_window_ms, 300_000);
        assert_eq!(config.history_shards, 1);
        assert_eq!(config.vector.m, 16);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: CorrelationConfig =
            serde_json::from_str(r#"{"time_window_ms": 60000}"#).unwrap();
        assert_eq!(config.time_window_ms, 60_000);
        assert_eq!(config.vector.ef_construction, 100);
    }
}
