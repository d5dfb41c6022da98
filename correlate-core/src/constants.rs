/// Correlate system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Index holding correlation rule documents.
pub const RULE_STORE_INDEX: &str = ".correlation-rules-config";

/// Index holding the correlation history (graph records).
pub const HISTORY_STORE_INDEX: &str = ".correlation-history";

/// Field on a rule document that holds its list of per-index queries.
/// Rule discovery runs a nested containment query against this field.
pub const RULE_QUERIES_FIELD: &str = "correlate";

/// Sentinel ID for a not-yet-persisted document.
pub const NO_ID: &str = "";

/// Sentinel version for a not-yet-persisted document.
pub const NO_VERSION: i64 = -1;

/// Default symmetric correlation time window (5 minutes, millis).
pub const DEFAULT_TIME_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Default shard count for the correlation history store.
pub const DEFAULT_HISTORY_SHARDS: usize = 1;

/// Retention interval for the history store (20 days, millis).
/// Rotation itself is driven externally; the engine only exposes the value.
pub const FIXED_HISTORICAL_INTERVAL_MS: i64 = 24 * 60 * 60 * 20 * 1000;

/// Field on a history record that holds the correlation vector.
pub const CORRELATION_VECTOR_FIELD: &str = "corr_vector";

/// Default dimensionality of correlation vectors.
pub const DEFAULT_VECTOR_DIMENSION: usize = 128;

/// Default max graph connections per HNSW node.
pub const DEFAULT_HNSW_M: usize = 16;

/// Default candidate list size during HNSW construction.
pub const DEFAULT_HNSW_EF_CONSTRUCTION: usize = 100;
