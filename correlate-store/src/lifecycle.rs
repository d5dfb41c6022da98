//! Lifecycle of the correlation history index.
//!
//! The history store is a hidden index bootstrapped with two reserved
//! root records: a timestamp anchor (`root=true`, wall-clock time of
//! setup) and a scoring anchor (`root=false`, carries the caller's
//! setup timestamp). Rotation happens externally on a fixed interval;
//! this module only creates and seeds.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use correlate_core::constants::HISTORY_STORE_INDEX;
use correlate_core::errors::{CorrelationResult, StoreError};
use correlate_core::models::Correlation;
use correlate_core::traits::{IDocumentStore, IndexSettings};

pub struct HistoryStoreManager {
    store: Arc<dyn IDocumentStore>,
    shards: usize,
}

impl HistoryStoreManager {
    pub fn new(store: Arc<dyn IDocumentStore>, shards: usize) -> Self {
        Self { store, shards }
    }

    /// Create the hidden history index if it does not exist yet.
    /// Idempotent: a concurrent creation racing us is success.
    /// Returns whether this call created the index.
    pub async fn ensure_store_exists(&self) -> CorrelationResult<bool> {
        if self.store.index_exists(HISTORY_STORE_INDEX).await? {
            debug!(index = HISTORY_STORE_INDEX, "history store already exists");
            return Ok(false);
        }

        let settings = IndexSettings {
            hidden: true,
            shards: self.shards,
        };
        match self.store.create_index(HISTORY_STORE_INDEX, settings).await {
            Ok(()) => {
                info!(
                    index = HISTORY_STORE_INDEX,
                    shards = self.shards,
                    "created history store"
                );
                Ok(true)
            }
            Err(StoreError::AlreadyExists { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the two root records in one bulk operation. Run once after
    /// the first `ensure_store_exists` that reports creation.
    pub async fn bootstrap(&self, setup_timestamp: i64) -> CorrelationResult<()> {
        let root = Correlation::Root {
            timestamp: Utc::now().timestamp_millis(),
        };
        let score_root = Correlation::ScoreRoot {
            score_timestamp: setup_timestamp,
        };

        self.store
            .bulk_index(
                HISTORY_STORE_INDEX,
                vec![root.to_source(), score_root.to_source()],
            )
            .await?;
        info!(index = HISTORY_STORE_INDEX, setup_timestamp, "history store bootstrapped");
        Ok(())
    }
}
