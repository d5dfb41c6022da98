//! Append-only correlation history: edge writes and the
//! correlated-events read path.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use correlate_core::config::VectorIndexConfig;
use correlate_core::constants::{
    CORRELATION_VECTOR_FIELD, FIXED_HISTORICAL_INTERVAL_MS, HISTORY_STORE_INDEX,
};
use correlate_core::errors::{CodecError, CorrelationResult};
use correlate_core::models::{Correlation, EventWithScore};
use correlate_core::search::{BoolQuery, QueryExpr, SearchRequest};
use correlate_core::traits::{DocWriteOutcome, IDocumentStore, ISearchService};
use correlate_vector::FieldVectorIndexes;

pub struct HistoryStore {
    store: Arc<dyn IDocumentStore>,
    search: Arc<dyn ISearchService>,
    /// ANN index over the vectors of stored edges, for similarity reads.
    vectors: FieldVectorIndexes,
    /// Required `corr_vector` dimension when a vector is supplied.
    dimension: usize,
}

impl HistoryStore {
    pub fn new(
        store: Arc<dyn IDocumentStore>,
        search: Arc<dyn ISearchService>,
        config: VectorIndexConfig,
    ) -> Self {
        Self {
            store,
            search,
            dimension: config.dimension,
            vectors: FieldVectorIndexes::new(config),
        }
    }

    /// Persist one `Edge` record per neighbor in the adjacency, all in
    /// one bulk write. Records are append-only; nothing here mutates.
    /// The optional vector is dimension-checked before any I/O and is
    /// shared by every edge of this event.
    pub async fn store_correlations(
        &self,
        index: &str,
        event: &str,
        timestamp: i64,
        adjacency: &BTreeMap<String, BTreeSet<String>>,
        tags: &[String],
        vector: Option<&[f32]>,
    ) -> CorrelationResult<Vec<DocWriteOutcome>> {
        if let Some(vector) = vector {
            if vector.len() != self.dimension {
                return Err(CodecError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                }
                .into());
            }
        }

        // Coarse rotation generation; the store itself is truncated
        // externally on the fixed historical interval.
        let level = timestamp / FIXED_HISTORICAL_INTERVAL_MS;

        let mut sources = Vec::new();
        for (neighbor_index, neighbors) in adjacency {
            for neighbor in neighbors {
                let edge = Correlation::Edge {
                    level,
                    event1: event.to_string(),
                    event2: neighbor.clone(),
                    correlation_vector: vector.map(<[f32]>::to_vec).unwrap_or_default(),
                    timestamp,
                    index1: index.to_string(),
                    index2: neighbor_index.clone(),
                    tags: tags.to_vec(),
                };
                sources.push(edge.to_source());
            }
        }
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        debug!(index, event, edges = sources.len(), "storing correlation edges");
        let outcomes = self.store.bulk_index(HISTORY_STORE_INDEX, sources).await?;

        if let Some(vector) = vector {
            for outcome in &outcomes {
                self.vectors
                    .insert(CORRELATION_VECTOR_FIELD, outcome.id.clone(), vector.to_vec())?;
            }
        }
        Ok(outcomes)
    }

    /// Stored edges most similar to `vector`, as `(record id, cosine
    /// similarity)` pairs by decreasing similarity. Only edges written
    /// with a vector participate.
    pub fn similar_correlations(
        &self,
        vector: &[f32],
        k: usize,
    ) -> CorrelationResult<Vec<(String, f64)>> {
        Ok(self.vectors.search(CORRELATION_VECTOR_FIELD, vector, k)?)
    }

    /// Events recorded as correlated with `event` within `time_window_ms`
    /// of now, projected to the opposite end of each edge and capped at
    /// `nearby_events`. Non-edge records in the window are skipped.
    pub async fn search_correlated_events(
        &self,
        index: &str,
        event: &str,
        time_window_ms: i64,
        nearby_events: usize,
    ) -> CorrelationResult<Vec<EventWithScore>> {
        let now = Utc::now().timestamp_millis();
        let query = BoolQuery::new()
            .filter(QueryExpr::range("timestamp", now - time_window_ms, now))
            .should(
                BoolQuery::new()
                    .must(QueryExpr::term("event1", event))
                    .must(QueryExpr::term("index1", index))
                    .build(),
            )
            .should(
                BoolQuery::new()
                    .must(QueryExpr::term("event2", event))
                    .must(QueryExpr::term("index2", index))
                    .build(),
            )
            .minimum_should_match(1)
            .build();
        let request = SearchRequest::new(HISTORY_STORE_INDEX, query).size(nearby_events);

        let response = self.search.search(request).await?;

        let mut events = Vec::with_capacity(response.hits.len());
        for hit in response.hits {
            let Some(source) = hit.source.as_ref() else {
                continue;
            };
            let correlation = match Correlation::from_source(source) {
                Ok(correlation) => correlation,
                Err(e) => {
                    warn!(record = %hit.id, error = %e, "skipping malformed history record");
                    continue;
                }
            };
            let Correlation::Edge {
                event1,
                event2,
                index1,
                index2,
                tags,
                ..
            } = correlation
            else {
                continue;
            };

            // Project the end opposite to the queried event.
            let (other_index, other_event) = if event1 == event && index1 == index {
                (index2, event2)
            } else {
                (index1, event1)
            };
            events.push(EventWithScore::new(other_index, other_event, hit.score, tags));
        }
        Ok(events)
    }
}
