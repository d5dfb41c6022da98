//! CorrelationEngine: the per-event state machine.
//!
//! RuleDiscovery → MatchValidation → TimestampResolution →
//! WindowedFanOut → GraphAssembly. Suspension points are exactly the
//! calls into the search capability; everything between is pure
//! in-memory computation. Requests share no mutable state, so any
//! number can run concurrently.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use correlate_core::constants::RULE_STORE_INDEX;
use correlate_core::errors::{EngineError, SearchError};
use correlate_core::models::{CorrelationOutcome, CorrelationQuery, CorrelationRule};
use correlate_core::traits::ISearchService;

use crate::queries;
use crate::settings::DynamicSettings;

/// The correlation engine. Cheap to clone behind `Arc`s; holds only
/// read-only handles.
pub struct CorrelationEngine {
    search: Arc<dyn ISearchService>,
    settings: Arc<DynamicSettings>,
}

impl CorrelationEngine {
    pub fn new(search: Arc<dyn ISearchService>, settings: Arc<DynamicSettings>) -> Self {
        Self { search, settings }
    }

    /// Correlate one just-indexed event: find the rules naming its
    /// index, confirm the event satisfies them, search every other
    /// index those rules name within the time window, and assemble the
    /// per-index adjacency. Returns an orphan outcome when nothing
    /// relates.
    ///
    /// Failures of the rule store search abort the request; failures
    /// confined to one rule or one index are absorbed and only narrow
    /// the outcome (best-effort breadth).
    pub async fn index_correlation(
        &self,
        index: &str,
        event: &str,
    ) -> Result<CorrelationOutcome, EngineError> {
        // One settings snapshot per request; never re-read mid-flight.
        let snapshot = self.settings.snapshot();

        let rules = self.discover_rules(index).await?;
        if rules.is_empty() {
            debug!(index, event, "no rule references the input index");
            return Ok(CorrelationOutcome::orphan());
        }

        let (index_queries, timestamp) = self.validate_matches(index, event, rules).await;
        if index_queries.is_empty() {
            debug!(index, event, "no candidate rule matched the event");
            return Ok(CorrelationOutcome::orphan());
        }
        let Some(timestamp) = timestamp else {
            warn!(index, event, "surviving rules yielded no timestamp value");
            return Ok(CorrelationOutcome::orphan());
        };

        let adjacency = self
            .fan_out(index, event, timestamp, snapshot.time_window_ms, &index_queries)
            .await;

        if adjacency.is_empty() {
            info!(index, event, "event is an orphan");
            Ok(CorrelationOutcome::orphan())
        } else {
            info!(
                index,
                event,
                neighbor_indices = adjacency.len(),
                "event correlated"
            );
            Ok(CorrelationOutcome::correlated(adjacency))
        }
    }

    /// RuleDiscovery: nested containment query against the rule store.
    /// The rule store is the one dependency whose failure is fatal.
    async fn discover_rules(&self, index: &str) -> Result<Vec<CorrelationRule>, EngineError> {
        let request = queries::rule_discovery(RULE_STORE_INDEX, index);
        let response = self
            .search
            .search(request)
            .await
            .map_err(EngineError::SearchUnavailable)?;
        if response.timed_out {
            return Err(EngineError::SearchUnavailable(SearchError::TimedOut {
                index: RULE_STORE_INDEX.to_string(),
            }));
        }

        let mut rules = Vec::with_capacity(response.hits.len());
        for hit in response.hits {
            let source = hit.source.as_ref().ok_or_else(|| EngineError::MalformedRule {
                id: hit.id.clone(),
                reason: "rule hit carried no source".to_string(),
            })?;
            let rule = CorrelationRule::parse(source, &hit.id, hit.version).map_err(|e| {
                EngineError::MalformedRule {
                    id: hit.id.clone(),
                    reason: e.to_string(),
                }
            })?;
            rules.push(rule);
        }
        debug!(index, rules = rules.len(), "rule discovery complete");
        Ok(rules)
    }

    /// MatchValidation + TimestampResolution: one batched multi-search
    /// of per-rule existence checks. A rule survives only if its query,
    /// scoped to the event ID, matches exactly one document. Erroring
    /// items drop their rule but never abort the batch. Surviving
    /// rules' queries aggregate into a deduplicated per-index union;
    /// the event timestamp is recovered from the same batch.
    async fn validate_matches(
        &self,
        index: &str,
        event: &str,
        rules: Vec<CorrelationRule>,
    ) -> (BTreeMap<String, Vec<CorrelationQuery>>, Option<i64>) {
        // First (and assumed only) query entry per rule for the input index.
        let candidates: Vec<(CorrelationRule, CorrelationQuery)> = rules
            .into_iter()
            .filter_map(|rule| {
                rule.query_for_index(index)
                    .cloned()
                    .map(|query| (rule, query))
            })
            .collect();
        if candidates.is_empty() {
            return (BTreeMap::new(), None);
        }

        let requests = candidates
            .iter()
            .map(|(_, query)| queries::match_validation(index, event, query))
            .collect();
        let items = self.search.multi_search(requests).await;

        let mut index_queries: BTreeMap<String, Vec<CorrelationQuery>> = BTreeMap::new();
        let mut timestamp: Option<i64> = None;

        for ((rule, matched_query), item) in candidates.into_iter().zip(items) {
            let response = match item {
                Ok(response) if !response.timed_out => response,
                Ok(_) => {
                    warn!(rule = %rule.id, "match validation timed out, dropping rule");
                    continue;
                }
                Err(e) => {
                    warn!(rule = %rule.id, error = %e, "match validation failed, dropping rule");
                    continue;
                }
            };
            if response.total_hits != 1 {
                debug!(rule = %rule.id, "event does not satisfy rule query");
                continue;
            }

            for query in &rule.queries {
                let entry = index_queries.entry(query.index.clone()).or_default();
                if !entry.contains(query) {
                    entry.push(query.clone());
                }
            }
            if timestamp.is_none() {
                timestamp = response
                    .hits
                    .first()
                    .and_then(|hit| hit.field_i64(&matched_query.timestamp_field));
            }
        }

        (index_queries, timestamp)
    }

    /// WindowedFanOut + GraphAssembly: one batched multi-search, one
    /// request per index touched by any surviving rule. Item failures
    /// contribute nothing; duplicate IDs deduplicate through the set.
    async fn fan_out(
        &self,
        input_index: &str,
        event: &str,
        timestamp: i64,
        window_ms: i64,
        index_queries: &BTreeMap<String, Vec<CorrelationQuery>>,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let requests = index_queries
            .iter()
            .map(|(index, queries)| {
                queries::windowed_fan_out(index, input_index, event, timestamp, window_ms, queries)
            })
            .collect();
        let items = self.search.multi_search(requests).await;

        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (target_index, item) in index_queries.keys().zip(items) {
            let response = match item {
                Ok(response) if !response.timed_out => response,
                Ok(_) => {
                    warn!(index = %target_index, "fan-out item timed out, skipped");
                    continue;
                }
                Err(e) => {
                    warn!(index = %target_index, error = %e, "fan-out item failed, skipped");
                    continue;
                }
            };
            for hit in response.hits {
                adjacency.entry(hit.index).or_default().insert(hit.id);
            }
        }
        adjacency
    }
}
