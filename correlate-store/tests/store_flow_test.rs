//! Lifecycle, rule-write, and history flows against the in-memory backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;

use correlate_core::config::VectorIndexConfig;
use correlate_core::constants::{HISTORY_STORE_INDEX, RULE_STORE_INDEX};
use correlate_core::errors::CorrelationError;
use correlate_core::models::{Correlation, CorrelationQuery, CorrelationRule};
use correlate_core::search::{QueryExpr, SearchRequest};
use correlate_core::traits::ISearchService;
use correlate_store::{HistoryStore, HistoryStoreManager, RuleStore, WriteMode};
use test_fixtures::InMemoryBackend;

fn backend() -> Arc<InMemoryBackend> {
    test_fixtures::init_tracing();
    Arc::new(InMemoryBackend::new())
}

fn history(backend: &Arc<InMemoryBackend>) -> HistoryStore {
    HistoryStore::new(
        backend.clone(),
        backend.clone(),
        VectorIndexConfig {
            dimension: 3,
            m: 8,
            ef_construction: 32,
        },
    )
}

fn adjacency(entries: &[(&str, &[&str])]) -> BTreeMap<String, BTreeSet<String>> {
    entries
        .iter()
        .map(|(index, events)| {
            (
                index.to_string(),
                events.iter().map(|e| e.to_string()).collect(),
            )
        })
        .collect()
}

#[tokio::test]
async fn history_store_creation_is_idempotent() {
    let backend = backend();
    let manager = HistoryStoreManager::new(backend.clone(), 3);

    assert!(manager.ensure_store_exists().await.unwrap());
    assert!(!manager.ensure_store_exists().await.unwrap());

    let settings = backend.index_settings(HISTORY_STORE_INDEX).unwrap();
    assert!(settings.hidden);
    assert_eq!(settings.shards, 3);
    assert_eq!(backend.doc_count(HISTORY_STORE_INDEX), 0);
}

#[tokio::test]
async fn bootstrap_writes_two_distinguishable_roots() {
    let backend = backend();
    let manager = HistoryStoreManager::new(backend.clone(), 1);
    manager.ensure_store_exists().await.unwrap();
    manager.bootstrap(987_654).await.unwrap();

    assert_eq!(backend.doc_count(HISTORY_STORE_INDEX), 2);

    let roots = backend
        .search(SearchRequest::new(
            HISTORY_STORE_INDEX,
            QueryExpr::term("root", true),
        ))
        .await
        .unwrap();
    assert_eq!(roots.total_hits, 1);
    let record = Correlation::from_source(roots.hits[0].source.as_ref().unwrap()).unwrap();
    assert!(record.is_root());

    let score_roots = backend
        .search(SearchRequest::new(
            HISTORY_STORE_INDEX,
            QueryExpr::term("score_timestamp", 987_654),
        ))
        .await
        .unwrap();
    assert_eq!(score_roots.total_hits, 1);
    let record = Correlation::from_source(score_roots.hits[0].source.as_ref().unwrap()).unwrap();
    assert_eq!(record, Correlation::ScoreRoot { score_timestamp: 987_654 });
}

#[tokio::test]
async fn rule_create_then_update_bumps_version() {
    let backend = backend();
    let rules = RuleStore::new(backend.clone());
    rules.ensure_store_exists().await.unwrap();

    let mut rule = CorrelationRule::new(
        "app-to-audit",
        vec![
            CorrelationQuery::new("app_logs", "level:error", "ts"),
            CorrelationQuery::new("audit_logs", "action:denied", "ts"),
        ],
    );

    let created = rules.index_rule(&rule, WriteMode::Create).await.unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.version, 1);

    rule.id = created.id.clone();
    rule.name = "app-to-audit-v2".to_string();
    let updated = rules.index_rule(&rule, WriteMode::Update).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 2);
    assert_eq!(backend.doc_count(RULE_STORE_INDEX), 1);
}

#[tokio::test]
async fn update_of_an_unpersisted_rule_is_rejected() {
    let backend = backend();
    let rules = RuleStore::new(backend.clone());
    rules.ensure_store_exists().await.unwrap();

    let rule = CorrelationRule::new(
        "app-to-audit",
        vec![
            CorrelationQuery::new("app_logs", "level:error", "ts"),
            CorrelationQuery::new("audit_logs", "action:denied", "ts"),
        ],
    );
    let err = rules.index_rule(&rule, WriteMode::Update).await.unwrap_err();
    assert!(matches!(err, CorrelationError::Validation(_)));
    assert_eq!(backend.doc_count(RULE_STORE_INDEX), 0);
}

#[tokio::test]
async fn invalid_rule_never_reaches_the_store() {
    let backend = backend();
    let rules = RuleStore::new(backend.clone());
    rules.ensure_store_exists().await.unwrap();

    let single_query = CorrelationRule::new(
        "lonely",
        vec![CorrelationQuery::new("app_logs", "level:error", "ts")],
    );
    let err = rules
        .index_rule(&single_query, WriteMode::Create)
        .await
        .unwrap_err();
    assert!(matches!(err, CorrelationError::Validation(_)));
    assert_eq!(backend.doc_count(RULE_STORE_INDEX), 0);
}

#[tokio::test]
async fn stored_edges_cover_the_whole_adjacency() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let outcomes = history
        .store_correlations(
            "app_logs",
            "e1",
            Utc::now().timestamp_millis(),
            &adjacency(&[("audit_logs", &["e2", "e3"]), ("net_logs", &["e4"])]),
            &["auth".to_string()],
            Some(&[0.1, 0.2, 0.3]),
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(backend.doc_count(HISTORY_STORE_INDEX), 3);
}

#[tokio::test]
async fn empty_adjacency_writes_nothing() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let outcomes = history
        .store_correlations("app_logs", "e1", 1_000, &BTreeMap::new(), &[], None)
        .await
        .unwrap();
    assert!(outcomes.is_empty());
    assert_eq!(backend.doc_count(HISTORY_STORE_INDEX), 0);
}

#[tokio::test]
async fn wrong_vector_dimension_is_rejected_before_any_write() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let err = history
        .store_correlations(
            "app_logs",
            "e1",
            1_000,
            &adjacency(&[("audit_logs", &["e2"])]),
            &[],
            Some(&[0.1, 0.2]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CorrelationError::Codec(_)));
    assert_eq!(backend.doc_count(HISTORY_STORE_INDEX), 0);
}

#[tokio::test]
async fn correlated_events_project_the_opposite_end() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let now = Utc::now().timestamp_millis();
    history
        .store_correlations(
            "app_logs",
            "e1",
            now,
            &adjacency(&[("audit_logs", &["e2"])]),
            &["auth".to_string()],
            None,
        )
        .await
        .unwrap();

    // Forward: the input event sees its neighbor.
    let from_input = history
        .search_correlated_events("app_logs", "e1", 60_000, 10)
        .await
        .unwrap();
    assert_eq!(from_input.len(), 1);
    assert_eq!(from_input[0].index, "audit_logs");
    assert_eq!(from_input[0].event, "e2");
    assert_eq!(from_input[0].tags, vec!["auth".to_string()]);

    // Reverse: the neighbor sees the input event through the same edge.
    let from_neighbor = history
        .search_correlated_events("audit_logs", "e2", 60_000, 10)
        .await
        .unwrap();
    assert_eq!(from_neighbor.len(), 1);
    assert_eq!(from_neighbor[0].index, "app_logs");
    assert_eq!(from_neighbor[0].event, "e1");
}

#[tokio::test]
async fn correlated_events_respect_window_and_cap() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let now = Utc::now().timestamp_millis();
    history
        .store_correlations(
            "app_logs",
            "e1",
            now,
            &adjacency(&[("audit_logs", &["e2", "e3", "e4"])]),
            &[],
            None,
        )
        .await
        .unwrap();
    // An old edge outside any reasonable window.
    history
        .store_correlations(
            "app_logs",
            "e1",
            now - 3_600_000,
            &adjacency(&[("net_logs", &["e9"])]),
            &[],
            None,
        )
        .await
        .unwrap();

    let capped = history
        .search_correlated_events("app_logs", "e1", 60_000, 2)
        .await
        .unwrap();
    assert_eq!(capped.len(), 2);

    let windowed = history
        .search_correlated_events("app_logs", "e1", 60_000, 10)
        .await
        .unwrap();
    assert_eq!(windowed.len(), 3);
    assert!(windowed.iter().all(|e| e.index == "audit_logs"));
}

#[tokio::test]
async fn similar_correlations_rank_by_vector_similarity() {
    let backend = backend();
    backend.seed_index(HISTORY_STORE_INDEX);
    let history = history(&backend);

    let now = Utc::now().timestamp_millis();
    let close = history
        .store_correlations(
            "app_logs",
            "e1",
            now,
            &adjacency(&[("audit_logs", &["e2"])]),
            &[],
            Some(&[1.0, 0.0, 0.0]),
        )
        .await
        .unwrap();
    let far = history
        .store_correlations(
            "app_logs",
            "e3",
            now,
            &adjacency(&[("audit_logs", &["e4"])]),
            &[],
            Some(&[0.0, 0.0, 1.0]),
        )
        .await
        .unwrap();

    let hits = history.similar_correlations(&[0.9, 0.1, 0.0], 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, close[0].id);
    assert_eq!(hits[1].0, far[0].id);
    assert!(hits[0].1 > hits[1].1);
}

#[tokio::test]
async fn root_records_never_surface_as_correlated_events() {
    let backend = backend();
    let manager = HistoryStoreManager::new(backend.clone(), 1);
    manager.ensure_store_exists().await.unwrap();
    manager.bootstrap(Utc::now().timestamp_millis()).await.unwrap();

    let history = history(&backend);
    let events = history
        .search_correlated_events("app_logs", "e1", 60_000, 10)
        .await
        .unwrap();
    assert!(events.is_empty());
}
