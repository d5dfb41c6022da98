//! Query builders for each engine stage.

use correlate_core::constants::RULE_QUERIES_FIELD;
use correlate_core::models::CorrelationQuery;
use correlate_core::search::{BoolQuery, QueryExpr, SearchRequest};

/// Rule discovery: all rules whose `correlate` list contains an entry
/// for the input index (nested containment).
pub fn rule_discovery(rule_store_index: &str, input_index: &str) -> SearchRequest {
    let field = format!("{RULE_QUERIES_FIELD}.index");
    SearchRequest::new(
        rule_store_index,
        QueryExpr::nested(RULE_QUERIES_FIELD, QueryExpr::match_query(field, input_index)),
    )
}

/// Match validation: does the rule's query, conjoined with an exact-ID
/// filter, match exactly this event? The timestamp field rides along as
/// a field-value fetch so no second round-trip is needed.
pub fn match_validation(input_index: &str, event: &str, query: &CorrelationQuery) -> SearchRequest {
    SearchRequest::new(
        input_index,
        BoolQuery::new()
            .must(QueryExpr::match_query("_id", event))
            .must(QueryExpr::raw(query.query.clone()))
            .build(),
    )
    .fetch_source(false)
    .fetch_field(query.timestamp_field.clone())
}

/// Windowed fan-out for one index: OR across every rule expression
/// touching the index (enforced via minimum_should_match), a hard time
/// range around the input event, and self-exclusion on the input index.
pub fn windowed_fan_out(
    index: &str,
    input_index: &str,
    event: &str,
    timestamp: i64,
    window_ms: i64,
    queries: &[CorrelationQuery],
) -> SearchRequest {
    // All queries of one index share a timestamp field.
    let timestamp_field = queries[0].timestamp_field.clone();

    let mut bool_query = BoolQuery::new()
        .filter(QueryExpr::range(
            timestamp_field,
            timestamp - window_ms,
            timestamp + window_ms,
        ))
        .minimum_should_match(1);

    if index == input_index {
        bool_query = bool_query.must_not(QueryExpr::match_query("_id", event));
    }

    for query in queries {
        bool_query = bool_query.should(QueryExpr::raw(query.query.clone()));
    }

    SearchRequest::new(index, bool_query.build()).fetch_source(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_targets_the_nested_queries_field() {
        let request = rule_discovery(".correlation-rules-config", "app_logs");
        match request.query {
            QueryExpr::Nested { path, .. } => assert_eq!(path, "correlate"),
            other => panic!("expected nested query, got {other:?}"),
        }
    }

    #[test]
    fn validation_fetches_the_timestamp_field_only() {
        let query = CorrelationQuery::new("app_logs", "level:error", "ts");
        let request = match_validation("app_logs", "e1", &query);
        assert!(!request.fetch_source);
        assert_eq!(request.fetch_fields, vec!["ts".to_string()]);
    }

    #[test]
    fn fan_out_excludes_self_only_on_input_index() {
        let queries = vec![CorrelationQuery::new("app_logs", "level:error", "ts")];
        let own = windowed_fan_out("app_logs", "app_logs", "e1", 1000, 50, &queries);
        let other = windowed_fan_out("audit_logs", "app_logs", "e1", 1000, 50, &queries);

        let must_not_len = |request: &SearchRequest| match &request.query {
            QueryExpr::Bool(b) => b.must_not.len(),
            _ => panic!("expected bool query"),
        };
        assert_eq!(must_not_len(&own), 1);
        assert_eq!(must_not_len(&other), 0);
    }

    #[test]
    fn fan_out_window_collapses_to_an_instant_for_zero_window() {
        let queries = vec![CorrelationQuery::new("app_logs", "level:error", "ts")];
        let request = windowed_fan_out("app_logs", "other", "e1", 1000, 0, &queries);
        match &request.query {
            QueryExpr::Bool(b) => match &b.filter[0] {
                QueryExpr::Range { gte, lte, .. } => {
                    assert_eq!((*gte, *lte), (Some(1000), Some(1000)));
                }
                other => panic!("expected range filter, got {other:?}"),
            },
            _ => panic!("expected bool query"),
        }
    }
}
