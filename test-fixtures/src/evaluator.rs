//! `QueryExpr` evaluation against one JSON document.

use correlate_core::search::{BoolQuery, QueryExpr};
use serde_json::Value;

/// Whether `doc` (with store-assigned `doc_id`) satisfies `query`.
pub fn matches(query: &QueryExpr, doc_id: &str, doc: &Value) -> bool {
    matches_scoped(query, doc_id, doc, None)
}

fn matches_scoped(query: &QueryExpr, doc_id: &str, doc: &Value, prefix: Option<&str>) -> bool {
    match query {
        QueryExpr::Term { field, value } | QueryExpr::Match { field, value } => {
            if field == "_id" {
                return value.as_str() == Some(doc_id);
            }
            lookup(doc, field, prefix).is_some_and(|found| value_eq(found, value))
        }
        QueryExpr::Range { field, gte, lte } => lookup(doc, field, prefix)
            .and_then(Value::as_i64)
            .is_some_and(|v| gte.map_or(true, |g| v >= g) && lte.map_or(true, |l| v <= l)),
        QueryExpr::Bool(b) => matches_bool(b, doc_id, doc, prefix),
        QueryExpr::Nested { path, query } => doc
            .get(path)
            .and_then(Value::as_array)
            .is_some_and(|elements| {
                elements
                    .iter()
                    .any(|element| matches_scoped(query, doc_id, element, Some(path)))
            }),
        QueryExpr::Raw { expression } => query_string_matches(expression, doc, prefix),
    }
}

fn matches_bool(b: &BoolQuery, doc_id: &str, doc: &Value, prefix: Option<&str>) -> bool {
    let all = |clauses: &[QueryExpr]| {
        clauses
            .iter()
            .all(|clause| matches_scoped(clause, doc_id, doc, prefix))
    };

    if !all(&b.must) || !all(&b.filter) {
        return false;
    }
    if b.must_not
        .iter()
        .any(|clause| matches_scoped(clause, doc_id, doc, prefix))
    {
        return false;
    }

    if b.should.is_empty() {
        return true;
    }
    // Without other clauses at least one should-clause is required;
    // with them the engine opts in via minimum_should_match.
    let other_clauses = !b.must.is_empty() || !b.filter.is_empty() || !b.must_not.is_empty();
    let needed = b
        .minimum_should_match
        .unwrap_or(if other_clauses { 0 } else { 1 }) as usize;
    let satisfied = b
        .should
        .iter()
        .filter(|clause| matches_scoped(clause, doc_id, doc, prefix))
        .count();
    satisfied >= needed
}

/// Query-string subset: `field:value` clauses joined by `AND`; values
/// may be double-quoted.
fn query_string_matches(expression: &str, doc: &Value, prefix: Option<&str>) -> bool {
    expression.split(" AND ").all(|clause| {
        let Some((field, raw_value)) = clause.trim().split_once(':') else {
            return false;
        };
        let wanted = raw_value.trim().trim_matches('"');
        lookup(doc, field.trim(), prefix).is_some_and(|found| text_eq(found, wanted))
    })
}

/// Resolve a possibly-dotted field path, stripping the nested scope
/// prefix when evaluating inside an array element.
fn lookup<'a>(doc: &'a Value, field: &str, prefix: Option<&str>) -> Option<&'a Value> {
    let effective = match prefix {
        Some(p) => field.strip_prefix(&format!("{p}.")).unwrap_or(field),
        None => field,
    };
    let mut current = doc;
    for segment in effective.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn value_eq(found: &Value, wanted: &Value) -> bool {
    if let Some(elements) = found.as_array() {
        return elements.iter().any(|element| value_eq(element, wanted));
    }
    match (found, wanted) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => found == wanted,
    }
}

fn text_eq(found: &Value, wanted: &str) -> bool {
    match found {
        Value::String(s) => s == wanted,
        Value::Number(n) => wanted.parse::<f64>() == Ok(n.as_f64().unwrap_or(f64::NAN)),
        Value::Bool(b) => wanted.parse::<bool>() == Ok(*b),
        Value::Array(elements) => elements.iter().any(|element| text_eq(element, wanted)),
        _ => false,
    }
}
