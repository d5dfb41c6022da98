use serde_json::{json, Value};

use crate::constants::{NO_ID, NO_VERSION};
use crate::errors::{CorrelationResult, ValidationError};

/// A record in the correlation history store.
///
/// The persisted layout is flat (`root`, `level`, `event1`, `event2`,
/// `corr_vector`, `timestamp`, `index1`, `index2`, `tags`,
/// `score_timestamp`), but in memory the three shapes are a tagged
/// variant so the bootstrap anchors cannot be confused with edges:
///
/// - `Root` — the timestamp anchor written at store bootstrap.
/// - `ScoreRoot` — the scoring anchor (carries `score_timestamp`).
/// - `Edge` — one correlated pair of events, never mutated after write.
///
/// Classification on parse relies on the store-level convention that
/// root records carry empty event IDs; an `Edge` with empty `event1`
/// and `event2` would parse as `ScoreRoot`. Callers must respect the
/// convention when writing.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    Root {
        timestamp: i64,
    },
    ScoreRoot {
        score_timestamp: i64,
    },
    Edge {
        level: i64,
        event1: String,
        event2: String,
        correlation_vector: Vec<f32>,
        timestamp: i64,
        index1: String,
        index2: String,
        tags: Vec<String>,
    },
}

impl Correlation {
    pub fn is_root(&self) -> bool {
        matches!(self, Correlation::Root { .. })
    }

    /// The flat persisted form. Every field is always present so the
    /// store mapping stays uniform across the three shapes.
    pub fn to_source(&self) -> Value {
        match self {
            Correlation::Root { timestamp } => flat_source(true, 0, "", "", &[], *timestamp, "", "", &[], 0),
            Correlation::ScoreRoot { score_timestamp } => {
                flat_source(false, 0, "", "", &[], 0, "", "", &[], *score_timestamp)
            }
            Correlation::Edge {
                level,
                event1,
                event2,
                correlation_vector,
                timestamp,
                index1,
                index2,
                tags,
            } => flat_source(
                false,
                *level,
                event1,
                event2,
                correlation_vector,
                *timestamp,
                index1,
                index2,
                tags,
                0,
            ),
        }
    }

    /// Parse the flat persisted form back into the tagged variant.
    pub fn from_source(source: &Value) -> CorrelationResult<Self> {
        let root = field_bool(source, "root")?;
        let timestamp = field_i64(source, "timestamp")?;
        let score_timestamp = field_i64(source, "score_timestamp")?;
        let event1 = field_str(source, "event1")?;
        let event2 = field_str(source, "event2")?;

        if root {
            return Ok(Correlation::Root { timestamp });
        }
        if event1.is_empty() && event2.is_empty() {
            return Ok(Correlation::ScoreRoot { score_timestamp });
        }

        let correlation_vector = source["corr_vector"]
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .map(|v| {
                        v.as_f64().map(|f| f as f32).ok_or_else(|| {
                            invalid("corr_vector", "non-numeric vector element")
                        })
                    })
                    .collect::<Result<Vec<f32>, ValidationError>>()
            })
            .transpose()?
            .unwrap_or_default();

        let tags = source["tags"]
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(String::from)
                            .ok_or_else(|| invalid("tags", "non-string tag"))
                    })
                    .collect::<Result<Vec<String>, ValidationError>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Correlation::Edge {
            level: field_i64(source, "level")?,
            event1,
            event2,
            correlation_vector,
            timestamp,
            index1: field_str(source, "index1")?,
            index2: field_str(source, "index2")?,
            tags,
        })
    }
}

/// A correlation record together with its store-assigned identity.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationDoc {
    pub id: String,
    pub version: i64,
    pub correlation: Correlation,
}

impl CorrelationDoc {
    pub fn new(correlation: Correlation) -> Self {
        Self {
            id: NO_ID.to_string(),
            version: NO_VERSION,
            correlation,
        }
    }

    pub fn parse(source: &Value, id: &str, version: i64) -> CorrelationResult<Self> {
        Ok(Self {
            id: id.to_string(),
            version,
            correlation: Correlation::from_source(source)?,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn flat_source(
    root: bool,
    level: i64,
    event1: &str,
    event2: &str,
    corr_vector: &[f32],
    timestamp: i64,
    index1: &str,
    index2: &str,
    tags: &[String],
    score_timestamp: i64,
) -> Value {
    json!({
        "root": root,
        "level": level,
        "event1": event1,
        "event2": event2,
        "corr_vector": corr_vector,
        "timestamp": timestamp,
        "index1": index1,
        "index2": index2,
        "tags": tags,
        "score_timestamp": score_timestamp,
    })
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidQuery {
        index: field.to_string(),
        reason: reason.to_string(),
    }
}

fn field_bool(source: &Value, field: &str) -> Result<bool, ValidationError> {
    source[field]
        .as_bool()
        .ok_or_else(|| missing(field))
}

fn field_i64(source: &Value, field: &str) -> Result<i64, ValidationError> {
    source[field]
        .as_i64()
        .ok_or_else(|| missing(field))
}

fn field_str(source: &Value, field: &str) -> Result<String, ValidationError> {
    source[field]
        .as_str()
        .map(String::from)
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> ValidationError {
    ValidationError::InvalidRule {
        reason: format!("correlation record missing field {field}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edge() -> Correlation {
        Correlation::Edge {
            level: 1,
            event1: "e1".to_string(),
            event2: "e2".to_string(),
            correlation_vector: vec![0.5, -1.25, 3.0],
            timestamp: 1_700_000_000_000,
            index1: "app_logs".to_string(),
            index2: "audit_logs".to_string(),
            tags: vec!["auth".to_string()],
        }
    }

    #[test]
    fn edge_round_trips_all_fields() {
        let edge = sample_edge();
        let parsed = Correlation::from_source(&edge.to_source()).unwrap();
        assert_eq!(parsed, edge);
    }

    #[test]
    fn edge_round_trips_empty_vector_and_tags() {
        let edge = Correlation::Edge {
            level: 0,
            event1: "a".to_string(),
            event2: "b".to_string(),
            correlation_vector: vec![],
            timestamp: 42,
            index1: "x".to_string(),
            index2: "y".to_string(),
            tags: vec![],
        };
        let parsed = Correlation::from_source(&edge.to_source()).unwrap();
        assert_eq!(parsed, edge);
    }

    #[test]
    fn roots_are_distinguishable_after_round_trip() {
        let root = Correlation::Root { timestamp: 1234 };
        let score_root = Correlation::ScoreRoot { score_timestamp: 5678 };

        let root_back = Correlation::from_source(&root.to_source()).unwrap();
        let score_back = Correlation::from_source(&score_root.to_source()).unwrap();

        assert_eq!(root_back, root);
        assert_eq!(score_back, score_root);
        assert!(root_back.is_root());
        assert!(!score_back.is_root());
    }

    #[test]
    fn equality_is_structural_over_the_vector() {
        let a = sample_edge();
        let mut b = sample_edge();
        assert_eq!(a, b);
        if let Correlation::Edge { correlation_vector, .. } = &mut b {
            correlation_vector[1] = -1.26;
        }
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_missing_fields() {
        let source = serde_json::json!({"root": false, "timestamp": 1});
        assert!(Correlation::from_source(&source).is_err());
    }

    #[test]
    fn doc_carries_store_identity() {
        let doc = CorrelationDoc::parse(&sample_edge().to_source(), "c-9", 2).unwrap();
        assert_eq!(doc.id, "c-9");
        assert_eq!(doc.version, 2);
        assert_eq!(doc.correlation, sample_edge());
    }
}
