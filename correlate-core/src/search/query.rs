use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque boolean/nested query algebra understood by search backends.
///
/// `Raw` carries an external query-string expression verbatim; the
/// engine never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryExpr {
    /// Exact value match on a field. `_id` addresses the document ID.
    Term { field: String, value: Value },
    /// Analyzed match on a field. For the backends in this workspace it
    /// behaves like `Term`; kept separate to mirror the wire algebra.
    Match { field: String, value: Value },
    /// Inclusive numeric range filter.
    Range {
        field: String,
        gte: Option<i64>,
        lte: Option<i64>,
    },
    /// Boolean combination of sub-queries.
    Bool(BoolQuery),
    /// Containment query over an array-of-objects field. The inner query
    /// addresses fields as `<path>.<field>` and matches if any element
    /// of the array satisfies it.
    Nested { path: String, query: Box<QueryExpr> },
    /// Verbatim query-string expression, delegated to the backend.
    Raw { expression: String },
}

impl QueryExpr {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryExpr::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn match_query(field: impl Into<String>, value: impl Into<Value>) -> Self {
        QueryExpr::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Inclusive `[gte, lte]` range on a numeric field.
    pub fn range(field: impl Into<String>, gte: i64, lte: i64) -> Self {
        QueryExpr::Range {
            field: field.into(),
            gte: Some(gte),
            lte: Some(lte),
        }
    }

    pub fn nested(path: impl Into<String>, query: QueryExpr) -> Self {
        QueryExpr::Nested {
            path: path.into(),
            query: Box::new(query),
        }
    }

    pub fn raw(expression: impl Into<String>) -> Self {
        QueryExpr::Raw {
            expression: expression.into(),
        }
    }
}

/// Boolean query with chaining constructors, built up clause by clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<QueryExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<QueryExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<QueryExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<QueryExpr>,
    /// Minimum number of `should` clauses a document must satisfy.
    /// `None` leaves the backend default (should clauses advisory when
    /// other clauses are present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: QueryExpr) -> Self {
        self.must.push(query);
        self
    }

    pub fn must_not(mut self, query: QueryExpr) -> Self {
        self.must_not.push(query);
        self
    }

    pub fn should(mut self, query: QueryExpr) -> Self {
        self.should.push(query);
        self
    }

    pub fn filter(mut self, query: QueryExpr) -> Self {
        self.filter.push(query);
        self
    }

    pub fn minimum_should_match(mut self, n: u32) -> Self {
        self.minimum_should_match = Some(n);
        self
    }

    pub fn build(self) -> QueryExpr {
        QueryExpr::Bool(self)
    }
}
