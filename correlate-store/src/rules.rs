//! Validated writes of correlation rule documents.

use std::sync::Arc;

use tracing::info;

use correlate_core::constants::RULE_STORE_INDEX;
use correlate_core::errors::{CorrelationResult, StoreError, ValidationError};
use correlate_core::models::CorrelationRule;
use correlate_core::traits::{DocWriteOutcome, IDocumentStore, IndexSettings};

/// Whether a rule write creates a new document or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

pub struct RuleStore {
    store: Arc<dyn IDocumentStore>,
}

impl RuleStore {
    pub fn new(store: Arc<dyn IDocumentStore>) -> Self {
        Self { store }
    }

    /// Create the hidden rule index if absent. Racing creation is success.
    pub async fn ensure_store_exists(&self) -> CorrelationResult<()> {
        if self.store.index_exists(RULE_STORE_INDEX).await? {
            return Ok(());
        }
        let settings = IndexSettings {
            hidden: true,
            shards: 1,
        };
        match self.store.create_index(RULE_STORE_INDEX, settings).await {
            Ok(()) | Err(StoreError::AlreadyExists { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate and write one rule. `Create` asks the store to assign an
    /// ID; `Update` re-indexes under the rule's existing ID and bumps its
    /// version. Validation failures reject the write before any I/O.
    pub async fn index_rule(
        &self,
        rule: &CorrelationRule,
        mode: WriteMode,
    ) -> CorrelationResult<DocWriteOutcome> {
        validate_rule(rule)?;
        let id = match mode {
            WriteMode::Create => None,
            WriteMode::Update => {
                if !rule.is_persisted() {
                    return Err(ValidationError::InvalidRule {
                        reason: "cannot update a rule that has no identity".to_string(),
                    }
                    .into());
                }
                Some(rule.id.clone())
            }
        };

        let outcome = self
            .store
            .index_doc(RULE_STORE_INDEX, id, rule.to_source()?)
            .await?;
        info!(
            rule = %outcome.id,
            version = outcome.version,
            name = %rule.name,
            "indexed correlation rule"
        );
        Ok(outcome)
    }
}

/// A rule must name itself, relate at least two indices, and every query
/// entry must be fully specified.
fn validate_rule(rule: &CorrelationRule) -> Result<(), ValidationError> {
    if rule.name.trim().is_empty() {
        return Err(ValidationError::InvalidRule {
            reason: "rule name must not be empty".to_string(),
        });
    }
    if rule.queries.len() < 2 {
        return Err(ValidationError::InvalidRule {
            reason: "a rule must relate at least two queries".to_string(),
        });
    }
    for query in &rule.queries {
        if query.index.trim().is_empty() {
            return Err(ValidationError::InvalidQuery {
                index: query.index.clone(),
                reason: "query index must not be empty".to_string(),
            });
        }
        if query.query.trim().is_empty() {
            return Err(ValidationError::InvalidQuery {
                index: query.index.clone(),
                reason: "query expression must not be empty".to_string(),
            });
        }
        if query.timestamp_field.trim().is_empty() {
            return Err(ValidationError::InvalidQuery {
                index: query.index.clone(),
                reason: "timestamp field must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use correlate_core::models::CorrelationQuery;

    fn valid_rule() -> CorrelationRule {
        CorrelationRule::new(
            "app-to-audit",
            vec![
                CorrelationQuery::new("app_logs", "level:error", "ts"),
                CorrelationQuery::new("audit_logs", "action:denied", "ts"),
            ],
        )
    }

    #[test]
    fn accepts_a_fully_specified_rule() {
        assert!(validate_rule(&valid_rule()).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let mut rule = valid_rule();
        rule.name = "  ".to_string();
        assert!(matches!(
            validate_rule(&rule),
            Err(ValidationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn rejects_fewer_than_two_queries() {
        let mut rule = valid_rule();
        rule.queries.truncate(1);
        assert!(matches!(
            validate_rule(&rule),
            Err(ValidationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn rejects_blank_query_fields() {
        for blank in ["index", "query", "timestamp"] {
            let mut rule = valid_rule();
            match blank {
                "index" => rule.queries[1].index.clear(),
                "query" => rule.queries[1].query.clear(),
                _ => rule.queries[1].timestamp_field.clear(),
            }
            assert!(
                matches!(validate_rule(&rule), Err(ValidationError::InvalidQuery { .. })),
                "blank {blank} should be rejected"
            );
        }
    }
}
