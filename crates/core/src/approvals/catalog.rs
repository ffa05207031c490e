use tracing::error;

use crate::approvals::store::LeaveDataStore;
use crate::domain::approval::ApprovalRule;

/// Read-only view over configured approval rules for operators and audit.
/// Has no influence on verdicts.
pub struct RuleCatalog<S> {
    store: S,
}

impl<S> RuleCatalog<S>
where
    S: LeaveDataStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Active rules, highest priority first. Data-access failures yield an empty
    /// list.
    pub async fn list_active_rules(&self) -> Vec<ApprovalRule> {
        match self.store.active_rules().await {
            Ok(rules) => {
                let mut rules: Vec<_> = rules.into_iter().filter(|rule| rule.active).collect();
                rules.sort_by(|left, right| right.priority.cmp(&left.priority));
                rules
            }
            Err(err) => {
                error!(
                    event_name = "leave.catalog.failed",
                    error = %err,
                    "failed to fetch approval rules"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RuleCatalog;
    use crate::approvals::store::InMemoryLeaveStore;
    use crate::domain::approval::{ApprovalRule, ApprovalRuleId};
    use crate::errors::StoreError;

    fn rule(id: &str, priority: i64, active: bool) -> ApprovalRule {
        ApprovalRule {
            id: ApprovalRuleId(id.to_string()),
            name: format!("rule {id}"),
            rule_type: "auto_approval".to_string(),
            conditions: r#"{"max_days":3}"#.to_string(),
            action: "approve".to_string(),
            priority,
            active,
        }
    }

    #[tokio::test]
    async fn lists_active_rules_by_descending_priority() {
        let store = InMemoryLeaveStore::default()
            .with_rule(rule("low", 10, true))
            .with_rule(rule("retired", 99, false))
            .with_rule(rule("high", 50, true));

        let rules = RuleCatalog::new(store).list_active_rules().await;
        let ids: Vec<_> = rules.iter().map(|rule| rule.id.0.as_str()).collect();

        assert_eq!(ids, ["high", "low"]);
        assert_eq!(rules[0].conditions, r#"{"max_days":3}"#);
    }

    #[tokio::test]
    async fn store_failure_yields_empty_catalog() {
        let store = InMemoryLeaveStore::default()
            .with_rule(rule("high", 50, true))
            .failing(StoreError::DataAccess("no such table: approval_rules".to_string()));

        assert!(RuleCatalog::new(store).list_active_rules().await.is_empty());
    }
}
