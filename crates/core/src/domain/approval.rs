use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalRuleId(pub String);

/// Operator-configured approval rule, surfaced for display and audit.
///
/// `conditions` and `action` are opaque configuration and are never
/// interpreted by the decision engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRule {
    pub id: ApprovalRuleId,
    pub name: String,
    pub rule_type: String,
    pub conditions: String,
    pub action: String,
    pub priority: i64,
    pub active: bool,
}
