pub mod approvals;
pub mod config;
pub mod domain;
pub mod errors;

pub use approvals::catalog::RuleCatalog;
pub use approvals::store::{InMemoryLeaveStore, LeaveDataStore};
pub use approvals::{AutoApprovalEngine, EvaluationRequest};
pub use domain::approval::{ApprovalRule, ApprovalRuleId};
pub use domain::leave::{LeaveHistoryEntry, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveWindow};
pub use domain::user::{TeamMember, UserId, UserProfile};
pub use domain::verdict::{ReasonCode, Verdict};
pub use domain::workload::{ProjectAssignment, ProjectId, ProjectPriority};
pub use errors::{DomainError, EvaluationError, StoreError};
