use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::approval::ApprovalRule;
use crate::domain::leave::{
    LeaveHistoryEntry, LeaveRequest, LeaveRequestId, LeaveStatus, LeaveWindow,
};
use crate::domain::user::{TeamMember, UserId, UserProfile};
use crate::domain::workload::{total_allocation, ProjectAssignment};
use crate::errors::StoreError;

/// Read-only queries the approval engine and rule catalog depend on.
///
/// Every "today"-relative query receives its reference date from the caller so
/// the engine owns the notion of today.
#[async_trait]
pub trait LeaveDataStore: Send + Sync {
    async fn find_leave_request(
        &self,
        id: &LeaveRequestId,
    ) -> Result<Option<LeaveRequest>, StoreError>;

    /// Assignments whose end date is on or after `as_of`, joined with the parent
    /// project's deadline and priority.
    async fn active_assignments(
        &self,
        user_id: &UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<ProjectAssignment>, StoreError>;

    async fn user_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Users sharing the requester's department or manager, excluding the
    /// requester, in stable enumeration order.
    async fn team_members(&self, requester: &UserProfile) -> Result<Vec<TeamMember>, StoreError>;

    async fn approved_leave_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError>;

    async fn allocation_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError>;

    async fn leave_days_since(&self, user_id: &UserId, since: NaiveDate)
        -> Result<u32, StoreError>;

    /// Active approval rules, highest priority first.
    async fn active_rules(&self) -> Result<Vec<ApprovalRule>, StoreError>;
}

/// Store backed by plain vectors. Enumeration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLeaveStore {
    users: Vec<UserProfile>,
    assignments: Vec<ProjectAssignment>,
    leave_requests: Vec<LeaveRequest>,
    history: Vec<LeaveHistoryEntry>,
    rules: Vec<ApprovalRule>,
    failure: Option<StoreError>,
}

impl InMemoryLeaveStore {
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_assignment(mut self, assignment: ProjectAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_leave_request(mut self, request: LeaveRequest) -> Self {
        self.leave_requests.push(request);
        self
    }

    pub fn with_history(mut self, entry: LeaveHistoryEntry) -> Self {
        self.history.push(entry);
        self
    }

    pub fn with_rule(mut self, rule: ApprovalRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Makes every query fail with `error`.
    pub fn failing(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LeaveDataStore for InMemoryLeaveStore {
    async fn find_leave_request(
        &self,
        id: &LeaveRequestId,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        self.check()?;
        Ok(self.leave_requests.iter().find(|request| &request.id == id).cloned())
    }

    async fn active_assignments(
        &self,
        user_id: &UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<ProjectAssignment>, StoreError> {
        self.check()?;
        Ok(self
            .assignments
            .iter()
            .filter(|assignment| &assignment.user_id == user_id && assignment.is_active_on(as_of))
            .cloned()
            .collect())
    }

    async fn user_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.check()?;
        Ok(self.users.iter().find(|user| &user.id == user_id).cloned())
    }

    async fn team_members(&self, requester: &UserProfile) -> Result<Vec<TeamMember>, StoreError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .filter(|user| requester.shares_team_with(user))
            .cloned()
            .map(TeamMember::from)
            .collect())
    }

    async fn approved_leave_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError> {
        self.check()?;
        let count = self
            .leave_requests
            .iter()
            .filter(|request| {
                &request.user_id == user_id
                    && request.status == LeaveStatus::Approved
                    && window.overlaps(request.start_date, request.end_date)
            })
            .count();
        Ok(count as u32)
    }

    async fn allocation_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError> {
        self.check()?;
        let overlapping = self.assignments.iter().filter(|assignment| {
            &assignment.user_id == user_id
                && window.overlaps(assignment.start_date, assignment.end_date)
        });
        total_allocation(overlapping).map_err(|err| StoreError::DataAccess(err.to_string()))
    }

    async fn leave_days_since(
        &self,
        user_id: &UserId,
        since: NaiveDate,
    ) -> Result<u32, StoreError> {
        self.check()?;
        self.history
            .iter()
            .filter(|entry| &entry.user_id == user_id && entry.start_date >= since)
            .try_fold(0u32, |total, entry| total.checked_add(entry.days_count))
            .ok_or_else(|| StoreError::DataAccess("leave day total out of range".to_string()))
    }

    async fn active_rules(&self) -> Result<Vec<ApprovalRule>, StoreError> {
        self.check()?;
        let mut rules: Vec<_> = self.rules.iter().filter(|rule| rule.active).cloned().collect();
        rules.sort_by(|left, right| right.priority.cmp(&left.priority));
        Ok(rules)
    }
}
