use async_trait::async_trait;
use chrono::NaiveDate;

use leavegate_core::approvals::store::LeaveDataStore;
use leavegate_core::domain::approval::{ApprovalRule, ApprovalRuleId};
use leavegate_core::domain::leave::{LeaveRequest, LeaveRequestId, LeaveStatus, LeaveWindow};
use leavegate_core::domain::user::{TeamMember, UserId, UserProfile};
use leavegate_core::domain::workload::{ProjectAssignment, ProjectId, ProjectPriority};
use leavegate_core::errors::StoreError;

use super::{column, count_column, date_column, RepositoryError};
use crate::DbPool;

/// SQLite-backed data access for the approval engine and rule catalog.
///
/// Dates are stored as `YYYY-MM-DD` text, so range predicates compare
/// lexicographically.
#[derive(Clone)]
pub struct SqlLeaveStore {
    pool: DbPool,
}

impl SqlLeaveStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn row_to_leave_request(row: &sqlx::sqlite::SqliteRow) -> Result<LeaveRequest, RepositoryError> {
    let id: String = column(row, "id")?;
    let user_id: String = column(row, "user_id")?;
    let status: String = column(row, "status")?;

    Ok(LeaveRequest {
        id: LeaveRequestId(id),
        user_id: UserId(user_id),
        leave_type: column(row, "leave_type")?,
        start_date: date_column(row, "start_date")?,
        end_date: date_column(row, "end_date")?,
        days_count: count_column(row, "days_count")?,
        status: LeaveStatus::parse(&status),
    })
}

fn row_to_assignment(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectAssignment, RepositoryError> {
    let user_id: String = column(row, "user_id")?;
    let project_id: String = column(row, "project_id")?;
    let priority: String = column(row, "project_priority")?;

    Ok(ProjectAssignment {
        id: column(row, "id")?,
        user_id: UserId(user_id),
        project_id: ProjectId(project_id),
        allocation_percentage: count_column(row, "allocation_percentage")?,
        start_date: date_column(row, "start_date")?,
        end_date: date_column(row, "end_date")?,
        project_end_date: date_column(row, "project_end_date")?,
        project_priority: ProjectPriority::parse(&priority),
    })
}

fn row_to_rule(row: &sqlx::sqlite::SqliteRow) -> Result<ApprovalRule, RepositoryError> {
    let id: String = column(row, "id")?;
    let active: i64 = column(row, "active")?;

    Ok(ApprovalRule {
        id: ApprovalRuleId(id),
        name: column(row, "rule_name")?,
        rule_type: column(row, "rule_type")?,
        conditions: column(row, "conditions")?,
        action: column(row, "action")?,
        priority: column(row, "priority")?,
        active: active != 0,
    })
}

impl SqlLeaveStore {
    async fn fetch_leave_request(
        &self,
        id: &LeaveRequestId,
    ) -> Result<Option<LeaveRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, leave_type, start_date, end_date, days_count, status
             FROM leave_requests WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_leave_request).transpose()
    }

    async fn fetch_active_assignments(
        &self,
        user_id: &UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<ProjectAssignment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT pa.id, pa.user_id, pa.project_id, pa.allocation_percentage,
                    pa.start_date, pa.end_date,
                    p.end_date AS project_end_date, p.priority AS project_priority
             FROM project_assignments pa
             JOIN projects p ON p.id = pa.project_id
             WHERE pa.user_id = ? AND pa.end_date >= ?
             ORDER BY pa.rowid",
        )
        .bind(&user_id.0)
        .bind(iso(as_of))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_assignment).collect()
    }

    async fn fetch_user_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query("SELECT id, department, manager_id FROM users WHERE id = ?")
            .bind(&user_id.0)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = column(&row, "id")?;
        let manager_id: Option<String> = column(&row, "manager_id")?;

        Ok(Some(UserProfile {
            id: UserId(id),
            department: column(&row, "department")?,
            manager_id: manager_id.map(UserId),
        }))
    }

    async fn fetch_team_members(
        &self,
        requester: &UserProfile,
    ) -> Result<Vec<TeamMember>, RepositoryError> {
        // NULL department or manager never matches, mirroring the domain rule.
        let rows = sqlx::query(
            "SELECT id, department, manager_id FROM users
             WHERE (department = ? OR manager_id = ?) AND id != ?
             ORDER BY rowid",
        )
        .bind(requester.department.as_deref())
        .bind(requester.manager_id.as_ref().map(|manager| manager.0.as_str()))
        .bind(&requester.id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = column(row, "id")?;
                let manager_id: Option<String> = column(row, "manager_id")?;
                Ok::<_, RepositoryError>(TeamMember {
                    user_id: UserId(id),
                    department: column(row, "department")?,
                    manager_id: manager_id.map(UserId),
                })
            })
            .collect()
    }

    async fn count_approved_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS leave_count FROM leave_requests
             WHERE user_id = ? AND status = 'approved' AND start_date <= ? AND end_date >= ?",
        )
        .bind(&user_id.0)
        .bind(iso(window.end()))
        .bind(iso(window.start()))
        .fetch_one(&self.pool)
        .await?;

        count_column(&row, "leave_count")
    }

    async fn sum_allocation_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, RepositoryError> {
        let row = sqlx::query(
            "SELECT SUM(allocation_percentage) AS total_allocation FROM project_assignments
             WHERE user_id = ? AND start_date <= ? AND end_date >= ?",
        )
        .bind(&user_id.0)
        .bind(iso(window.end()))
        .bind(iso(window.start()))
        .fetch_one(&self.pool)
        .await?;

        let total: Option<i64> = column(&row, "total_allocation")?;
        u32::try_from(total.unwrap_or(0))
            .map_err(|_| RepositoryError::Decode("total_allocation out of range".to_string()))
    }

    async fn sum_leave_days_since(
        &self,
        user_id: &UserId,
        since: NaiveDate,
    ) -> Result<u32, RepositoryError> {
        let row = sqlx::query(
            "SELECT SUM(days_count) AS total_days FROM leave_history
             WHERE user_id = ? AND start_date >= ?",
        )
        .bind(&user_id.0)
        .bind(iso(since))
        .fetch_one(&self.pool)
        .await?;

        let total: Option<i64> = column(&row, "total_days")?;
        u32::try_from(total.unwrap_or(0))
            .map_err(|_| RepositoryError::Decode("total_days out of range".to_string()))
    }

    async fn fetch_active_rules(&self) -> Result<Vec<ApprovalRule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, rule_name, rule_type, conditions, action, priority, active
             FROM approval_rules
             WHERE active = 1
             ORDER BY priority DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_rule).collect()
    }
}

#[async_trait]
impl LeaveDataStore for SqlLeaveStore {
    async fn find_leave_request(
        &self,
        id: &LeaveRequestId,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.fetch_leave_request(id).await?)
    }

    async fn active_assignments(
        &self,
        user_id: &UserId,
        as_of: NaiveDate,
    ) -> Result<Vec<ProjectAssignment>, StoreError> {
        Ok(self.fetch_active_assignments(user_id, as_of).await?)
    }

    async fn user_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.fetch_user_profile(user_id).await?)
    }

    async fn team_members(&self, requester: &UserProfile) -> Result<Vec<TeamMember>, StoreError> {
        Ok(self.fetch_team_members(requester).await?)
    }

    async fn approved_leave_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError> {
        Ok(self.count_approved_overlapping(user_id, window).await?)
    }

    async fn allocation_overlapping(
        &self,
        user_id: &UserId,
        window: &LeaveWindow,
    ) -> Result<u32, StoreError> {
        Ok(self.sum_allocation_overlapping(user_id, window).await?)
    }

    async fn leave_days_since(
        &self,
        user_id: &UserId,
        since: NaiveDate,
    ) -> Result<u32, StoreError> {
        Ok(self.sum_leave_days_since(user_id, since).await?)
    }

    async fn active_rules(&self) -> Result<Vec<ApprovalRule>, StoreError> {
        Ok(self.fetch_active_rules().await?)
    }
}
