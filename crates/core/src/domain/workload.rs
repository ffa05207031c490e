use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    High,
    Medium,
    Low,
}

impl ProjectPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Unknown tiers are read as `Medium`, the column default.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

/// A user's assignment to a project, joined with the parent project's deadline
/// and priority as of evaluation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    pub id: String,
    pub user_id: UserId,
    pub project_id: ProjectId,
    pub allocation_percentage: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project_end_date: NaiveDate,
    pub project_priority: ProjectPriority,
}

impl ProjectAssignment {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.end_date >= date
    }
}

/// Summed allocation across assignments; may exceed 100 when overcommitted.
pub fn total_allocation<'a>(
    assignments: impl IntoIterator<Item = &'a ProjectAssignment>,
) -> Result<u32, DomainError> {
    sum_allocations(assignments.into_iter().map(|assignment| assignment.allocation_percentage))
}

fn sum_allocations(percentages: impl IntoIterator<Item = u32>) -> Result<u32, DomainError> {
    percentages
        .into_iter()
        .try_fold(0u32, |total, pct| total.checked_add(pct))
        .ok_or(DomainError::AllocationOverflow)
}
