use tracing::debug;

use crate::approvals::store::LeaveDataStore;
use crate::domain::leave::LeaveWindow;
use crate::domain::user::UserProfile;
use crate::errors::StoreError;

/// Spare capacity a teammate needs, in percentage points, to cover a leave.
pub const COVER_MIN_AVAILABILITY_PCT: u32 = 30;

/// Whether a teammate with the given overlapping approved leave and allocation
/// during the window can cover.
pub fn member_can_cover(overlapping_approved_leave: u32, allocation_pct: u32) -> bool {
    let availability = 100u32.saturating_sub(allocation_pct);
    availability > COVER_MIN_AVAILABILITY_PCT && overlapping_approved_leave == 0
}

/// Walks the requester's team in store order and stops at the first member who
/// can cover. Later, possibly better, candidates are never inspected.
///
/// A requester without a profile has no team and therefore no coverage.
pub async fn team_can_cover<S>(
    store: &S,
    requester: Option<&UserProfile>,
    window: &LeaveWindow,
) -> Result<bool, StoreError>
where
    S: LeaveDataStore + ?Sized,
{
    let Some(requester) = requester else {
        return Ok(false);
    };

    for member in store.team_members(requester).await? {
        let overlapping_leave = store.approved_leave_overlapping(&member.user_id, window).await?;
        let allocation = store.allocation_overlapping(&member.user_id, window).await?;

        if member_can_cover(overlapping_leave, allocation) {
            debug!(
                event_name = "leave.approval.coverage_found",
                requester_id = %requester.id,
                cover_user_id = %member.user_id,
                allocation,
                "teammate available to cover leave"
            );
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{member_can_cover, team_can_cover};
    use crate::approvals::store::InMemoryLeaveStore;
    use crate::domain::leave::{LeaveRequest, LeaveRequestId, LeaveStatus, LeaveWindow};
    use crate::domain::user::{UserId, UserProfile};
    use crate::domain::workload::{ProjectAssignment, ProjectId, ProjectPriority};

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).expect("date") + Duration::days(offset)
    }

    fn user(id: &str, department: &str, manager: Option<&str>) -> UserProfile {
        UserProfile {
            id: UserId(id.to_string()),
            department: Some(department.to_string()),
            manager_id: manager.map(|m| UserId(m.to_string())),
        }
    }

    fn allocation(user_id: &str, pct: u32) -> ProjectAssignment {
        ProjectAssignment {
            id: format!("pa-{user_id}"),
            user_id: UserId(user_id.to_string()),
            project_id: ProjectId("atlas".to_string()),
            allocation_percentage: pct,
            start_date: day(-30),
            end_date: day(60),
            project_end_date: day(60),
            project_priority: ProjectPriority::Medium,
        }
    }

    fn approved_leave(user_id: &str, start: i64, end: i64) -> LeaveRequest {
        LeaveRequest {
            id: LeaveRequestId(format!("lr-{user_id}-{start}")),
            user_id: UserId(user_id.to_string()),
            leave_type: "vacation".to_string(),
            start_date: day(start),
            end_date: day(end),
            days_count: (end - start + 1) as u32,
            status: LeaveStatus::Approved,
        }
    }

    #[test]
    fn availability_must_exceed_threshold_without_leave() {
        assert!(member_can_cover(0, 69));
        assert!(!member_can_cover(0, 70));
        assert!(!member_can_cover(1, 0));
        assert!(!member_can_cover(0, 150));
    }

    #[tokio::test]
    async fn first_available_teammate_provides_coverage() {
        let alice = user("alice", "Engineering", Some("john"));
        let store = InMemoryLeaveStore::default()
            .with_user(alice.clone())
            .with_user(user("bob", "Engineering", Some("john")))
            .with_user(user("carol", "Engineering", Some("john")))
            .with_assignment(allocation("bob", 90))
            .with_assignment(allocation("carol", 20));
        let window = LeaveWindow::new(day(10), day(11)).expect("window");

        let covered = team_can_cover(&store, Some(&alice), &window).await.expect("coverage");
        assert!(covered);
    }

    #[tokio::test]
    async fn teammates_on_overlapping_leave_cannot_cover() {
        let alice = user("alice", "Engineering", Some("john"));
        let store = InMemoryLeaveStore::default()
            .with_user(alice.clone())
            .with_user(user("bob", "Engineering", Some("john")))
            .with_leave_request(approved_leave("bob", 11, 15));
        let window = LeaveWindow::new(day(10), day(11)).expect("window");

        let covered = team_can_cover(&store, Some(&alice), &window).await.expect("coverage");
        assert!(!covered);
    }

    #[tokio::test]
    async fn missing_profile_means_no_coverage() {
        let store = InMemoryLeaveStore::default().with_user(user("bob", "Engineering", None));
        let window = LeaveWindow::new(day(10), day(11)).expect("window");

        let covered = team_can_cover(&store, None, &window).await.expect("coverage");
        assert!(!covered);
    }
}
