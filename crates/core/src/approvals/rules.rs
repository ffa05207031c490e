//! Ordered auto-approval rules.
//!
//! Each rule inspects the evaluation [`Facts`] and either yields a verdict or
//! defers to the next rule. The first verdict wins; when every rule defers the
//! request goes to manager review.

use chrono::NaiveDate;

use crate::domain::leave::LeaveWindow;
use crate::domain::verdict::Verdict;
use crate::domain::workload::{total_allocation, ProjectAssignment, ProjectPriority};
use crate::errors::DomainError;

/// Days after the leave ends during which a deadline still conflicts.
pub const DEADLINE_GRACE_DAYS: i64 = 7;
/// High-priority deadlines this close to today always conflict.
pub const HIGH_PRIORITY_HORIZON_DAYS: i64 = 14;

pub const OVERLOAD_ALLOCATION_PCT: u32 = 100;
pub const OVERLOAD_MAX_DAYS: i64 = 2;

pub const LOW_RISK_MAX_DAYS: i64 = 3;
pub const LOW_RISK_ALLOCATION_CEILING_PCT: u32 = 80;

pub const HISTORY_LOOKBACK_DAYS: i64 = 90;
pub const HISTORY_RECENT_DAYS_CEILING: u32 = 5;
pub const HISTORY_MAX_DAYS: i64 = 5;
pub const HISTORY_ALLOCATION_CEILING_PCT: u32 = 90;

/// Facts a rule needs beyond the requester's own workload, loaded on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fact {
    Coverage,
    History,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facts {
    pub window: LeaveWindow,
    pub today: NaiveDate,
    pub assignments: Vec<ProjectAssignment>,
    pub total_allocation: u32,
    /// `None` until team coverage has been computed.
    pub can_cover: Option<bool>,
    /// `None` until leave history has been loaded.
    pub recent_leave_days: Option<u32>,
}

impl Facts {
    pub fn new(
        window: LeaveWindow,
        today: NaiveDate,
        assignments: Vec<ProjectAssignment>,
    ) -> Result<Self, DomainError> {
        let total_allocation = total_allocation(&assignments)?;
        Ok(Self {
            window,
            today,
            assignments,
            total_allocation,
            can_cover: None,
            recent_leave_days: None,
        })
    }

    pub fn days_count(&self) -> i64 {
        self.window.days_count()
    }

    pub fn history_since(&self) -> NaiveDate {
        self.today - chrono::Duration::days(HISTORY_LOOKBACK_DAYS)
    }

    pub fn is_loaded(&self, fact: Fact) -> bool {
        match fact {
            Fact::Coverage => self.can_cover.is_some(),
            Fact::History => self.recent_leave_days.is_some(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionRule {
    CriticalDeadline,
    OverloadRelief,
    LowRisk,
    GoodHistory,
}

/// Evaluation order. Deadline conflicts veto before any approval path.
pub const PIPELINE: [DecisionRule; 4] = [
    DecisionRule::CriticalDeadline,
    DecisionRule::OverloadRelief,
    DecisionRule::LowRisk,
    DecisionRule::GoodHistory,
];

impl DecisionRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CriticalDeadline => "critical_deadline",
            Self::OverloadRelief => "overload_relief",
            Self::LowRisk => "low_risk",
            Self::GoodHistory => "good_history",
        }
    }

    pub fn requires(&self) -> Option<Fact> {
        match self {
            Self::CriticalDeadline | Self::OverloadRelief => None,
            Self::LowRisk => Some(Fact::Coverage),
            Self::GoodHistory => Some(Fact::History),
        }
    }

    /// Unloaded facts count as unfavourable, so a rule never approves on
    /// missing data.
    pub fn apply(&self, facts: &Facts) -> Option<Verdict> {
        match self {
            Self::CriticalDeadline => {
                let conflicts = facts
                    .assignments
                    .iter()
                    .filter(|assignment| {
                        is_critical_deadline(assignment, &facts.window, facts.today)
                    })
                    .count();
                (conflicts > 0).then(|| Verdict::deadline_conflict(conflicts))
            }
            Self::OverloadRelief => (facts.total_allocation > OVERLOAD_ALLOCATION_PCT
                && facts.days_count() <= OVERLOAD_MAX_DAYS)
                .then(Verdict::overload_relief),
            Self::LowRisk => (facts.days_count() <= LOW_RISK_MAX_DAYS
                && facts.total_allocation < LOW_RISK_ALLOCATION_CEILING_PCT
                && facts.can_cover.unwrap_or(false))
            .then(Verdict::low_risk),
            Self::GoodHistory => {
                let recent = facts.recent_leave_days?;
                (recent < HISTORY_RECENT_DAYS_CEILING
                    && facts.days_count() <= HISTORY_MAX_DAYS
                    && facts.total_allocation < HISTORY_ALLOCATION_CEILING_PCT)
                    .then(Verdict::good_history)
            }
        }
    }
}

/// A project deadline is critical when it falls inside the leave, lands at most
/// [`DEADLINE_GRACE_DAYS`] after it, or belongs to a high-priority project due
/// within [`HIGH_PRIORITY_HORIZON_DAYS`] of today.
pub fn is_critical_deadline(
    assignment: &ProjectAssignment,
    window: &LeaveWindow,
    today: NaiveDate,
) -> bool {
    let deadline = assignment.project_end_date;

    let inside_leave = window.contains(deadline);
    let right_after_leave =
        deadline > window.end() && (deadline - window.end()).num_days() <= DEADLINE_GRACE_DAYS;
    let urgent_high_priority = assignment.project_priority == ProjectPriority::High
        && (deadline - today).num_days() <= HIGH_PRIORITY_HORIZON_DAYS;

    inside_leave || right_after_leave || urgent_high_priority
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{is_critical_deadline, DecisionRule, Facts, PIPELINE};
    use crate::domain::leave::LeaveWindow;
    use crate::domain::user::UserId;
    use crate::domain::verdict::{ReasonCode, Verdict};
    use crate::domain::workload::{ProjectAssignment, ProjectId, ProjectPriority};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("date")
    }

    fn window(start_offset: i64, end_offset: i64) -> LeaveWindow {
        let start = today() + Duration::days(start_offset);
        LeaveWindow::new(start, today() + Duration::days(end_offset)).expect("window")
    }

    /// Pipeline run over fully loaded facts, mirroring the engine loop.
    fn decide(facts: &Facts) -> Verdict {
        PIPELINE
            .iter()
            .find_map(|rule| rule.apply(facts))
            .unwrap_or_else(Verdict::requires_review)
    }

    fn assignment(
        allocation: u32,
        deadline_offset: i64,
        priority: ProjectPriority,
    ) -> ProjectAssignment {
        ProjectAssignment {
            id: format!("pa-{allocation}-{deadline_offset}"),
            user_id: UserId("alice".to_string()),
            project_id: ProjectId("apollo".to_string()),
            allocation_percentage: allocation,
            start_date: today() - Duration::days(30),
            end_date: today() + Duration::days(deadline_offset),
            project_end_date: today() + Duration::days(deadline_offset),
            project_priority: priority,
        }
    }

    fn loaded(
        window: LeaveWindow,
        assignments: Vec<ProjectAssignment>,
        can_cover: bool,
        recent_leave_days: u32,
    ) -> Facts {
        let mut facts = Facts::new(window, today(), assignments).expect("facts");
        facts.can_cover = Some(can_cover);
        facts.recent_leave_days = Some(recent_leave_days);
        facts
    }

    #[test]
    fn deadline_on_either_leave_edge_is_critical() {
        let leave = window(20, 24);

        let on_start = assignment(50, 20, ProjectPriority::Low);
        let on_end = assignment(50, 24, ProjectPriority::Low);
        let day_before = assignment(50, 19, ProjectPriority::Low);

        assert!(is_critical_deadline(&on_start, &leave, today()));
        assert!(is_critical_deadline(&on_end, &leave, today()));
        assert!(!is_critical_deadline(&day_before, &leave, today()));
    }

    #[test]
    fn deadline_within_a_week_after_leave_is_critical() {
        let leave = window(20, 24);

        assert!(is_critical_deadline(&assignment(50, 31, ProjectPriority::Low), &leave, today()));
        assert!(!is_critical_deadline(&assignment(50, 32, ProjectPriority::Low), &leave, today()));
    }

    #[test]
    fn high_priority_deadline_near_today_is_critical() {
        let leave = window(40, 41);

        let due_in = |days, priority| assignment(50, days, priority);

        assert!(is_critical_deadline(&due_in(14, ProjectPriority::High), &leave, today()));
        assert!(!is_critical_deadline(&due_in(15, ProjectPriority::High), &leave, today()));
        assert!(!is_critical_deadline(&due_in(14, ProjectPriority::Medium), &leave, today()));
    }

    #[test]
    fn deadline_veto_wins_over_every_approval_path() {
        let facts = loaded(
            window(20, 20),
            vec![
                assignment(60, 20, ProjectPriority::Low),
                assignment(60, 90, ProjectPriority::Low),
            ],
            true,
            0,
        );

        let verdict = decide(&facts);
        assert_eq!(verdict.reason, ReasonCode::DeadlineConflict);
        assert!(!verdict.approved);
        assert!(DecisionRule::OverloadRelief.apply(&facts).is_some());
    }

    #[test]
    fn overload_relief_requires_strictly_more_than_full_allocation() {
        let at_capacity = loaded(
            window(30, 30),
            vec![
                assignment(60, 90, ProjectPriority::Low),
                assignment(40, 90, ProjectPriority::Low),
            ],
            false,
            10,
        );
        assert_eq!(DecisionRule::OverloadRelief.apply(&at_capacity), None);

        let overloaded = loaded(
            window(30, 31),
            vec![
                assignment(60, 90, ProjectPriority::Low),
                assignment(41, 90, ProjectPriority::Low),
            ],
            false,
            10,
        );
        assert_eq!(decide(&overloaded).reason, ReasonCode::OverloadRelief);

        let too_long = loaded(
            window(30, 32),
            vec![
                assignment(60, 90, ProjectPriority::Low),
                assignment(41, 90, ProjectPriority::Low),
            ],
            false,
            10,
        );
        assert_eq!(DecisionRule::OverloadRelief.apply(&too_long), None);
    }

    #[test]
    fn low_risk_needs_short_leave_light_load_and_coverage() {
        let light = vec![assignment(79, 90, ProjectPriority::Low)];

        let covered = loaded(window(30, 32), light.clone(), true, 10);
        assert_eq!(decide(&covered).reason, ReasonCode::LowRisk);

        let uncovered = loaded(window(30, 32), light.clone(), false, 10);
        assert_eq!(DecisionRule::LowRisk.apply(&uncovered), None);

        let four_days = loaded(window(30, 33), light, true, 10);
        assert_eq!(DecisionRule::LowRisk.apply(&four_days), None);

        let at_ceiling =
            loaded(window(30, 30), vec![assignment(80, 90, ProjectPriority::Low)], true, 10);
        assert_eq!(DecisionRule::LowRisk.apply(&at_ceiling), None);
    }

    #[test]
    fn good_history_thresholds_are_strict_where_stated() {
        let load = vec![assignment(89, 90, ProjectPriority::Low)];

        let five_days = loaded(window(30, 34), load.clone(), false, 4);
        assert_eq!(decide(&five_days).reason, ReasonCode::GoodHistory);

        let six_days = loaded(window(30, 35), load.clone(), false, 4);
        assert_eq!(decide(&six_days).reason, ReasonCode::RequiresReview);

        let busy_history = loaded(window(30, 34), load, false, 5);
        assert_eq!(decide(&busy_history).reason, ReasonCode::RequiresReview);

        let heavy =
            loaded(window(30, 30), vec![assignment(90, 90, ProjectPriority::Low)], false, 0);
        assert_eq!(decide(&heavy).reason, ReasonCode::RequiresReview);
    }

    #[test]
    fn unloaded_facts_never_approve() {
        let facts =
            Facts::new(window(30, 30), today(), vec![assignment(10, 90, ProjectPriority::Low)])
                .expect("facts");

        assert_eq!(DecisionRule::LowRisk.apply(&facts), None);
        assert_eq!(DecisionRule::GoodHistory.apply(&facts), None);
        assert_eq!(decide(&facts).reason, ReasonCode::RequiresReview);
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = PIPELINE.iter().map(DecisionRule::name).collect();
        assert_eq!(names, ["critical_deadline", "overload_relief", "low_risk", "good_history"]);
    }
}
