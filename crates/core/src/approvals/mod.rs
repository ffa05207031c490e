//! Auto-approval decision engine for leave requests.
//!
//! The engine gathers the requester's workload, team and leave history through
//! a [`LeaveDataStore`], then runs the ordered [`rules::PIPELINE`]. It never
//! fails outward: any error becomes an `error` verdict that routes the request
//! to a manager.

pub mod catalog;
pub mod coverage;
pub mod rules;
pub mod store;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::leave::{LeaveRequestId, LeaveWindow};
use crate::domain::user::{UserId, UserProfile};
use crate::domain::verdict::Verdict;
use crate::errors::{EvaluationError, StoreError};

use self::coverage::team_can_cover;
use self::rules::{Fact, Facts, PIPELINE};
use self::store::LeaveDataStore;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub leave_request_id: LeaveRequestId,
    pub user_id: UserId,
    pub window: LeaveWindow,
}

pub struct AutoApprovalEngine<S> {
    store: S,
    reference_date: Option<NaiveDate>,
}

impl<S> AutoApprovalEngine<S>
where
    S: LeaveDataStore,
{
    pub fn new(store: S) -> Self {
        Self { store, reference_date: None }
    }

    /// Evaluates as if today were `date` instead of the current UTC date.
    pub fn pinned_to(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Verdict {
        let today = self.today();
        let outcome = match self.lookup_request(&request.leave_request_id).await {
            Ok(()) => self.decide(request, today).await,
            Err(err) => Err(err),
        };
        self.finish(&request.leave_request_id, Some(&request.user_id), outcome)
    }

    /// Evaluates raw ISO-8601 dates. Malformed or reversed dates produce the
    /// `error` verdict.
    pub async fn evaluate_iso(
        &self,
        leave_request_id: LeaveRequestId,
        user_id: UserId,
        start_date: &str,
        end_date: &str,
    ) -> Verdict {
        match LeaveWindow::parse(start_date, end_date) {
            Ok(window) => {
                self.evaluate(&EvaluationRequest { leave_request_id, user_id, window }).await
            }
            Err(err) => self.finish(&leave_request_id, Some(&user_id), Err(err.into())),
        }
    }

    /// Loads a stored request and evaluates it with its own requester and dates.
    pub async fn evaluate_stored(&self, leave_request_id: &LeaveRequestId) -> Verdict {
        let today = self.today();
        let loaded = match self.store.find_leave_request(leave_request_id).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(EvaluationError::from(StoreError::NotFound {
                entity: "leave request",
                id: leave_request_id.0.clone(),
            })),
            Err(err) => Err(err.into()),
        };

        let stored = match loaded {
            Ok(stored) => stored,
            Err(err) => {
                return self.finish(leave_request_id, None, Err(err));
            }
        };

        let outcome = match stored.window() {
            Ok(window) => {
                let request = EvaluationRequest {
                    leave_request_id: stored.id.clone(),
                    user_id: stored.user_id.clone(),
                    window,
                };
                self.decide(&request, today).await
            }
            Err(err) => Err(err.into()),
        };
        self.finish(leave_request_id, Some(&stored.user_id), outcome)
    }

    /// A missing request does not stop evaluation.
    async fn lookup_request(&self, id: &LeaveRequestId) -> Result<(), EvaluationError> {
        if self.store.find_leave_request(id).await?.is_none() {
            warn!(
                event_name = "leave.approval.request_missing",
                leave_request_id = %id,
                "leave request not found; evaluating supplied dates"
            );
        }
        Ok(())
    }

    async fn decide(
        &self,
        request: &EvaluationRequest,
        today: NaiveDate,
    ) -> Result<Verdict, EvaluationError> {
        let assignments = self.store.active_assignments(&request.user_id, today).await?;
        let profile = self.store.user_profile(&request.user_id).await?;
        if profile.is_none() {
            warn!(
                event_name = "leave.approval.profile_missing",
                user_id = %request.user_id,
                "requester profile not found; treating team as empty"
            );
        }

        let mut facts = Facts::new(request.window, today, assignments)?;

        for rule in PIPELINE {
            if let Some(fact) = rule.requires() {
                if !facts.is_loaded(fact) {
                    self.load_fact(&mut facts, fact, request, profile.as_ref()).await?;
                }
            }

            if let Some(verdict) = rule.apply(&facts) {
                debug!(
                    event_name = "leave.approval.rule_matched",
                    leave_request_id = %request.leave_request_id,
                    rule = rule.name(),
                    total_allocation = facts.total_allocation,
                    days_count = facts.days_count(),
                    can_cover = ?facts.can_cover,
                    recent_leave_days = ?facts.recent_leave_days,
                    "approval rule matched"
                );
                return Ok(verdict);
            }
        }

        debug!(
            event_name = "leave.approval.no_rule_matched",
            leave_request_id = %request.leave_request_id,
            total_allocation = facts.total_allocation,
            days_count = facts.days_count(),
            can_cover = ?facts.can_cover,
            recent_leave_days = ?facts.recent_leave_days,
            "no approval rule matched"
        );
        Ok(Verdict::requires_review())
    }

    async fn load_fact(
        &self,
        facts: &mut Facts,
        fact: Fact,
        request: &EvaluationRequest,
        profile: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        match fact {
            Fact::Coverage => {
                let covered = team_can_cover(&self.store, profile, &request.window).await?;
                facts.can_cover = Some(covered);
            }
            Fact::History => {
                let since = facts.history_since();
                facts.recent_leave_days =
                    Some(self.store.leave_days_since(&request.user_id, since).await?);
            }
        }
        Ok(())
    }

    fn finish(
        &self,
        leave_request_id: &LeaveRequestId,
        user_id: Option<&UserId>,
        outcome: Result<Verdict, EvaluationError>,
    ) -> Verdict {
        match outcome {
            Ok(verdict) => {
                info!(
                    event_name = "leave.approval.evaluated",
                    leave_request_id = %leave_request_id,
                    user_id = user_id.map(UserId::as_str),
                    approved = verdict.approved,
                    reason = %verdict.reason,
                    "leave request evaluated"
                );
                verdict
            }
            Err(err) => {
                error!(
                    event_name = "leave.approval.failed",
                    leave_request_id = %leave_request_id,
                    user_id = user_id.map(UserId::as_str),
                    error_kind = err.kind(),
                    error = %err,
                    "auto-approval evaluation failed; routing to manager"
                );
                Verdict::error()
            }
        }
    }
}
