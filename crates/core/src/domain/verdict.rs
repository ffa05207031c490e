use serde::{Deserialize, Serialize};

/// Categorical explanation attached to every verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    DeadlineConflict,
    OverloadRelief,
    LowRisk,
    GoodHistory,
    RequiresReview,
    Error,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 6] = [
        Self::DeadlineConflict,
        Self::OverloadRelief,
        Self::LowRisk,
        Self::GoodHistory,
        Self::RequiresReview,
        Self::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeadlineConflict => "deadline_conflict",
            Self::OverloadRelief => "overload_relief",
            Self::LowRisk => "low_risk",
            Self::GoodHistory => "good_history",
            Self::RequiresReview => "requires_review",
            Self::Error => "error",
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, Self::OverloadRelief | Self::LowRisk | Self::GoodHistory)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one evaluation. The message is user-facing and never carries
/// diagnostic detail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub approved: bool,
    pub message: String,
    pub reason: ReasonCode,
}

impl Verdict {
    fn new(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self { approved: reason.is_approval(), message: message.into(), reason }
    }

    pub fn deadline_conflict(conflicting_assignments: usize) -> Self {
        Self::new(
            ReasonCode::DeadlineConflict,
            format!(
                "Leave request conflicts with {conflicting_assignments} critical project deadline(s). Requires manager approval."
            ),
        )
    }

    pub fn overload_relief() -> Self {
        Self::new(
            ReasonCode::OverloadRelief,
            "Auto-approved: User is overloaded and leave is short duration.",
        )
    }

    pub fn low_risk() -> Self {
        Self::new(
            ReasonCode::LowRisk,
            "Auto-approved: Short leave with low workload and team coverage available.",
        )
    }

    pub fn good_history() -> Self {
        Self::new(
            ReasonCode::GoodHistory,
            "Auto-approved: Reasonable leave request with good leave history.",
        )
    }

    pub fn requires_review() -> Self {
        Self::new(ReasonCode::RequiresReview, "Leave request requires manager approval.")
    }

    pub fn error() -> Self {
        Self::new(
            ReasonCode::Error,
            "Error evaluating leave request. Requires manager approval.",
        )
    }
}
