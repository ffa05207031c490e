use chrono::NaiveDate;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid {field} `{value}` (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("leave window start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("summed allocation percentage exceeds the supported range")]
    AllocationOverflow,
}

/// Errors raised by data-access collaborators.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error("data access failure: {0}")]
    DataAccess(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EvaluationError {
    /// Stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "computation",
            Self::Store(StoreError::NotFound { .. }) => "not_found",
            Self::Store(StoreError::DataAccess(_)) => "data_access",
        }
    }
}
