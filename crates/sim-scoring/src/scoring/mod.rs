//! Deterministic scoring pipeline for simulation sessions: task metric
//! calculators, competency rollup, ranking, feedback, and report export.

pub mod aggregate;
pub mod catalog;
pub mod competency;
pub mod domain;
pub mod feedback;
pub mod report;
pub mod store;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use aggregate::ScoringService;
pub use domain::{
    CompetencyBreakdown, CompetencyCategory, CompetencyFeedback, CompetencyScore,
    CrisisSubmission, Export, ExportFormat, FinalReport, GroupActivity, Participant,
    PartnerSelection, ReactivationSequence, RiskLevel, RouteCalculation, SessionId,
    SessionScoringResult, TaskBreakdown, TaskKind, TaskScore, UserId, UserInputs, UserScore,
};
pub use store::{ReportStore, SessionStore, StoreError};

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("user {user} not found in session {session}")]
    UserNotFound { session: SessionId, user: UserId },
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export buffer unavailable: {0}")]
    Export(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<domain::UnknownFormat> for ScoringError {
    fn from(value: domain::UnknownFormat) -> Self {
        Self::UnsupportedFormat(value.0)
    }
}
