use super::domain::{
    CrisisSubmission, FinalReport, GroupActivity, Participant, PartnerSelection,
    ReactivationSequence, RouteCalculation, SessionId, UserId,
};

/// Error enumeration for store failures. Failures propagate upward
/// unmodified; the scoring core never retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only contract with the persistence collaborator. These calls are the
/// only operations that may block; all scoring math is synchronous over the
/// returned data.
pub trait SessionStore: Send + Sync {
    /// Roster for `session`, in the order participants are to be iterated.
    /// `Err(StoreError::NotFound)` when the session does not exist.
    fn participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError>;

    fn route_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<RouteCalculation>, StoreError>;

    fn partner_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<PartnerSelection>, StoreError>;

    fn crisis_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<CrisisSubmission>, StoreError>;

    fn reactivation_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<ReactivationSequence>, StoreError>;

    /// Aggregated round-two group signals for one user; all-zero counts when
    /// the user never joined a group.
    fn group_activity(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<GroupActivity, StoreError>;
}

/// Storage seam for persisted final reports. Uniqueness of
/// `(session, user)` is the store's responsibility; `insert` answers
/// `Err(StoreError::Conflict)` when a report already exists so a create race
/// resolves to the first writer.
pub trait ReportStore: Send + Sync {
    fn find(&self, session: &SessionId, user: &UserId) -> Result<Option<FinalReport>, StoreError>;

    fn insert(&self, report: FinalReport) -> Result<FinalReport, StoreError>;
}
