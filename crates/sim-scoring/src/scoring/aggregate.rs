//! Session-wide aggregation: per-user scores, stable ranking, and task and
//! competency breakdowns.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::catalog::TOP_PERFORMER_CUTOFF;
use super::competency::{competency_scores, task_competency_scores};
use super::domain::{
    CompetencyBreakdown, CompetencyCategory, Participant, SessionId, SessionScoringResult,
    TaskBreakdown, TaskKind, TaskScore, UserId, UserInputs, UserScore,
};
use super::store::{ReportStore, SessionStore, StoreError};
use super::ScoringError;

/// Service composing the task calculators, competency scorer, and ranking
/// over the storage seams. All computed entities are request-scoped; nothing
/// is cached between calls.
pub struct ScoringService<S, R> {
    pub(crate) sessions: Arc<S>,
    pub(crate) reports: Arc<R>,
}

impl<S, R> ScoringService<S, R>
where
    S: SessionStore,
    R: ReportStore,
{
    pub fn new(sessions: Arc<S>, reports: Arc<R>) -> Self {
        Self { sessions, reports }
    }

    /// Score one participant. The returned `rank` is 0; ranks only exist
    /// relative to a full session and are assigned by `session_scores`.
    pub fn user_score(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<UserScore, ScoringError> {
        let participants = self.participants(session)?;
        let participant = participants
            .iter()
            .find(|participant| participant.user_id == *user)
            .ok_or_else(|| ScoringError::UserNotFound {
                session: session.clone(),
                user: user.clone(),
            })?;

        let inputs = self.inputs_for(session, user)?;
        Ok(build_user_score(participant, &inputs))
    }

    /// Score every participant of `session`, rank them, and compute the
    /// session breakdowns. Aborts entirely when the session is unknown.
    pub fn session_scores(
        &self,
        session: &SessionId,
    ) -> Result<SessionScoringResult, ScoringError> {
        let participants = self.participants(session)?;
        let total_participants = participants.len();
        debug!(%session, participants = total_participants, "scoring session");

        let mut user_scores = Vec::with_capacity(total_participants);
        for participant in &participants {
            let inputs = self.inputs_for(session, &participant.user_id)?;
            user_scores.push(build_user_score(participant, &inputs));
        }

        // Stable sort: equal totals keep roster order, which makes the
        // index-based ranks below deterministic and reproducible.
        user_scores.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        for (index, score) in user_scores.iter_mut().enumerate() {
            score.rank = index as u32 + 1;
        }

        let task_breakdown = task_breakdown(&user_scores, total_participants);
        let competency_breakdown = competency_breakdown(&user_scores);

        Ok(SessionScoringResult {
            session_id: session.clone(),
            total_participants,
            user_scores,
            task_breakdown,
            competency_breakdown,
        })
    }

    fn participants(&self, session: &SessionId) -> Result<Vec<Participant>, ScoringError> {
        self.sessions.participants(session).map_err(|err| match err {
            StoreError::NotFound => ScoringError::SessionNotFound(session.clone()),
            other => ScoringError::Store(other),
        })
    }

    /// Batch-fetch everything one user's calculators need, including group
    /// activity exactly once.
    fn inputs_for(&self, session: &SessionId, user: &UserId) -> Result<UserInputs, ScoringError> {
        Ok(UserInputs {
            route: self.sessions.route_submission(session, user)?,
            partner: self.sessions.partner_submission(session, user)?,
            crisis: self.sessions.crisis_submission(session, user)?,
            reactivation: self.sessions.reactivation_submission(session, user)?,
            group: self.sessions.group_activity(session, user)?,
        })
    }
}

fn build_user_score(participant: &Participant, inputs: &UserInputs) -> UserScore {
    let mut task_scores = Vec::new();
    let mut total_score = 0.0;
    let mut max_total_score = 0.0;

    for task in TaskKind::ordered() {
        // Not-attempted tasks are omitted entirely; they contribute to
        // neither total.
        let Some(metric) = super::tasks::task_metric(task, inputs) else {
            continue;
        };
        total_score += metric.score;
        max_total_score += metric.max_score;
        task_scores.push(TaskScore {
            task,
            task_name: task.label().to_string(),
            score: metric.score,
            max_score: metric.max_score,
            percentage: metric.percentage(),
            competency_scores: task_competency_scores(task, inputs),
            details: metric.details,
        });
    }

    let overall_percentage = if max_total_score > 0.0 {
        100.0 * total_score / max_total_score
    } else {
        0.0
    };

    UserScore {
        user_id: participant.user_id.clone(),
        user_name: participant.user_name.clone(),
        total_score,
        max_total_score,
        overall_percentage,
        rank: 0,
        task_scores,
        competency_scores: competency_scores(inputs),
    }
}

fn task_breakdown(
    user_scores: &[UserScore],
    total_participants: usize,
) -> BTreeMap<TaskKind, TaskBreakdown> {
    let mut breakdown = BTreeMap::new();
    for task in TaskKind::ordered() {
        let entries: Vec<&TaskScore> = user_scores
            .iter()
            .filter_map(|user| user.task_scores.iter().find(|score| score.task == task))
            .collect();

        let average_score = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|entry| entry.score).sum::<f64>() / entries.len() as f64
        };
        let max_score = entries
            .iter()
            .map(|entry| entry.max_score)
            .fold(f64::NAN, f64::max);
        let max_score = if max_score.is_nan() { 100.0 } else { max_score };
        let completion_rate = if total_participants > 0 {
            100.0 * entries.len() as f64 / total_participants as f64
        } else {
            0.0
        };

        breakdown.insert(
            task,
            TaskBreakdown {
                average_score,
                max_score,
                completion_rate,
            },
        );
    }
    breakdown
}

fn competency_breakdown(
    user_scores: &[UserScore],
) -> BTreeMap<CompetencyCategory, CompetencyBreakdown> {
    let mut breakdown = BTreeMap::new();
    for category in CompetencyCategory::ordered() {
        let mut total = 0.0;
        let mut count = 0usize;
        let mut top_performers = Vec::new();

        for user in user_scores {
            if let Some(score) = user
                .competency_scores
                .iter()
                .find(|score| score.category == category)
            {
                total += score.score;
                count += 1;
                if score.score >= TOP_PERFORMER_CUTOFF {
                    top_performers.push(user.user_name.clone());
                }
            }
        }

        let average_score = if count > 0 { total / count as f64 } else { 0.0 };
        breakdown.insert(
            category,
            CompetencyBreakdown {
                average_score,
                max_score: 100.0,
                top_performers,
            },
        );
    }
    breakdown
}
