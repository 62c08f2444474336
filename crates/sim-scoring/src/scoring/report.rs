//! Final report persistence and CSV/JSON export formatting.

use chrono::Utc;
use tracing::info;

use super::aggregate::ScoringService;
use super::catalog::COMPETENCIES;
use super::domain::{Export, ExportFormat, FinalReport, SessionId, UserId};
use super::feedback::generate_feedback;
use super::store::{ReportStore, SessionStore, StoreError};
use super::ScoringError;

impl<S, R> ScoringService<S, R>
where
    S: SessionStore,
    R: ReportStore,
{
    /// Read-or-create the persisted report for `(session, user)`. An existing
    /// report is returned as-is, never recomputed, even if the underlying
    /// submissions have changed since it was written. A lost create race
    /// resolves to whichever report the store accepted first.
    pub fn final_report(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<FinalReport, ScoringError> {
        if let Some(existing) = self.reports.find(session, user)? {
            return Ok(existing);
        }

        let result = self.session_scores(session)?;
        let score = result
            .user_scores
            .into_iter()
            .find(|score| score.user_id == *user)
            .ok_or_else(|| ScoringError::UserNotFound {
                session: session.clone(),
                user: user.clone(),
            })?;

        let feedback = generate_feedback(&score);
        let report = FinalReport {
            session_id: session.clone(),
            user_id: user.clone(),
            total_score: score.total_score,
            rank: score.rank,
            competency_scores: score.competency_scores,
            feedback,
            generated_at: Utc::now(),
        };

        match self.reports.insert(report) {
            Ok(stored) => {
                info!(%session, %user, "final report created");
                Ok(stored)
            }
            // Another writer got there first; the stored report wins.
            Err(StoreError::Conflict) => self
                .reports
                .find(session, user)?
                .ok_or(ScoringError::Store(StoreError::NotFound)),
            Err(other) => Err(other.into()),
        }
    }

    /// Serialize the full session results as CSV or JSON.
    pub fn export(
        &self,
        session: &SessionId,
        format: ExportFormat,
    ) -> Result<Export, ScoringError> {
        let result = self.session_scores(session)?;

        let body = match format {
            ExportFormat::Csv => results_csv(&result)?,
            ExportFormat::Json => serde_json::to_vec_pretty(&result)?,
        };

        Ok(Export {
            content_type: format.content_type(),
            filename: format!("scoring_results_{}.{}", session, format.extension()),
            body,
        })
    }
}

/// Ranked rows, percentages to two decimal places, competency columns in
/// catalog declaration order.
fn results_csv(
    result: &super::domain::SessionScoringResult,
) -> Result<Vec<u8>, ScoringError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "Rank".to_string(),
        "User Name".to_string(),
        "Total Score".to_string(),
        "Overall Percentage".to_string(),
    ];
    header.extend(COMPETENCIES.iter().map(|competency| competency.name.to_string()));
    writer.write_record(&header)?;

    for user in &result.user_scores {
        let mut row = vec![
            user.rank.to_string(),
            user.user_name.clone(),
            format!("{:.2}", user.total_score),
            format!("{:.2}", user.overall_percentage),
        ];
        for competency in &COMPETENCIES {
            let percentage = user
                .competency_scores
                .iter()
                .find(|score| score.category == competency.category)
                .map(|score| score.percentage)
                .unwrap_or(0.0);
            row.push(format!("{percentage:.2}"));
        }
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|err| ScoringError::Export(err.to_string()))
}
