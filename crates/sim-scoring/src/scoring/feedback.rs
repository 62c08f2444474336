//! Per-competency feedback selection at four threshold bands.
//!
//! The generator branches on `EXCELLENT`, `GOOD`, and `SATISFACTORY` only;
//! everything below `SATISFACTORY` gets improvement-only feedback. The
//! `NEEDS_IMPROVEMENT` threshold is published for consumers but never
//! branched on here.

use super::catalog::{feedback_template, thresholds, GENERIC_IMPROVEMENT};
use super::domain::{CompetencyFeedback, CompetencyScore, UserScore};

/// One feedback entry per competency in `user.competency_scores`.
pub fn generate_feedback(user: &UserScore) -> Vec<CompetencyFeedback> {
    user.competency_scores.iter().map(feedback_for).collect()
}

fn feedback_for(score: &CompetencyScore) -> CompetencyFeedback {
    let template = feedback_template(score.category);
    let (strengths, improvements) = if score.percentage >= thresholds::EXCELLENT {
        (
            to_strings(&template.strengths),
            vec![GENERIC_IMPROVEMENT.to_string()],
        )
    } else if score.percentage >= thresholds::GOOD {
        (
            to_strings(&template.strengths[..2]),
            to_strings(&template.improvements[..1]),
        )
    } else if score.percentage >= thresholds::SATISFACTORY {
        (
            to_strings(&template.strengths[..1]),
            to_strings(&template.improvements[..2]),
        )
    } else {
        (Vec::new(), to_strings(&template.improvements))
    };

    CompetencyFeedback {
        competency_id: score.competency_id.clone(),
        competency_name: score.competency_name.clone(),
        category: score.category,
        score: score.score,
        max_score: score.max_score,
        percentage: score.percentage,
        strengths,
        areas_for_improvement: improvements,
        specific_examples: score.evidence.clone(),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
