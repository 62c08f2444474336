//! Per-task-kind metric calculators. Each calculator is a pure function from
//! already-fetched inputs to a bounded score plus a diagnostics payload; a
//! missing submission means "not attempted" and yields `None`, never a zero.

use serde_json::json;
use std::collections::BTreeMap;

use super::catalog::{PARTNER_SCORE_SCALE, ROUTE_SCORE_CEILING};
use super::domain::{TaskKind, UserInputs};

/// Raw metric for one attempted task, before competency mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskMetric {
    pub score: f64,
    pub max_score: f64,
    pub details: serde_json::Value,
}

impl TaskMetric {
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            100.0 * self.score / self.max_score
        } else {
            0.0
        }
    }
}

/// Compute the metric for `task`, or `None` when the user did not attempt it.
/// Group tasks with zero joined groups count as not attempted.
pub fn task_metric(task: TaskKind, inputs: &UserInputs) -> Option<TaskMetric> {
    match task {
        TaskKind::RouteOptimization => inputs.route.as_ref().map(route_metric),
        TaskKind::PartnerSelection => inputs.partner.as_ref().map(|submission| TaskMetric {
            score: submission.score,
            max_score: PARTNER_SCORE_SCALE,
            details: json!({
                "partner_id": submission.partner_id,
                "weighted_score": submission.score,
            }),
        }),
        TaskKind::MarketSelection | TaskKind::BudgetAllocation => group_metric(inputs),
        TaskKind::CrisisWeb => inputs.crisis.as_ref().map(|submission| TaskMetric {
            score: (submission.effectiveness * 100.0).round(),
            max_score: 100.0,
            details: json!({
                "scenario_id": submission.scenario_id,
                "effectiveness": submission.effectiveness,
                "risk_level": submission.risk_level.label(),
                "total_cost": submission.total_cost,
                "advisors": submission.selected_advisors.len(),
                "actions": submission.selected_actions.len(),
            }),
        }),
        TaskKind::ReactivationChallenge => {
            inputs.reactivation.as_ref().map(|submission| TaskMetric {
                score: ((1.0 - submission.risk_score) * 100.0).round(),
                max_score: 100.0,
                details: json!({
                    "risk_score": submission.risk_score,
                    "total_duration": submission.total_duration,
                    "critical_path_time": submission.critical_path_time,
                    "resource_utilization": submission.resource_utilization,
                }),
            })
        }
    }
}

fn route_metric(submission: &super::domain::RouteCalculation) -> TaskMetric {
    // Negative profit floors to zero for scoring; the true figure stays in
    // the details for diagnostics.
    TaskMetric {
        score: submission.net_profit.max(0.0),
        max_score: ROUTE_SCORE_CEILING,
        details: json!({
            "net_profit": submission.net_profit,
            "base_revenue": submission.base_revenue,
            "regional_modifier": submission.regional_modifier,
            "operating_costs": submission.operating_costs,
            "penalties": submission.penalties,
            "cold_chain_breaches": submission.cold_chain_breaches,
            "stations": submission.route.len(),
            "total_distance": submission.total_distance,
            "total_time": submission.total_time,
        }),
    }
}

fn group_metric(inputs: &UserInputs) -> Option<TaskMetric> {
    let group = &inputs.group;
    if group.groups_joined == 0 {
        // No group at all: the task is absent from the result entirely,
        // identical to a missing submission.
        return None;
    }

    let participation =
        (f64::from(group.messages) * 10.0 + f64::from(group.leadership_roles) * 20.0).min(100.0);
    let collaboration =
        (f64::from(group.groups_joined) * 25.0 + f64::from(group.messages) * 5.0).min(100.0);

    Some(TaskMetric {
        score: (participation + collaboration) / 2.0,
        max_score: 100.0,
        details: json!({
            "messages": group.messages,
            "decisions": group.decisions,
            "groups_joined": group.groups_joined,
            "leadership_roles": group.leadership_roles,
            "participation_score": participation,
            "collaboration_score": collaboration,
        }),
    })
}

/// Route profit arithmetic, applied by the task subsystem when a route plan
/// is submitted. Kept here so the formula has one owner.
pub fn route_net_profit(
    base_revenue: f64,
    regional_modifier: f64,
    operating_costs: f64,
    penalties: f64,
) -> f64 {
    base_revenue * regional_modifier - operating_costs - penalties
}

/// One dimension of the partner rubric. `lower_is_better` inverts the
/// min-max normalization (cost per patient, onboarding days, risk).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerCriterion {
    pub key: &'static str,
    pub weight: f64,
    pub lower_is_better: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartnerCandidate {
    pub partner_id: String,
    pub values: BTreeMap<&'static str, f64>,
}

/// Weighted-criteria scoring across all candidate partners, scaled to
/// 0..=10. Each criterion is min-max normalized over the candidate pool;
/// when every candidate ties on a criterion the normalized value is 0 for
/// all of them (baseline, not a division by zero).
pub fn score_partner_candidates(
    candidates: &[PartnerCandidate],
    criteria: &[PartnerCriterion],
) -> Vec<(String, f64)> {
    let mut results = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let mut weighted = 0.0;
        for criterion in criteria {
            let value = candidate.values.get(criterion.key).copied().unwrap_or(0.0);
            let (min, max) = criterion_bounds(candidates, criterion.key);
            let normalized = if max > min {
                let ratio = (value - min) / (max - min);
                if criterion.lower_is_better {
                    1.0 - ratio
                } else {
                    ratio
                }
            } else {
                0.0
            };
            weighted += normalized * criterion.weight;
        }
        results.push((candidate.partner_id.clone(), weighted * PARTNER_SCORE_SCALE));
    }

    results
}

fn criterion_bounds(candidates: &[PartnerCandidate], key: &str) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for candidate in candidates {
        let value = candidate.values.get(key).copied().unwrap_or(0.0);
        min = min.min(value);
        max = max.max(value);
    }
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}
