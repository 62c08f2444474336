//! Fixed per-(task, competency) derivations and the weighted rollup.
//!
//! Each mapped pair has its own hand-coded rule held in a lookup table so a
//! single pair can be exercised in isolation. An unmapped or data-less pair
//! yields the neutral 50, never an omission.

use super::catalog::{
    self, mapping_weight_tenths, NEUTRAL_COMPETENCY_SCORE, PARTNER_SCORE_SCALE,
    ROUTE_PROFIT_FULL_MARKS,
};
use super::domain::{CompetencyCategory, CompetencyScore, TaskKind, UserInputs};

/// Result of one pair rule: a 0..=100 score and the evidence it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOutcome {
    pub score: f64,
    pub evidence: Vec<String>,
}

impl PairOutcome {
    fn neutral() -> Self {
        Self {
            score: NEUTRAL_COMPETENCY_SCORE,
            evidence: Vec::new(),
        }
    }
}

type PairScoreFn = fn(&UserInputs) -> PairOutcome;

struct PairRule {
    task: TaskKind,
    category: CompetencyCategory,
    score: PairScoreFn,
}

static PAIR_RULES: &[PairRule] = &[
    PairRule {
        task: TaskKind::RouteOptimization,
        category: CompetencyCategory::AnalyticalThinking,
        score: route_analytical,
    },
    PairRule {
        task: TaskKind::RouteOptimization,
        category: CompetencyCategory::StrategicPlanning,
        score: route_strategic,
    },
    PairRule {
        task: TaskKind::RouteOptimization,
        category: CompetencyCategory::ProblemSolving,
        score: route_problem_solving,
    },
    PairRule {
        task: TaskKind::RouteOptimization,
        category: CompetencyCategory::Execution,
        score: route_execution,
    },
    PairRule {
        task: TaskKind::PartnerSelection,
        category: CompetencyCategory::StrategicPlanning,
        score: partner_strategic,
    },
    PairRule {
        task: TaskKind::PartnerSelection,
        category: CompetencyCategory::DecisionMaking,
        score: partner_decision,
    },
    PairRule {
        task: TaskKind::PartnerSelection,
        category: CompetencyCategory::AnalyticalThinking,
        score: partner_analytical,
    },
    PairRule {
        task: TaskKind::MarketSelection,
        category: CompetencyCategory::Collaboration,
        score: group_collaboration,
    },
    PairRule {
        task: TaskKind::MarketSelection,
        category: CompetencyCategory::Communication,
        score: group_communication,
    },
    PairRule {
        task: TaskKind::MarketSelection,
        category: CompetencyCategory::Leadership,
        score: group_leadership,
    },
    PairRule {
        task: TaskKind::MarketSelection,
        category: CompetencyCategory::DecisionMaking,
        score: group_decision,
    },
    PairRule {
        task: TaskKind::BudgetAllocation,
        category: CompetencyCategory::Collaboration,
        score: group_collaboration,
    },
    PairRule {
        task: TaskKind::BudgetAllocation,
        category: CompetencyCategory::Leadership,
        score: group_leadership,
    },
    PairRule {
        task: TaskKind::BudgetAllocation,
        category: CompetencyCategory::Communication,
        score: group_communication,
    },
    PairRule {
        task: TaskKind::BudgetAllocation,
        category: CompetencyCategory::StrategicPlanning,
        score: group_decision,
    },
    PairRule {
        task: TaskKind::CrisisWeb,
        category: CompetencyCategory::Adaptability,
        score: crisis_effectiveness,
    },
    PairRule {
        task: TaskKind::CrisisWeb,
        category: CompetencyCategory::Innovation,
        score: crisis_effectiveness,
    },
    PairRule {
        task: TaskKind::CrisisWeb,
        category: CompetencyCategory::ProblemSolving,
        score: crisis_risk_adjusted,
    },
    PairRule {
        task: TaskKind::CrisisWeb,
        category: CompetencyCategory::DecisionMaking,
        score: crisis_cost_of_risk,
    },
    PairRule {
        task: TaskKind::ReactivationChallenge,
        category: CompetencyCategory::Execution,
        score: reactivation_execution,
    },
    PairRule {
        task: TaskKind::ReactivationChallenge,
        category: CompetencyCategory::StrategicPlanning,
        score: reactivation_strategic,
    },
    PairRule {
        task: TaskKind::ReactivationChallenge,
        category: CompetencyCategory::ProblemSolving,
        score: reactivation_problem_solving,
    },
];

/// Score one `(task, category)` pair from the batch-fetched inputs.
pub fn pair_score(task: TaskKind, category: CompetencyCategory, inputs: &UserInputs) -> PairOutcome {
    PAIR_RULES
        .iter()
        .find(|rule| rule.task == task && rule.category == category)
        .map(|rule| (rule.score)(inputs))
        .unwrap_or_else(PairOutcome::neutral)
}

/// Per-task competency entries, one per category mapped to `task`.
pub fn task_competency_scores(task: TaskKind, inputs: &UserInputs) -> Vec<CompetencyScore> {
    catalog::mapped_categories(task)
        .into_iter()
        .map(|category| {
            let outcome = pair_score(task, category, inputs);
            competency_score(category, outcome.score, outcome.evidence)
        })
        .collect()
}

/// Session-wide rollup: exactly ten entries, one per competency, each a
/// weighted average over every task kind mapped to it. Evidence is the
/// deduplicated union of the contributing pair calls.
///
/// Weights accumulate as integer tenths so the division is exact whenever
/// every contributing pair agrees; in particular an all-neutral user rolls
/// up to exactly `NEUTRAL_COMPETENCY_SCORE`.
pub fn competency_scores(inputs: &UserInputs) -> Vec<CompetencyScore> {
    CompetencyCategory::ordered()
        .into_iter()
        .map(|category| {
            let mut total_score = 0.0;
            let mut total_tenths = 0u32;
            let mut evidence: Vec<String> = Vec::new();

            for task in TaskKind::ordered() {
                let tenths = mapping_weight_tenths(task, category);
                if tenths == 0 {
                    continue;
                }
                let outcome = pair_score(task, category, inputs);
                total_score += outcome.score * f64::from(tenths);
                total_tenths += tenths;
                for item in outcome.evidence {
                    if !evidence.contains(&item) {
                        evidence.push(item);
                    }
                }
            }

            let average = if total_tenths > 0 {
                total_score / f64::from(total_tenths)
            } else {
                0.0
            };
            competency_score(category, average, evidence)
        })
        .collect()
}

fn competency_score(category: CompetencyCategory, score: f64, evidence: Vec<String>) -> CompetencyScore {
    let definition = catalog::competency(category);
    CompetencyScore {
        competency_id: definition.id.to_string(),
        competency_name: definition.name.to_string(),
        category,
        score,
        max_score: 100.0,
        percentage: score,
        evidence,
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn route_analytical(inputs: &UserInputs) -> PairOutcome {
    match &inputs.route {
        Some(route) => PairOutcome {
            score: clamp_score(route.net_profit / ROUTE_PROFIT_FULL_MARKS * 100.0),
            evidence: vec![format!(
                "Route plan returned {:.0} net profit across {} stations",
                route.net_profit,
                route.route.len()
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn route_strategic(inputs: &UserInputs) -> PairOutcome {
    match &inputs.route {
        Some(route) => PairOutcome {
            score: clamp_score(100.0 - 20.0 * f64::from(route.cold_chain_breaches)),
            evidence: vec![format!(
                "Held cold-chain breaches to {} on the planned route",
                route.cold_chain_breaches
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn route_problem_solving(inputs: &UserInputs) -> PairOutcome {
    match &inputs.route {
        Some(route) => PairOutcome {
            score: clamp_score(100.0 - route.penalties / 1_000.0),
            evidence: vec![format!(
                "Kept route penalties to {:.0}",
                route.penalties
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn route_execution(inputs: &UserInputs) -> PairOutcome {
    match &inputs.route {
        Some(route) => PairOutcome {
            score: clamp_score(100.0 - route.total_time / 10.0),
            evidence: vec![format!(
                "Completed the delivery route in {:.0} minutes",
                route.total_time
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn partner_scaled(inputs: &UserInputs, evidence: fn(&super::domain::PartnerSelection) -> String) -> PairOutcome {
    match &inputs.partner {
        Some(partner) => PairOutcome {
            score: clamp_score(partner.score * PARTNER_SCORE_SCALE),
            evidence: vec![evidence(partner)],
        },
        None => PairOutcome::neutral(),
    }
}

fn partner_strategic(inputs: &UserInputs) -> PairOutcome {
    partner_scaled(inputs, |partner| {
        format!(
            "Partner choice scored {:.1} of 10 on strategic fit",
            partner.score
        )
    })
}

fn partner_decision(inputs: &UserInputs) -> PairOutcome {
    partner_scaled(inputs, |partner| {
        format!(
            "Committed to partner {} with a weighted score of {:.1}",
            partner.partner_id, partner.score
        )
    })
}

fn partner_analytical(inputs: &UserInputs) -> PairOutcome {
    partner_scaled(inputs, |partner| {
        format!(
            "Weighed the partner criteria into a {:.1}/10 selection",
            partner.score
        )
    })
}

fn group_collaboration(inputs: &UserInputs) -> PairOutcome {
    let group = &inputs.group;
    if group.groups_joined == 0 {
        return PairOutcome::neutral();
    }
    PairOutcome {
        score: (f64::from(group.groups_joined) * 25.0 + f64::from(group.messages) * 5.0).min(100.0),
        evidence: vec![format!(
            "Worked in {} group(s) and sent {} messages",
            group.groups_joined, group.messages
        )],
    }
}

fn group_communication(inputs: &UserInputs) -> PairOutcome {
    let group = &inputs.group;
    if group.groups_joined == 0 {
        return PairOutcome::neutral();
    }
    PairOutcome {
        score: (f64::from(group.messages) * 10.0).min(100.0),
        evidence: vec![format!(
            "Sent {} messages during group discussion",
            group.messages
        )],
    }
}

fn group_leadership(inputs: &UserInputs) -> PairOutcome {
    let group = &inputs.group;
    if group.groups_joined == 0 {
        return PairOutcome::neutral();
    }
    PairOutcome {
        score: (f64::from(group.leadership_roles) * 40.0 + f64::from(group.decisions) * 10.0)
            .min(100.0),
        evidence: vec![format!(
            "Held a leadership role in {} group(s)",
            group.leadership_roles
        )],
    }
}

fn group_decision(inputs: &UserInputs) -> PairOutcome {
    let group = &inputs.group;
    if group.groups_joined == 0 {
        return PairOutcome::neutral();
    }
    PairOutcome {
        score: (f64::from(group.decisions) * 15.0 + f64::from(group.messages) * 2.0).min(100.0),
        evidence: vec![format!(
            "Logged {} group decisions",
            group.decisions
        )],
    }
}

// Adaptability and innovation both reuse the effectiveness signal verbatim.
fn crisis_effectiveness(inputs: &UserInputs) -> PairOutcome {
    match &inputs.crisis {
        Some(crisis) => PairOutcome {
            score: (crisis.effectiveness * 100.0).round(),
            evidence: vec![format!(
                "Crisis response reached {:.0}% effectiveness",
                crisis.effectiveness * 100.0
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn crisis_risk_adjusted(inputs: &UserInputs) -> PairOutcome {
    match &inputs.crisis {
        Some(crisis) => PairOutcome {
            score: clamp_score((crisis.effectiveness * 100.0).round() - crisis.risk_level.penalty()),
            evidence: vec![format!(
                "Resolved the crisis at {} residual risk",
                crisis.risk_level.label()
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn crisis_cost_of_risk(inputs: &UserInputs) -> PairOutcome {
    match &inputs.crisis {
        Some(crisis) => PairOutcome {
            score: clamp_score(
                (crisis.effectiveness * 100.0).round() - crisis.risk_level.penalty() * 0.5,
            ),
            evidence: vec![format!(
                "Chose {} advisors and {} actions under budget pressure",
                crisis.selected_advisors.len(),
                crisis.selected_actions.len()
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn reactivation_execution(inputs: &UserInputs) -> PairOutcome {
    match &inputs.reactivation {
        Some(plan) => PairOutcome {
            score: ((1.0 - plan.risk_score) * 100.0).round(),
            evidence: vec![format!(
                "Sequenced reactivation at {:.0}% residual risk",
                plan.risk_score * 100.0
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn reactivation_strategic(inputs: &UserInputs) -> PairOutcome {
    match &inputs.reactivation {
        Some(plan) => PairOutcome {
            score: clamp_score(plan.resource_utilization * 100.0),
            evidence: vec![format!(
                "Utilized {:.0}% of available resources",
                plan.resource_utilization * 100.0
            )],
        },
        None => PairOutcome::neutral(),
    }
}

fn reactivation_problem_solving(inputs: &UserInputs) -> PairOutcome {
    match &inputs.reactivation {
        Some(plan) => {
            let score = if plan.total_duration > 0.0 {
                clamp_score(plan.critical_path_time / plan.total_duration * 100.0)
            } else {
                0.0
            };
            PairOutcome {
                score,
                evidence: vec![format!(
                    "Planned {:.0} of {:.0} hours on the critical path",
                    plan.critical_path_time, plan.total_duration
                )],
            }
        }
        None => PairOutcome::neutral(),
    }
}
