//! Static reference tables: competency definitions, task-to-competency weight
//! mappings, scoring thresholds, and feedback text templates. Pure data.

use super::domain::{CompetencyCategory, TaskKind};

/// Ceiling used to normalize route profit into a percentage. Represents the
/// maximum plausible profit, not a dynamic maximum.
pub const ROUTE_SCORE_CEILING: f64 = 1_000_000.0;

/// Profit figure mapping to a full analytical-thinking score.
pub const ROUTE_PROFIT_FULL_MARKS: f64 = 100_000.0;

/// Partner selection scores are on a 0..=10 scale.
pub const PARTNER_SCORE_SCALE: f64 = 10.0;

/// Neutral fallback when a competency has no applicable data for a task kind.
/// Deliberately 50, not 0; it feeds weighted averages.
pub const NEUTRAL_COMPETENCY_SCORE: f64 = 50.0;

/// Competency percentage at or above which a user counts as a top performer.
pub const TOP_PERFORMER_CUTOFF: f64 = 80.0;

/// Feedback threshold bands. Five constants are declared; the generator
/// branches on the top three only and falls through below `SATISFACTORY`.
pub mod thresholds {
    pub const EXCELLENT: f64 = 90.0;
    pub const GOOD: f64 = 75.0;
    pub const SATISFACTORY: f64 = 60.0;
    pub const NEEDS_IMPROVEMENT: f64 = 40.0;
    pub const POOR: f64 = 0.0;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Competency {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: CompetencyCategory,
    pub weight: f64,
}

/// The ten fixed competencies. Declaration order fixes the CSV column order
/// and the order of per-user competency entries.
pub const COMPETENCIES: [Competency; 10] = [
    Competency {
        id: "analytical_thinking",
        name: "Analytical Thinking",
        description: "Breaks quantitative problems down and reasons from the numbers",
        category: CompetencyCategory::AnalyticalThinking,
        weight: 0.1,
    },
    Competency {
        id: "strategic_planning",
        name: "Strategic Planning",
        description: "Plans several moves ahead and allocates resources deliberately",
        category: CompetencyCategory::StrategicPlanning,
        weight: 0.1,
    },
    Competency {
        id: "collaboration",
        name: "Collaboration",
        description: "Works productively inside a group toward a shared outcome",
        category: CompetencyCategory::Collaboration,
        weight: 0.1,
    },
    Competency {
        id: "leadership",
        name: "Leadership",
        description: "Takes ownership of group direction and keeps others engaged",
        category: CompetencyCategory::Leadership,
        weight: 0.1,
    },
    Competency {
        id: "problem_solving",
        name: "Problem Solving",
        description: "Finds workable answers under constraints and incomplete data",
        category: CompetencyCategory::ProblemSolving,
        weight: 0.1,
    },
    Competency {
        id: "decision_making",
        name: "Decision Making",
        description: "Commits to defensible choices under time pressure",
        category: CompetencyCategory::DecisionMaking,
        weight: 0.1,
    },
    Competency {
        id: "communication",
        name: "Communication",
        description: "Keeps the group informed and contributes to the discussion",
        category: CompetencyCategory::Communication,
        weight: 0.1,
    },
    Competency {
        id: "adaptability",
        name: "Adaptability",
        description: "Adjusts course effectively when the situation changes",
        category: CompetencyCategory::Adaptability,
        weight: 0.1,
    },
    Competency {
        id: "innovation",
        name: "Innovation",
        description: "Reaches for non-obvious options when standard ones fall short",
        category: CompetencyCategory::Innovation,
        weight: 0.1,
    },
    Competency {
        id: "execution",
        name: "Execution",
        description: "Delivers the plan on time and within operational limits",
        category: CompetencyCategory::Execution,
        weight: 0.1,
    },
];

pub fn competency(category: CompetencyCategory) -> &'static Competency {
    // Every category owns exactly one competency in this dataset.
    COMPETENCIES
        .iter()
        .find(|competency| competency.category == category)
        .unwrap_or(&COMPETENCIES[0])
}

/// Task-to-competency weight table, in tenths of the effective allocation.
/// Tenths for a given task need not sum to exactly 10; the engine consumes
/// them as given and never renormalizes. Integer tenths keep the weighted
/// averages exact: a user whose every mapped pair scores the neutral 50
/// rolls up to exactly 50, with no floating-point drift. Every competency
/// appears at least once, which is what guarantees the ten-entry coverage
/// invariant downstream.
const TASK_COMPETENCY_WEIGHTS: &[(TaskKind, CompetencyCategory, u32)] = &[
    (
        TaskKind::RouteOptimization,
        CompetencyCategory::AnalyticalThinking,
        4,
    ),
    (
        TaskKind::RouteOptimization,
        CompetencyCategory::StrategicPlanning,
        3,
    ),
    (
        TaskKind::RouteOptimization,
        CompetencyCategory::ProblemSolving,
        2,
    ),
    (TaskKind::RouteOptimization, CompetencyCategory::Execution, 1),
    (
        TaskKind::PartnerSelection,
        CompetencyCategory::StrategicPlanning,
        4,
    ),
    (
        TaskKind::PartnerSelection,
        CompetencyCategory::DecisionMaking,
        4,
    ),
    (
        TaskKind::PartnerSelection,
        CompetencyCategory::AnalyticalThinking,
        2,
    ),
    (
        TaskKind::MarketSelection,
        CompetencyCategory::Collaboration,
        3,
    ),
    (
        TaskKind::MarketSelection,
        CompetencyCategory::Communication,
        3,
    ),
    (TaskKind::MarketSelection, CompetencyCategory::Leadership, 2),
    (
        TaskKind::MarketSelection,
        CompetencyCategory::DecisionMaking,
        2,
    ),
    (
        TaskKind::BudgetAllocation,
        CompetencyCategory::Collaboration,
        3,
    ),
    (TaskKind::BudgetAllocation, CompetencyCategory::Leadership, 3),
    (
        TaskKind::BudgetAllocation,
        CompetencyCategory::Communication,
        2,
    ),
    (
        TaskKind::BudgetAllocation,
        CompetencyCategory::StrategicPlanning,
        2,
    ),
    (TaskKind::CrisisWeb, CompetencyCategory::Adaptability, 3),
    (TaskKind::CrisisWeb, CompetencyCategory::ProblemSolving, 3),
    (TaskKind::CrisisWeb, CompetencyCategory::Innovation, 2),
    (TaskKind::CrisisWeb, CompetencyCategory::DecisionMaking, 2),
    (
        TaskKind::ReactivationChallenge,
        CompetencyCategory::Execution,
        4,
    ),
    (
        TaskKind::ReactivationChallenge,
        CompetencyCategory::StrategicPlanning,
        3,
    ),
    (
        TaskKind::ReactivationChallenge,
        CompetencyCategory::ProblemSolving,
        3,
    ),
];

/// Weight of `category` within `task` in tenths, 0 when the pair is
/// unmapped.
pub fn mapping_weight_tenths(task: TaskKind, category: CompetencyCategory) -> u32 {
    TASK_COMPETENCY_WEIGHTS
        .iter()
        .find(|(mapped_task, mapped_category, _)| {
            *mapped_task == task && *mapped_category == category
        })
        .map(|(_, _, tenths)| *tenths)
        .unwrap_or(0)
}

/// Categories mapped to `task`, in competency declaration order.
pub fn mapped_categories(task: TaskKind) -> Vec<CompetencyCategory> {
    CompetencyCategory::ordered()
        .into_iter()
        .filter(|category| mapping_weight_tenths(task, *category) > 0)
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackTemplate {
    pub strengths: [&'static str; 3],
    pub improvements: [&'static str; 3],
}

pub const GENERIC_IMPROVEMENT: &str =
    "Continue to develop this competency by taking on stretch assignments";

const FEEDBACK_TEMPLATES: [(CompetencyCategory, FeedbackTemplate); 10] = [
    (
        CompetencyCategory::AnalyticalThinking,
        FeedbackTemplate {
            strengths: [
                "Quantified trade-offs before committing to a route",
                "Grounded decisions in the profit and cost figures",
                "Checked results against the underlying numbers",
            ],
            improvements: [
                "Model more than one scenario before choosing",
                "Validate assumptions against the provided data",
                "Break large problems into measurable parts",
            ],
        },
    ),
    (
        CompetencyCategory::StrategicPlanning,
        FeedbackTemplate {
            strengths: [
                "Sequenced decisions with the later rounds in mind",
                "Balanced short-term cost against long-term position",
                "Aligned choices with the stated market priorities",
            ],
            improvements: [
                "Sketch a plan for the full session before round one",
                "Revisit the plan when new constraints appear",
                "Weigh opportunity cost, not just direct cost",
            ],
        },
    ),
    (
        CompetencyCategory::Collaboration,
        FeedbackTemplate {
            strengths: [
                "Joined group work early and stayed engaged",
                "Built on teammates' proposals instead of talking past them",
                "Shared findings that the whole group could use",
            ],
            improvements: [
                "Join the group discussion before decisions are locked",
                "Invite quieter members into the conversation",
                "Offer your working data, not just your conclusion",
            ],
        },
    ),
    (
        CompetencyCategory::Leadership,
        FeedbackTemplate {
            strengths: [
                "Took ownership of the group's direction",
                "Moved the group from discussion to a decision",
                "Kept the team on schedule under time pressure",
            ],
            improvements: [
                "Volunteer to coordinate one group activity",
                "Summarize and confirm decisions for the group",
                "Delegate sub-tasks instead of doing everything",
            ],
        },
    ),
    (
        CompetencyCategory::ProblemSolving,
        FeedbackTemplate {
            strengths: [
                "Worked around constraints rather than stalling on them",
                "Kept penalties and breaches contained",
                "Found a viable path when the obvious one failed",
            ],
            improvements: [
                "List the binding constraints before solving",
                "Compare at least two candidate solutions",
                "Treat setbacks as data, not dead ends",
            ],
        },
    ),
    (
        CompetencyCategory::DecisionMaking,
        FeedbackTemplate {
            strengths: [
                "Committed to choices without endless deliberation",
                "Weighed criteria consistently across options",
                "Accepted calculated risk when the upside justified it",
            ],
            improvements: [
                "Write down the deciding criterion before choosing",
                "Set a time limit for each decision",
                "Review one past decision for hindsight lessons",
            ],
        },
    ),
    (
        CompetencyCategory::Communication,
        FeedbackTemplate {
            strengths: [
                "Kept the group informed of your progress",
                "Stated positions clearly and concisely",
                "Asked questions that sharpened the discussion",
            ],
            improvements: [
                "Contribute to the group chat during decisions",
                "Lead with the conclusion, then the reasoning",
                "Confirm understanding before moving on",
            ],
        },
    ),
    (
        CompetencyCategory::Adaptability,
        FeedbackTemplate {
            strengths: [
                "Adjusted the response as the crisis evolved",
                "Dropped a failing approach without sunk-cost bias",
                "Stayed effective when the scenario shifted",
            ],
            improvements: [
                "Re-read the situation after each new development",
                "Prepare a fallback before committing resources",
                "Practice changing course without losing the team",
            ],
        },
    ),
    (
        CompetencyCategory::Innovation,
        FeedbackTemplate {
            strengths: [
                "Combined advisors and actions in non-obvious ways",
                "Proposed options nobody else had considered",
                "Used limited budget creatively",
            ],
            improvements: [
                "Generate three options before picking one",
                "Borrow tactics from unrelated scenarios",
                "Question the default response at least once",
            ],
        },
    ),
    (
        CompetencyCategory::Execution,
        FeedbackTemplate {
            strengths: [
                "Sequenced the reactivation plan to minimize risk",
                "Kept the critical path tight and realistic",
                "Delivered within the operational limits",
            ],
            improvements: [
                "Identify the critical path before ordering steps",
                "Build slack into high-risk stages",
                "Track utilization against the plan as you go",
            ],
        },
    ),
];

pub fn feedback_template(category: CompetencyCategory) -> &'static FeedbackTemplate {
    FEEDBACK_TEMPLATES
        .iter()
        .find(|(mapped, _)| *mapped == category)
        .map(|(_, template)| template)
        .unwrap_or(&FEEDBACK_TEMPLATES[0].1)
}
