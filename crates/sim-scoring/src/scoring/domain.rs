use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six assessed activities, in declaration order. Iteration order over
/// `ordered()` is a contract: task breakdowns and per-user task lists always
/// follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    RouteOptimization,
    PartnerSelection,
    MarketSelection,
    BudgetAllocation,
    CrisisWeb,
    ReactivationChallenge,
}

impl TaskKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::RouteOptimization,
            Self::PartnerSelection,
            Self::MarketSelection,
            Self::BudgetAllocation,
            Self::CrisisWeb,
            Self::ReactivationChallenge,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RouteOptimization => "Route Optimization",
            Self::PartnerSelection => "Partner Selection",
            Self::MarketSelection => "Market Selection",
            Self::BudgetAllocation => "Budget Allocation",
            Self::CrisisWeb => "Crisis Web",
            Self::ReactivationChallenge => "Reactivation Challenge",
        }
    }

    /// Group tasks have no individual submission; their score derives from
    /// round-two group activity signals.
    pub const fn is_group(self) -> bool {
        matches!(self, Self::MarketSelection | Self::BudgetAllocation)
    }
}

/// The ten competency categories, in declaration order. The declaration order
/// fixes the CSV column layout and the order of per-user competency entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyCategory {
    AnalyticalThinking,
    StrategicPlanning,
    Collaboration,
    Leadership,
    ProblemSolving,
    DecisionMaking,
    Communication,
    Adaptability,
    Innovation,
    Execution,
}

impl CompetencyCategory {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::AnalyticalThinking,
            Self::StrategicPlanning,
            Self::Collaboration,
            Self::Leadership,
            Self::ProblemSolving,
            Self::DecisionMaking,
            Self::Communication,
            Self::Adaptability,
            Self::Innovation,
            Self::Execution,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AnalyticalThinking => "Analytical Thinking",
            Self::StrategicPlanning => "Strategic Planning",
            Self::Collaboration => "Collaboration",
            Self::Leadership => "Leadership",
            Self::ProblemSolving => "Problem Solving",
            Self::DecisionMaking => "Decision Making",
            Self::Communication => "Communication",
            Self::Adaptability => "Adaptability",
            Self::Innovation => "Innovation",
            Self::Execution => "Execution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session roster entry, as supplied by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub user_name: String,
}

/// Route optimization submission. `net_profit` is computed upstream by the
/// route metrics routine and consumed read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCalculation {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub route: Vec<String>,
    pub total_distance: f64,
    pub total_time: f64,
    pub cold_chain_breaches: u32,
    pub base_revenue: f64,
    pub regional_modifier: f64,
    pub operating_costs: f64,
    pub penalties: f64,
    pub net_profit: f64,
}

/// Partner selection submission. `score` is the weighted-criteria result on
/// the 0..=10 scale, fixed at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerSelection {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub partner_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Point deduction applied by risk-sensitive competency derivations.
    pub const fn penalty(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 10.0,
            Self::High => 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisSubmission {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub scenario_id: String,
    pub selected_advisors: Vec<String>,
    pub selected_actions: Vec<String>,
    pub total_cost: f64,
    /// Normalized quality signal in `[0, 1]`, produced upstream.
    pub effectiveness: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactivationSequence {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub sequence: Vec<String>,
    pub total_duration: f64,
    pub critical_path_time: f64,
    /// Normalized risk in `[0, 1]`; this is the only inverse-scored signal.
    pub risk_score: f64,
    pub resource_utilization: f64,
}

/// Behavioral signals derived from round-two group work. Not a stored entity;
/// the store aggregates it per user per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupActivity {
    pub messages: u32,
    pub decisions: u32,
    pub groups_joined: u32,
    pub leadership_roles: u32,
}

/// Everything the calculators need for one user, batch-fetched once so the
/// per-competency derivations never re-query the store.
#[derive(Debug, Clone, Default)]
pub struct UserInputs {
    pub route: Option<RouteCalculation>,
    pub partner: Option<PartnerSelection>,
    pub crisis: Option<CrisisSubmission>,
    pub reactivation: Option<ReactivationSequence>,
    pub group: GroupActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub competency_id: String,
    pub competency_name: String,
    pub category: CompetencyCategory,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScore {
    pub task: TaskKind,
    pub task_name: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub competency_scores: Vec<CompetencyScore>,
    pub details: serde_json::Value,
}

/// One participant's full result. `rank` starts at 0 and is assigned exactly
/// once when the session ranking is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScore {
    pub user_id: UserId,
    pub user_name: String,
    pub total_score: f64,
    pub max_total_score: f64,
    pub overall_percentage: f64,
    pub rank: u32,
    pub task_scores: Vec<TaskScore>,
    pub competency_scores: Vec<CompetencyScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    pub average_score: f64,
    pub max_score: f64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyBreakdown {
    pub average_score: f64,
    pub max_score: f64,
    pub top_performers: Vec<String>,
}

/// Root aggregate for one scored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScoringResult {
    pub session_id: SessionId,
    pub total_participants: usize,
    pub user_scores: Vec<UserScore>,
    pub task_breakdown: BTreeMap<TaskKind, TaskBreakdown>,
    pub competency_breakdown: BTreeMap<CompetencyCategory, CompetencyBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyFeedback {
    pub competency_id: String,
    pub competency_name: String,
    pub category: CompetencyCategory,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub specific_examples: Vec<String>,
}

/// Persisted participant report. Created once per `(session, user)` pair and
/// returned as-is thereafter, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub total_score: f64,
    pub rank: u32,
    pub competency_scores: Vec<CompetencyScore>,
    pub feedback: Vec<CompetencyFeedback>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Raised by `ExportFormat::from_str` for anything outside `{csv, json}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown export format '{}'", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Serialized session results ready to hand to a transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub content_type: &'static str,
    pub filename: String,
    pub body: Vec<u8>,
}
