use crate::error::AppError;
use crate::infra::{seed_demo_session, InMemoryReportStore, InMemorySessionStore};
use clap::Args;
use sim_scoring::scoring::{
    CompetencyCategory, ExportFormat, ScoringError, ScoringService, SessionScoringResult, TaskKind,
    UserId,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Show the full competency feedback report for this participant.
    #[arg(long)]
    pub(crate) user: Option<String>,
    /// Include the per-task breakdown tables in the output.
    #[arg(long)]
    pub(crate) breakdowns: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Export format (csv or json)
    #[arg(long, default_value = "csv")]
    pub(crate) format: String,
    /// Write the export to this path instead of the default filename
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { user, breakdowns } = args;

    let sessions = Arc::new(InMemorySessionStore::default());
    let session = seed_demo_session(&sessions);
    let reports = Arc::new(InMemoryReportStore::default());
    let service = ScoringService::new(sessions, reports);

    println!("Simulation scoring demo");
    println!("Session: {}", session);

    let result = service.session_scores(&session)?;
    render_leaderboard(&result);

    if breakdowns {
        render_breakdowns(&result);
    }

    let focus_user = match user {
        Some(id) => UserId(id),
        None => match result.user_scores.first() {
            Some(top) => top.user_id.clone(),
            None => {
                println!("\nNo participants scored; nothing to report.");
                return Ok(());
            }
        },
    };

    let report = service.final_report(&session, &focus_user)?;
    println!(
        "\nFinal report for {} (rank {}, total {:.2})",
        report.user_id, report.rank, report.total_score
    );
    println!("Generated at: {}", report.generated_at.to_rfc3339());
    for feedback in &report.feedback {
        println!(
            "\n{} ({:.1}%)",
            feedback.competency_name, feedback.percentage
        );
        if feedback.strengths.is_empty() {
            println!("  Strengths: none identified yet");
        } else {
            println!("  Strengths:");
            for strength in &feedback.strengths {
                println!("    - {}", strength);
            }
        }
        if !feedback.areas_for_improvement.is_empty() {
            println!("  Areas for improvement:");
            for area in &feedback.areas_for_improvement {
                println!("    - {}", area);
            }
        }
        if !feedback.specific_examples.is_empty() {
            println!("  Evidence:");
            for example in &feedback.specific_examples {
                println!("    - {}", example);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs { format, output } = args;
    let format = format
        .parse::<ExportFormat>()
        .map_err(|err| AppError::Scoring(ScoringError::from(err)))?;

    let sessions = Arc::new(InMemorySessionStore::default());
    let session = seed_demo_session(&sessions);
    let reports = Arc::new(InMemoryReportStore::default());
    let service = ScoringService::new(sessions, reports);

    let export = service.export(&session, format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));

    let mut file = std::fs::File::create(&path)?;
    file.write_all(&export.body)?;

    println!(
        "Wrote {} ({} bytes, {})",
        path.display(),
        export.body.len(),
        export.content_type
    );
    Ok(())
}

fn render_leaderboard(result: &SessionScoringResult) {
    println!(
        "\nLeaderboard ({} participants)",
        result.total_participants
    );
    for score in &result.user_scores {
        println!(
            "{:>3}. {} | total {:.2} | {:.1}% | {} tasks attempted",
            score.rank,
            score.user_name,
            score.total_score,
            score.overall_percentage,
            score.task_scores.len()
        );
    }
}

fn render_breakdowns(result: &SessionScoringResult) {
    println!("\nTask breakdown");
    for task in TaskKind::ordered() {
        match result.task_breakdown.get(&task) {
            Some(entry) => println!(
                "- {}: avg {:.2} | completion {:.0}%",
                task.label(),
                entry.average_score,
                entry.completion_rate
            ),
            None => println!("- {}: no attempts", task.label()),
        }
    }

    println!("\nCompetency breakdown");
    for category in CompetencyCategory::ordered() {
        if let Some(entry) = result.competency_breakdown.get(&category) {
            let toppers = if entry.top_performers.is_empty() {
                "none".to_string()
            } else {
                entry.top_performers.join(", ")
            };
            println!(
                "- {}: avg {:.1} | top performers: {}",
                category.label(),
                entry.average_score,
                toppers
            );
        }
    }
}
