//! The `invigil run` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Deserialize;

use invigil_core::clock::format_mm_ss;
use invigil_core::grading::GradingOrchestrator;
use invigil_core::model::GradingOutcome;
use invigil_core::parser;
use invigil_core::report::SessionReport;
use invigil_core::session::SessionEngine;
use invigil_core::traits::AnswerGrader;
use invigil_graders::load_config_from;

/// TOML answers file: `answers = ["...", ...]` in question order.
#[derive(Debug, Deserialize)]
struct AnswersFile {
    answers: Vec<String>,
}

pub async fn execute(
    assessment_path: PathBuf,
    answers_path: Option<PathBuf>,
    violations: u32,
    simulated: bool,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let assessment = parser::parse_assessment(&assessment_path)?;
    anyhow::ensure!(
        !assessment.questions.is_empty(),
        "assessment '{}' has no questions",
        assessment.id
    );

    let answers = match &answers_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read answers file: {}", path.display()))?;
            let parsed: AnswersFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse answers file: {}", path.display()))?;
            anyhow::ensure!(
                parsed.answers.len() <= assessment.question_count(),
                "{} answers for {} questions",
                parsed.answers.len(),
                assessment.question_count()
            );
            parsed.answers
        }
        None => Vec::new(),
    };

    let mut orchestrator = match (simulated, config.remote_grader()) {
        (false, Some(remote)) => GradingOrchestrator::new(
            Arc::new(remote) as Arc<dyn AnswerGrader>,
            config.scoring,
        )
        .with_timeout(Duration::from_secs(config.grading_timeout_secs)),
        (true, _) => GradingOrchestrator::simulated_only(config.scoring),
        (false, None) => {
            eprintln!("No grading service configured, using simulated grading.");
            GradingOrchestrator::simulated_only(config.scoring)
        }
    };
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_simulator_seed(seed);
    }

    eprintln!(
        "invigil v0.1.0 -- {} ({} questions, {})",
        assessment.name,
        assessment.question_count(),
        format_mm_ss(assessment.total_seconds),
    );

    let (engine, handle) =
        SessionEngine::start(assessment, config.violation_policy, orchestrator);
    let run = tokio::spawn(engine.run());

    for (index, answer) in answers.iter().enumerate() {
        handle.set_answer(index, answer.clone()).await?;
    }

    for _ in 0..violations {
        // Crossing the auto-submit threshold freezes the session; later
        // injections are answered by the absorbing barrier.
        if handle.record_violation().await.is_err() {
            break;
        }
    }

    // A no-op submit means a violation injection already froze the session.
    let _ = handle.request_submit().await;

    let completed = run
        .await
        .context("session engine task failed")?
        .context("grading failed")?;

    if completed.outcome.simulated {
        println!("Warning: simulated grading was used; results are approximate.");
    }

    print_grades(&completed.assessment.questions, &completed.outcome);
    print_summary(&completed.outcome, completed.assessment.question_count());
    println!("Session ended: {}", completed.freeze_cause);

    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output_dir)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let report_path = output_dir.join(format!("report-{timestamp}.json"));
    SessionReport::from_completed(completed).save_json(&report_path)?;
    println!("Report saved to: {}", report_path.display());

    Ok(())
}

fn print_grades(questions: &[String], outcome: &GradingOutcome) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Score", "Feedback"]);

    for (index, (question, grade)) in questions.iter().zip(&outcome.grades).enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate(question, 48)),
            Cell::new(format!("{}/25", grade.score)),
            Cell::new(truncate(&grade.feedback, 48)),
        ]);
    }

    println!("{table}");
}

fn print_summary(outcome: &GradingOutcome, question_count: usize) {
    let max_raw = GradingOutcome::max_raw_total(question_count);
    let summary = &outcome.summary;

    let mut table = Table::new();
    table.set_header(vec!["Raw", "Time bonus", "Penalty", "Final", "Time spent", "Violations"]);
    table.add_row(vec![
        Cell::new(format!("{}/{max_raw}", summary.raw_total)),
        Cell::new(format!("+{}", summary.time_bonus)),
        Cell::new(format!("-{}", summary.violation_penalty)),
        Cell::new(format!("{}", summary.final_total)),
        Cell::new(format_mm_ss(summary.time_spent_seconds)),
        Cell::new(summary.violation_count),
    ]);

    println!("{table}");
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
