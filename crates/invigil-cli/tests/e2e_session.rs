//! End-to-end session tests through the real binary.
//!
//! Runs scripted sessions with simulated grading and checks the persisted
//! report, including the violation auto-submit path.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use invigil_core::model::FreezeCause;
use invigil_core::report::SessionReport;

fn invigil() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("invigil").unwrap()
}

const ASSESSMENT: &str = r#"[assessment]
id = "graphs-101"
name = "Graph Theory Basics"
topic = "Graphs"
total_seconds = 3000
questions = [
    "Define a directed acyclic graph.",
    "When would you prefer BFS over DFS?",
    "Explain the role of a priority queue in Dijkstra's algorithm.",
]
"#;

fn setup(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let assessment = dir.path().join("graphs.toml");
    std::fs::write(&assessment, ASSESSMENT).unwrap();
    let answers = dir.path().join("answers.toml");
    std::fs::write(
        &answers,
        "answers = [\"\", \"a valid answer\", \"another\"]\n",
    )
    .unwrap();
    (assessment, answers)
}

fn load_single_report(output_dir: &std::path::Path) -> SessionReport {
    let mut entries: Vec<_> = std::fs::read_dir(output_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one report");
    SessionReport::load_json(&entries.pop().unwrap()).unwrap()
}

#[test]
fn submitted_session_report_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (assessment, answers) = setup(&dir);
    let output = dir.path().join("reports");

    invigil()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assessment")
        .arg(&assessment)
        .arg("--answers")
        .arg(&answers)
        .arg("--violations")
        .arg("2")
        .arg("--simulated")
        .arg("--seed")
        .arg("7")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let report = load_single_report(&output);
    assert_eq!(report.assessment.id, "graphs-101");
    assert_eq!(report.answers, vec!["", "a valid answer", "another"]);
    assert_eq!(report.freeze_cause, FreezeCause::Submitted);

    let outcome = &report.outcome;
    assert!(outcome.simulated);
    assert_eq!(outcome.grades.len(), 3);
    assert_eq!(outcome.grades[0].score, 0);
    assert_eq!(outcome.grades[0].feedback, "No answer provided.");
    for grade in &outcome.grades[1..] {
        assert!((10..=25).contains(&grade.score));
        assert!(grade.feedback.contains("(simulated grading)"));
    }

    // 2 violations under the default 5-point penalty.
    assert_eq!(outcome.summary.violation_count, 2);
    assert_eq!(outcome.summary.violation_penalty, 10);
    assert_eq!(
        outcome.summary.final_total,
        (outcome.summary.raw_total + outcome.summary.time_bonus)
            .saturating_sub(outcome.summary.violation_penalty)
    );
}

#[test]
fn violation_threshold_auto_submits_the_run() {
    let dir = TempDir::new().unwrap();
    let (assessment, answers) = setup(&dir);
    let output = dir.path().join("reports");

    invigil()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assessment")
        .arg(&assessment)
        .arg("--answers")
        .arg(&answers)
        .arg("--violations")
        .arg("3")
        .arg("--simulated")
        .arg("--seed")
        .arg("7")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session ended: violation limit"));

    let report = load_single_report(&output);
    assert_eq!(report.freeze_cause, FreezeCause::ViolationLimit);
    assert_eq!(report.outcome.summary.violation_count, 3);
    assert_eq!(report.outcome.summary.violation_penalty, 15);
}

#[test]
fn same_seed_reproduces_grades() {
    let dir = TempDir::new().unwrap();
    let (assessment, answers) = setup(&dir);

    let mut totals = Vec::new();
    for run_dir in ["a", "b"] {
        let output = dir.path().join(run_dir);
        invigil()
            .current_dir(dir.path())
            .arg("run")
            .arg("--assessment")
            .arg(&assessment)
            .arg("--answers")
            .arg(&answers)
            .arg("--simulated")
            .arg("--seed")
            .arg("1234")
            .arg("--output")
            .arg(&output)
            .assert()
            .success();
        totals.push(load_single_report(&output).outcome.summary.raw_total);
    }

    assert_eq!(totals[0], totals[1]);
}
