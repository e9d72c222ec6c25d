//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn invigil() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("invigil").unwrap()
}

const VALID_ASSESSMENT: &str = r#"[assessment]
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

fn write_assessment(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("graphs.toml");
    std::fs::write(&path, VALID_ASSESSMENT).unwrap();
    path
}

#[test]
fn validate_valid_assessment() {
    let dir = TempDir::new().unwrap();
    let path = write_assessment(&dir);

    invigil()
        .arg("validate")
        .arg("--assessment")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions"))
        .stdout(predicate::str::contains("All assessments valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(
        &path,
        "[assessment]\nid = \"empty\"\nname = \"Empty\"\ntopic = \"T\"\n",
    )
    .unwrap();

    invigil()
        .arg("validate")
        .arg("--assessment")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no questions"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    write_assessment(&dir);

    invigil()
        .arg("validate")
        .arg("--assessment")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph Theory Basics"));
}

#[test]
fn validate_nonexistent_file() {
    invigil()
        .arg("validate")
        .arg("--assessment")
        .arg("/definitely/not/here.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_starter_files() {
    let dir = TempDir::new().unwrap();

    invigil()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created invigil.toml"))
        .stdout(predicate::str::contains("Created assessments/example.toml"));

    assert!(dir.path().join("invigil.toml").exists());
    assert!(dir.path().join("assessments/example.toml").exists());

    // Second run skips existing files.
    invigil()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_example_validates_cleanly() {
    let dir = TempDir::new().unwrap();

    invigil().current_dir(dir.path()).arg("init").assert().success();

    invigil()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--assessment")
        .arg("assessments/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All assessments valid"));
}

#[test]
fn run_simulated_prints_breakdown() {
    let dir = TempDir::new().unwrap();
    let assessment = write_assessment(&dir);
    let answers = dir.path().join("answers.toml");
    std::fs::write(
        &answers,
        "answers = [\"\", \"BFS finds shortest paths in unweighted graphs.\", \"It pops the closest unsettled vertex.\"]\n",
    )
    .unwrap();

    invigil()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assessment")
        .arg(&assessment)
        .arg("--answers")
        .arg(&answers)
        .arg("--simulated")
        .arg("--seed")
        .arg("42")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulated grading"))
        .stdout(predicate::str::contains("0/25"))
        .stdout(predicate::str::contains("Session ended: submitted"))
        .stdout(predicate::str::contains("Report saved to:"));
}

#[test]
fn run_rejects_empty_assessment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(
        &path,
        "[assessment]\nid = \"empty\"\nname = \"Empty\"\ntopic = \"T\"\n",
    )
    .unwrap();

    invigil()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assessment")
        .arg(&path)
        .arg("--simulated")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions"));
}

#[test]
fn run_rejects_answer_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let assessment = write_assessment(&dir);
    let answers = dir.path().join("answers.toml");
    std::fs::write(&answers, "answers = [\"a\", \"b\", \"c\", \"d\"]\n").unwrap();

    invigil()
        .current_dir(dir.path())
        .arg("run")
        .arg("--assessment")
        .arg(&assessment)
        .arg("--answers")
        .arg(&answers)
        .arg("--simulated")
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 answers for 3 questions"));
}

#[test]
fn questions_without_config_fails() {
    let dir = TempDir::new().unwrap();

    invigil()
        .current_dir(dir.path())
        .arg("questions")
        .arg("--topic")
        .arg("Graphs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question source configured"));
}
