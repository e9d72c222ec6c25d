//! The `invigil init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create invigil.toml
    if std::path::Path::new("invigil.toml").exists() {
        println!("invigil.toml already exists, skipping.");
    } else {
        std::fs::write("invigil.toml", SAMPLE_CONFIG)?;
        println!("Created invigil.toml");
    }

    // Create example assessment
    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ASSESSMENT)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit invigil.toml with your grading service endpoint");
    println!("  2. Run: invigil validate --assessment assessments/example.toml");
    println!("  3. Run: invigil run --assessment assessments/example.toml --simulated");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# invigil configuration

# Seconds to wait for the grading service before falling back.
grading_timeout_secs = 10

# Where session reports are written.
output_dir = "./invigil-reports"

# Remote grading service. Remove this section to always grade locally.
[grader]
base_url = "http://localhost:8080"
api_key = "${INVIGIL_GRADER_KEY}"

# Remote question-generation service.
[question_source]
base_url = "http://localhost:8080"

[violation_policy]
mode = "auto_submit"
threshold = 3

[scoring]
bonus_per_spare_minute = 2
max_time_bonus = 20
penalty_per_violation = 5
max_violation_penalty = 25
"#;

const EXAMPLE_ASSESSMENT: &str = r#"[assessment]
id = "graphs-101"
name = "Graph Theory Basics"
topic = "Graphs"
description = "Short-answer questions on introductory graph theory"
total_seconds = 3000
questions = [
    "Define a directed acyclic graph and give one real-world example.",
    "When would you prefer BFS over DFS? Explain briefly.",
    "Explain the role of a priority queue in Dijkstra's algorithm.",
    "What does it mean for a graph to be bipartite?",
    "Describe one way to detect a cycle in a directed graph.",
]
"#;
