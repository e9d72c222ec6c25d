//! The `invigil validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(assessment_path: PathBuf) -> Result<()> {
    let assessments = if assessment_path.is_dir() {
        invigil_core::parser::load_assessment_directory(&assessment_path)?
    } else {
        vec![invigil_core::parser::parse_assessment(&assessment_path)?]
    };

    anyhow::ensure!(!assessments.is_empty(), "no assessment files found");

    let mut total_warnings = 0;

    for assessment in &assessments {
        println!(
            "Assessment: {} ({} questions, {}s)",
            assessment.name,
            assessment.question_count(),
            assessment.total_seconds
        );

        let warnings = invigil_core::parser::validate_assessment(assessment);
        for w in &warnings {
            println!("  [{}] WARNING: {}", w.assessment_id, w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All assessments valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
