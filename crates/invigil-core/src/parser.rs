//! TOML assessment file parser.
//!
//! Loads assessments from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Assessment;
use crate::traits::MAX_GENERATED_QUESTIONS;

/// Intermediate TOML structure for parsing assessment files.
#[derive(Debug, Deserialize)]
struct TomlAssessmentFile {
    assessment: TomlAssessment,
}

#[derive(Debug, Deserialize)]
struct TomlAssessment {
    id: String,
    name: String,
    topic: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<String>,
    #[serde(default = "default_total_seconds")]
    total_seconds: u32,
}

fn default_total_seconds() -> u32 {
    3000
}

/// Parse a single TOML file into an [`Assessment`].
pub fn parse_assessment(path: &Path) -> Result<Assessment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assessment file: {}", path.display()))?;
    parse_assessment_str(&content, path)
}

/// Parse a TOML string into an [`Assessment`] (useful for testing).
pub fn parse_assessment_str(content: &str, source_path: &Path) -> Result<Assessment> {
    let parsed: TomlAssessmentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let a = parsed.assessment;
    Ok(Assessment {
        id: a.id,
        name: a.name,
        topic: a.topic,
        description: a.description,
        questions: a.questions,
        total_seconds: a.total_seconds,
    })
}

/// Recursively load all `.toml` assessment files from a directory.
pub fn load_assessment_directory(dir: &Path) -> Result<Vec<Assessment>> {
    let mut assessments = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            assessments.extend(load_assessment_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_assessment(&path) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(assessments)
}

/// A warning from assessment validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The assessment ID.
    pub assessment_id: String,
    /// Warning message.
    pub message: String,
}

/// Validate an assessment for common issues.
///
/// An empty question list is reported here as a warning and rejected as an
/// error by `run`; a session over zero questions grades to nothing.
pub fn validate_assessment(assessment: &Assessment) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |message: String| {
        warnings.push(ValidationWarning {
            assessment_id: assessment.id.clone(),
            message,
        })
    };

    if assessment.questions.is_empty() {
        warn("assessment has no questions".into());
    }

    for (index, question) in assessment.questions.iter().enumerate() {
        if question.trim().is_empty() {
            warn(format!("question {index} is blank"));
        }
    }

    if assessment.questions.len() > MAX_GENERATED_QUESTIONS {
        warn(format!(
            "{} questions exceeds the generated maximum of {}",
            assessment.questions.len(),
            MAX_GENERATED_QUESTIONS
        ));
    }

    if assessment.topic.trim().is_empty() {
        warn("topic is blank".into());
    }

    if assessment.total_seconds < 60 {
        warn(format!(
            "total_seconds = {} leaves almost no time to answer",
            assessment.total_seconds
        ));
    }

    warnings
}
