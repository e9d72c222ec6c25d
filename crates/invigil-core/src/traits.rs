//! Collaborator trait definitions.
//!
//! These async traits are implemented by the `invigil-graders` crate for
//! the remote grading and question-generation services, and by test mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Answer grader trait
// ---------------------------------------------------------------------------

/// Trait for collaborators that score a batch of answer texts.
#[async_trait]
pub trait AnswerGrader: Send + Sync {
    /// Human-readable collaborator name (e.g. "remote").
    fn name(&self) -> &str;

    /// Grade every answer in the request, preserving order.
    ///
    /// Implementations return one [`GradeReply`] per answer. A reply the
    /// service mangled comes back as [`GradeReply::Unparsable`] rather than
    /// failing the call; an `Err` means the whole batch is unusable
    /// (network failure, rate limit, timeout, unparsable body).
    async fn grade_batch(&self, request: &GradeRequest) -> anyhow::Result<Vec<GradeReply>>;
}

/// A batch of answers to grade against one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Topic the questions were generated for.
    pub topic: String,
    /// Answer texts in question order.
    pub answers: Vec<String>,
}

/// One collaborator reply, already past wire-format differences.
///
/// The remote service answers either with `{score, feedback}` objects or
/// with delimited `"{score}|{feedback}"` strings; both shapes normalize to
/// this single tagged result so downstream code has one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradeReply {
    /// A score and feedback were recovered. The score is not yet clamped.
    Parsed { score: i64, feedback: String },
    /// The reply for this answer could not be understood.
    Unparsable,
}

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// Trait for collaborators that generate assessment questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Generate up to [`MAX_GENERATED_QUESTIONS`] questions for a topic.
    ///
    /// `regeneration` counts how many times the caller has asked for a
    /// fresh set. Fewer questions than the maximum is acceptable; zero is
    /// an error of this call (not of the session engine).
    async fn generate(&self, topic: &str, regeneration: u32) -> anyhow::Result<Vec<String>>;
}

/// Upper bound on questions a generation call returns.
pub const MAX_GENERATED_QUESTIONS: usize = 5;

// ---------------------------------------------------------------------------
// Delimited grade-line parsing
// ---------------------------------------------------------------------------

/// Parse a delimited `"{score}|{feedback}"` grade line.
///
/// Handles:
/// - Leading/trailing whitespace around both fields
/// - Feedback containing further `|` characters (split on the first only)
/// - A bare score with no delimiter (feedback missing)
///
/// Anything without a leading integer score is [`GradeReply::Unparsable`].
pub fn parse_grade_line(line: &str) -> GradeReply {
    let (score_part, feedback_part) = match line.split_once('|') {
        Some((score, feedback)) => (score, Some(feedback)),
        None => (line, None),
    };

    match score_part.trim().parse::<i64>() {
        Ok(score) => GradeReply::Parsed {
            score,
            feedback: feedback_part.map(|f| f.trim().to_string()).unwrap_or_default(),
        },
        Err(_) => GradeReply::Unparsable,
    }
}
