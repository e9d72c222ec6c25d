//! Core data model types for invigil.
//!
//! These are the fundamental types that the entire invigil system uses to
//! represent an assessment, per-answer grades, and the final session output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score a single answer can receive.
pub const MAX_ANSWER_SCORE: u8 = 25;

/// A fixed set of questions a learner attempts under a countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier for this assessment.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Topic the questions were generated for.
    pub topic: String,
    /// Description of what this assessment covers.
    #[serde(default)]
    pub description: String,
    /// Ordered question texts, indexed 0..N-1. Immutable once a session starts.
    pub questions: Vec<String>,
    /// Total allotted time in seconds.
    #[serde(default = "default_total_seconds")]
    pub total_seconds: u32,
}

fn default_total_seconds() -> u32 {
    // 50 minutes, the standard sitting length.
    3000
}

impl Assessment {
    /// Number of questions in this assessment.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Score and feedback for one answer, produced by either the remote grading
/// service or the local simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrade {
    /// Points awarded, always within `[0, 25]`.
    pub score: u8,
    /// Free-text feedback for the learner.
    pub feedback: String,
}

impl RawGrade {
    /// Grade assigned to an answer whose trimmed text is empty.
    pub fn unanswered() -> Self {
        Self {
            score: 0,
            feedback: "No answer provided.".to_string(),
        }
    }
}

/// Itemized aggregate of a graded session.
///
/// Invariant: `final_total = max(0, raw_total + time_bonus - violation_penalty)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Sum of per-answer scores.
    pub raw_total: u32,
    /// Reward for early completion.
    pub time_bonus: u32,
    /// Deduction for focus-loss violations.
    pub violation_penalty: u32,
    /// Bounded final score, never negative.
    pub final_total: u32,
    /// Seconds elapsed between session start and freeze.
    pub time_spent_seconds: u32,
    /// Focus-loss violations recorded during the session.
    pub violation_count: u32,
}

/// Which of the three freeze triggers ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeCause {
    /// The learner explicitly submitted.
    Submitted,
    /// The countdown reached zero.
    TimeExpired,
    /// The violation count crossed the auto-submit threshold.
    ViolationLimit,
}

impl fmt::Display for FreezeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeCause::Submitted => write!(f, "submitted"),
            FreezeCause::TimeExpired => write!(f, "time expired"),
            FreezeCause::ViolationLimit => write!(f, "violation limit"),
        }
    }
}

/// The immutable output of a graded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingOutcome {
    /// One grade per question index, in question order.
    pub grades: Vec<RawGrade>,
    /// Itemized aggregate.
    pub summary: ScoreSummary,
    /// True when the local simulator produced the grades. Callers should
    /// display a disclosure banner when set.
    pub simulated: bool,
}

impl GradingOutcome {
    /// Maximum raw score attainable for `question_count` questions.
    pub fn max_raw_total(question_count: usize) -> u32 {
        question_count as u32 * MAX_ANSWER_SCORE as u32
    }
}
