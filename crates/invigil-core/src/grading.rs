//! Grading orchestration.
//!
//! Takes a frozen answer set, attempts the remote grading collaborator
//! under a bounded timeout, and falls back to the local simulator when the
//! remote path fails or returns an unusable batch. Per-answer problems
//! degrade gracefully; only whole-batch problems trigger the fallback.

use std::sync::Arc;
use std::time::Duration;

use crate::error::GradingUnavailable;
use crate::model::{FreezeCause, GradingOutcome, RawGrade};
use crate::scoring::{aggregate, clamp_score, ScoringPolicy};
use crate::simulate::SimulatedGrader;
use crate::traits::{AnswerGrader, GradeReply, GradeRequest};

/// Bounded wait for the remote grading call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Feedback substituted when a single reply cannot be understood.
const FEEDBACK_PLACEHOLDER: &str = "Feedback generation failed.";

/// Everything the orchestrator needs to know about a frozen session.
#[derive(Debug, Clone)]
pub struct GradeJob {
    pub topic: String,
    pub answers: Vec<String>,
    pub elapsed_seconds: u32,
    pub total_seconds: u32,
    pub violation_count: u32,
    pub freeze_cause: FreezeCause,
}

/// Orchestrates remote grading with an unconditional local fallback.
pub struct GradingOrchestrator {
    remote: Option<Arc<dyn AnswerGrader>>,
    timeout: Duration,
    policy: ScoringPolicy,
    simulator_seed: Option<u64>,
}

impl GradingOrchestrator {
    /// Orchestrator that tries `remote` first.
    pub fn new(remote: Arc<dyn AnswerGrader>, policy: ScoringPolicy) -> Self {
        Self {
            remote: Some(remote),
            timeout: DEFAULT_REMOTE_TIMEOUT,
            policy,
            simulator_seed: None,
        }
    }

    /// Orchestrator that skips the remote path entirely.
    pub fn simulated_only(policy: ScoringPolicy) -> Self {
        Self {
            remote: None,
            timeout: DEFAULT_REMOTE_TIMEOUT,
            policy,
            simulator_seed: None,
        }
    }

    /// Override the bounded wait for the remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pin the simulator seed for reproducible fallback grades.
    pub fn with_simulator_seed(mut self, seed: u64) -> Self {
        self.simulator_seed = Some(seed);
        self
    }

    /// Grade a frozen session.
    ///
    /// Always produces an outcome; the learner never receives a bare
    /// failure. The `Err` branch exists for the taxonomy's fatal
    /// both-paths-failed condition and is not reachable while the local
    /// simulator maps answers 1:1.
    pub async fn grade(&self, job: &GradeJob) -> Result<GradingOutcome, GradingUnavailable> {
        let (grades, simulated) = match self.try_remote(job).await {
            Some(grades) => (grades, false),
            None => (self.simulate(&job.answers), true),
        };

        if grades.len() != job.answers.len() {
            tracing::error!(
                expected = job.answers.len(),
                got = grades.len(),
                "grading produced a mismatched batch"
            );
            return Err(GradingUnavailable(format!(
                "expected {} grades, got {}",
                job.answers.len(),
                grades.len()
            )));
        }

        let summary = aggregate(
            &grades,
            job.elapsed_seconds,
            job.total_seconds,
            job.violation_count,
            &self.policy,
        );

        Ok(GradingOutcome {
            grades,
            summary,
            simulated,
        })
    }

    /// Attempt the remote path. `None` means fall back for the whole batch.
    async fn try_remote(&self, job: &GradeJob) -> Option<Vec<RawGrade>> {
        let remote = self.remote.as_ref()?;

        // Trimmed-empty answers are graded locally and never sent out.
        let non_empty: Vec<String> = job
            .answers
            .iter()
            .filter(|a| !a.trim().is_empty())
            .cloned()
            .collect();

        if non_empty.is_empty() {
            return Some(job.answers.iter().map(|_| RawGrade::unanswered()).collect());
        }

        let request = GradeRequest {
            topic: job.topic.clone(),
            answers: non_empty,
        };

        let replies = match tokio::time::timeout(self.timeout, remote.grade_batch(&request)).await {
            Ok(Ok(replies)) => replies,
            Ok(Err(e)) => {
                tracing::warn!(grader = remote.name(), error = %e, "remote grading failed, simulating");
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    grader = remote.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "remote grading timed out, simulating"
                );
                return None;
            }
        };

        if replies.len() != request.answers.len() {
            tracing::warn!(
                expected = request.answers.len(),
                got = replies.len(),
                "remote reply count mismatch, simulating"
            );
            return None;
        }

        let mut replies = replies.into_iter();
        let grades = job
            .answers
            .iter()
            .map(|answer| {
                if answer.trim().is_empty() {
                    RawGrade::unanswered()
                } else {
                    // Count checked above, so the reply stream cannot run dry.
                    reply_to_grade(replies.next().unwrap_or(GradeReply::Unparsable))
                }
            })
            .collect();

        Some(grades)
    }

    fn simulate(&self, answers: &[String]) -> Vec<RawGrade> {
        let mut simulator = match self.simulator_seed {
            Some(seed) => SimulatedGrader::with_seed(seed),
            None => SimulatedGrader::new(),
        };
        simulator.grade(answers)
    }
}

/// Normalize one collaborator reply into a bounded grade.
fn reply_to_grade(reply: GradeReply) -> RawGrade {
    match reply {
        GradeReply::Parsed { score, feedback } => RawGrade {
            score: clamp_score(score),
            feedback: if feedback.trim().is_empty() {
                FEEDBACK_PLACEHOLDER.to_string()
            } else {
                feedback
            },
        },
        GradeReply::Unparsable => RawGrade {
            score: 0,
            feedback: FEEDBACK_PLACEHOLDER.to_string(),
        },
    }
}
