//! Mock grader for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use invigil_core::error::GraderError;
use invigil_core::traits::{AnswerGrader, GradeReply, GradeRequest};

/// A mock grading collaborator for exercising the session engine without
/// real HTTP calls.
///
/// Returns a configurable fixed score per answer, or a scripted failure.
pub struct MockGrader {
    fixed_score: i64,
    fail_with: Option<GraderError>,
    call_count: AtomicU32,
    last_request: Mutex<Option<GradeRequest>>,
}

impl MockGrader {
    /// Mock that grades every answer with the same score.
    pub fn with_fixed_score(score: i64) -> Self {
        Self {
            fixed_score: score,
            fail_with: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Mock whose first (and every) call fails with the given error.
    pub fn failing(error: GraderError) -> Self {
        Self {
            fixed_score: 0,
            fail_with: Some(error),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of calls made to this grader.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request received.
    pub fn last_request(&self) -> Option<GradeRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGrader for MockGrader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn grade_batch(&self, request: &GradeRequest) -> anyhow::Result<Vec<GradeReply>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(error) = &self.fail_with {
            anyhow::bail!("{error}");
        }

        Ok(request
            .answers
            .iter()
            .map(|_| GradeReply::Parsed {
                score: self.fixed_score,
                feedback: "Mock feedback.".into(),
            })
            .collect())
    }
}
