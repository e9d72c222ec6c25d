//! Session and grader error types.
//!
//! `SessionError` covers component-local validation failures that are
//! returned synchronously to the caller. `GraderError` represents failures
//! when interacting with the remote grading collaborator; defined in
//! `invigil-core` so the orchestrator can classify them for fallback
//! decisions without string matching. Every `GraderError` routes the whole
//! batch to the local simulator.

use thiserror::Error;

/// Validation failures on the session surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Answer index outside `[0, question_count)`.
    #[error("answer index {index} out of range (0..{count})")]
    InvalidIndex { index: usize, count: usize },

    /// Mutation attempted after the session froze. Not fatal.
    #[error("session is frozen, no further input accepted")]
    SessionFrozen,

    /// Summary requested before grading completed.
    #[error("session has not been graded yet")]
    NotGraded,
}

/// Errors that can occur when interacting with the remote grading service.
#[derive(Debug, Error)]
pub enum GraderError {
    /// The service returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service returned an error response.
    #[error("grading API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body could not be parsed at all.
    #[error("malformed grading response: {0}")]
    MalformedResponse(String),
}

/// Both the remote and local grading paths failed to produce output.
///
/// The local path has no external dependency, so this is treated as a fatal
/// condition and logged if it ever occurs.
#[derive(Debug, Error)]
#[error("grading unavailable: {0}")]
pub struct GradingUnavailable(pub String);
