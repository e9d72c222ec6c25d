//! invigil-graders — remote collaborator integrations.
//!
//! Implements the `AnswerGrader` and `QuestionSource` traits against the
//! remote grading and question-generation services, plus a mock grader for
//! tests and configuration loading.

pub mod config;
pub mod mock;
pub mod questions;
pub mod remote;

pub use config::{load_config, load_config_from, InvigilConfig, ServiceConfig};
pub use mock::MockGrader;
pub use questions::RemoteQuestionSource;
pub use remote::RemoteGrader;
