//! Session report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Assessment, FreezeCause, GradingOutcome};
use crate::session::CompletedSession;

/// A complete record of one graded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The assessment that was attempted.
    pub assessment: Assessment,
    /// The learner's frozen answers, in question order.
    pub answers: Vec<String>,
    /// What ended the session.
    pub freeze_cause: FreezeCause,
    /// Grades and the itemized summary.
    pub outcome: GradingOutcome,
}

impl SessionReport {
    /// Build a report from a completed session.
    pub fn from_completed(completed: CompletedSession) -> Self {
        Self {
            id: completed.session_id,
            created_at: Utc::now(),
            assessment: completed.assessment,
            answers: completed.answers,
            freeze_cause: completed.freeze_cause,
            outcome: completed.outcome,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawGrade, ScoreSummary};

    fn make_report() -> SessionReport {
        SessionReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            assessment: Assessment {
                id: "graphs-101".into(),
                name: "Graphs".into(),
                topic: "Graphs".into(),
                description: String::new(),
                questions: vec!["Define a DAG.".into()],
                total_seconds: 3000,
            },
            answers: vec!["A graph with no directed cycles.".into()],
            freeze_cause: FreezeCause::Submitted,
            outcome: GradingOutcome {
                grades: vec![RawGrade {
                    score: 22,
                    feedback: "Excellent answer!".into(),
                }],
                summary: ScoreSummary {
                    raw_total: 22,
                    time_bonus: 20,
                    violation_penalty: 0,
                    final_total: 42,
                    time_spent_seconds: 600,
                    violation_count: 0,
                },
                simulated: false,
            },
        }
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.assessment.id, "graphs-101");
        assert_eq!(loaded.outcome.summary.final_total, 42);
        assert_eq!(loaded.freeze_cause, FreezeCause::Submitted);
    }

    #[test]
    fn save_creates_parent_directories() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("report.json");

        report.save_json(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn load_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(SessionReport::load_json(&path).is_err());
    }
}
