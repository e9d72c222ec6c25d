//! Score aggregation.
//!
//! Pure functions turning per-answer raw scores, elapsed time, and the
//! violation count into an itemized [`ScoreSummary`]. Deterministic given
//! its inputs; no side effects.

use serde::{Deserialize, Serialize};

use crate::model::{RawGrade, ScoreSummary, MAX_ANSWER_SCORE};

/// Tunable bonus/penalty formula parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Points awarded per whole spare minute left on the clock.
    #[serde(default = "default_bonus_per_minute")]
    pub bonus_per_spare_minute: u32,
    /// Cap on the time bonus.
    #[serde(default = "default_max_time_bonus")]
    pub max_time_bonus: u32,
    /// Points deducted per recorded violation.
    #[serde(default = "default_penalty_per_violation")]
    pub penalty_per_violation: u32,
    /// Cap on the violation penalty.
    #[serde(default = "default_max_violation_penalty")]
    pub max_violation_penalty: u32,
}

fn default_bonus_per_minute() -> u32 {
    2
}
fn default_max_time_bonus() -> u32 {
    20
}
fn default_penalty_per_violation() -> u32 {
    5
}
fn default_max_violation_penalty() -> u32 {
    25
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            bonus_per_spare_minute: default_bonus_per_minute(),
            max_time_bonus: default_max_time_bonus(),
            penalty_per_violation: default_penalty_per_violation(),
            max_violation_penalty: default_max_violation_penalty(),
        }
    }
}

/// Clamp an arbitrary parsed score into the valid `[0, 25]` answer range.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, MAX_ANSWER_SCORE as i64) as u8
}

/// Time bonus for finishing with spare time on the clock.
///
/// Sliding scale: `bonus_per_spare_minute` points per whole spare minute,
/// capped at `max_time_bonus`. Monotonically non-increasing in
/// `elapsed_seconds` and zero once the allotted time is used up.
pub fn time_bonus(elapsed_seconds: u32, total_seconds: u32, policy: &ScoringPolicy) -> u32 {
    let spare = total_seconds.saturating_sub(elapsed_seconds);
    ((spare / 60) * policy.bonus_per_spare_minute).min(policy.max_time_bonus)
}

/// Penalty for recorded violations, capped by policy.
pub fn violation_penalty(violation_count: u32, policy: &ScoringPolicy) -> u32 {
    violation_count
        .saturating_mul(policy.penalty_per_violation)
        .min(policy.max_violation_penalty)
}

/// Combine per-answer grades and session facts into the itemized summary.
///
/// `final_total = max(0, raw_total + time_bonus - violation_penalty)`, with
/// every intermediate term preserved so callers can render a breakdown.
pub fn aggregate(
    grades: &[RawGrade],
    elapsed_seconds: u32,
    total_seconds: u32,
    violation_count: u32,
    policy: &ScoringPolicy,
) -> ScoreSummary {
    let raw_total: u32 = grades.iter().map(|g| g.score as u32).sum();
    let time_bonus = time_bonus(elapsed_seconds, total_seconds, policy);
    let violation_penalty = violation_penalty(violation_count, policy);
    let final_total = (raw_total + time_bonus).saturating_sub(violation_penalty);

    ScoreSummary {
        raw_total,
        time_bonus,
        violation_penalty,
        final_total,
        time_spent_seconds: elapsed_seconds,
        violation_count,
    }
}
