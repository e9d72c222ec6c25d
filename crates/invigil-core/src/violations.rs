//! Focus-loss violation counting.
//!
//! The monitor only counts. Whether a threshold crossing warns the learner
//! or auto-submits the session is the state machine's decision, driven by
//! [`ViolationPolicy`].

use serde::{Deserialize, Serialize};

/// What the session does when the violation count crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Keep counting; the caller surfaces warnings.
    WarnOnly,
    /// Freeze and grade the session once `threshold` violations accumulate.
    AutoSubmit { threshold: u32 },
}

impl Default for ViolationPolicy {
    fn default() -> Self {
        ViolationPolicy::AutoSubmit { threshold: 3 }
    }
}

/// Accumulates focus-loss events for one session.
///
/// The count is monotonically non-decreasing while the session is active
/// and frozen once it ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationMonitor {
    count: u32,
    frozen: bool,
}

impl ViolationMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one violation and return the new count.
    ///
    /// After [`freeze`](Self::freeze) the count no longer moves; the stale
    /// event is ignored rather than treated as an error.
    pub fn record(&mut self) -> u32 {
        if !self.frozen {
            self.count += 1;
        }
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Stop accepting further violations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether `count` violations cross `threshold`. Pure; the monitor
    /// never acts on the answer.
    pub fn crossed_threshold(count: u32, threshold: u32) -> bool {
        threshold > 0 && count >= threshold
    }
}
