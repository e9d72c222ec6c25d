//! Session state machine and async engine.
//!
//! [`Session`] is the synchronous core: it owns the clock, the violation
//! monitor, and the answer store, and enforces the
//! `Active -> Frozen -> Graded` lifecycle with at-most-one grading per
//! session. [`SessionEngine`] wraps it in a single-inbox event loop: one
//! `mpsc` channel of commands plus an internal 1 Hz tick, processed
//! strictly one event at a time, so late events arriving after a freeze
//! hit an absorbing barrier instead of racing the grading call.

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::answers::AnswerStore;
use crate::clock::{ClockEvent, CountdownClock};
use crate::error::{GradingUnavailable, SessionError};
use crate::grading::{GradeJob, GradingOrchestrator};
use crate::model::{Assessment, FreezeCause, GradingOutcome};
use crate::violations::{ViolationMonitor, ViolationPolicy};

/// Lifecycle of one assessment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Accepting answers, counting down, counting violations.
    Active,
    /// Inputs closed; grading pending or in flight.
    Frozen,
    /// Terminal. Only the outcome remains readable.
    Graded,
}

/// Synchronous session state machine.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    assessment: Assessment,
    clock: CountdownClock,
    monitor: ViolationMonitor,
    answers: AnswerStore,
    violation_policy: ViolationPolicy,
    state: SessionState,
    freeze_cause: Option<FreezeCause>,
    grade_job: Option<GradeJob>,
    outcome: Option<GradingOutcome>,
}

impl Session {
    /// Start a session: the clock and the violation monitor begin.
    pub fn start(assessment: Assessment, violation_policy: ViolationPolicy) -> Self {
        let clock = CountdownClock::start(assessment.total_seconds);
        let answers = AnswerStore::new(assessment.question_count());
        Self {
            id: Uuid::new_v4(),
            assessment,
            clock,
            monitor: ViolationMonitor::new(),
            answers,
            violation_policy,
            state: SessionState::Active,
            freeze_cause: None,
            grade_job: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    pub fn violation_count(&self) -> u32 {
        self.monitor.count()
    }

    pub fn freeze_cause(&self) -> Option<FreezeCause> {
        self.freeze_cause
    }

    /// Overwrite an answer. Only valid while `Active`.
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::SessionFrozen);
        }
        self.answers.set_answer(index, text)
    }

    /// Record a focus-loss violation and return the new count.
    ///
    /// After a freeze the event is ignored (the stale count is returned).
    /// Under an auto-submit policy, crossing the threshold freezes the
    /// session.
    pub fn record_violation(&mut self) -> u32 {
        if self.state != SessionState::Active {
            return self.monitor.count();
        }
        let count = self.monitor.record();
        if let ViolationPolicy::AutoSubmit { threshold } = self.violation_policy {
            if ViolationMonitor::crossed_threshold(count, threshold) {
                self.freeze(FreezeCause::ViolationLimit);
            }
        }
        count
    }

    /// Advance the clock by one second. Expiry freezes the session.
    pub fn on_tick(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        if let Some(ClockEvent::Expired) = self.clock.tick() {
            self.freeze(FreezeCause::TimeExpired);
        }
    }

    /// Explicit submission. Returns `false` as a no-op when already
    /// frozen or graded.
    pub fn request_submit(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.freeze(FreezeCause::Submitted);
        true
    }

    fn freeze(&mut self, cause: FreezeCause) {
        if self.state != SessionState::Active {
            return;
        }
        self.clock.stop();
        self.monitor.freeze();
        let answers = self.answers.freeze();
        self.grade_job = Some(GradeJob {
            topic: self.assessment.topic.clone(),
            answers,
            elapsed_seconds: self.clock.elapsed_seconds(),
            total_seconds: self.clock.total_seconds(),
            violation_count: self.monitor.count(),
            freeze_cause: cause,
        });
        self.freeze_cause = Some(cause);
        self.state = SessionState::Frozen;
        tracing::info!(session = %self.id, %cause, "session frozen");
    }

    /// Take the one grading job a frozen session yields.
    ///
    /// Returns `Some` exactly once per session; the at-most-one grading
    /// guarantee hangs on this.
    pub fn take_grade_job(&mut self) -> Option<GradeJob> {
        if self.state != SessionState::Frozen {
            return None;
        }
        self.grade_job.take()
    }

    /// Store the grading outcome and enter the terminal state.
    pub fn complete(&mut self, outcome: GradingOutcome) {
        debug_assert_eq!(self.state, SessionState::Frozen);
        self.outcome = Some(outcome);
        self.state = SessionState::Graded;
        tracing::info!(session = %self.id, "session graded");
    }

    /// The final outcome. Only valid once `Graded`.
    pub fn summary(&self) -> Result<&GradingOutcome, SessionError> {
        self.outcome.as_ref().ok_or(SessionError::NotGraded)
    }
}

// ---------------------------------------------------------------------------
// Async engine
// ---------------------------------------------------------------------------

/// Read-only view of a live session.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub remaining_seconds: u32,
    pub violation_count: u32,
}

enum SessionCommand {
    SetAnswer {
        index: usize,
        text: String,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    RecordViolation {
        reply: oneshot::Sender<u32>,
    },
    Submit {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Everything a graded session leaves behind.
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub session_id: Uuid,
    pub assessment: Assessment,
    pub answers: Vec<String>,
    pub freeze_cause: FreezeCause,
    pub outcome: GradingOutcome,
}

/// Cloneable handle for injecting session events from the outside world.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn set_answer(&self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        let cmd = SessionCommand::SetAnswer {
            index,
            text: text.into(),
            reply,
        };
        if self.tx.send(cmd).await.is_err() {
            return Err(SessionError::SessionFrozen);
        }
        rx.await.unwrap_or(Err(SessionError::SessionFrozen))
    }

    /// Report a focus-loss event. Returns the violation count, or an error
    /// once the engine has shut down.
    pub async fn record_violation(&self) -> Result<u32, SessionError> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(SessionCommand::RecordViolation { reply })
            .await
            .is_err()
        {
            return Err(SessionError::SessionFrozen);
        }
        rx.await.map_err(|_| SessionError::SessionFrozen)
    }

    /// Request submission. `Ok(false)` means the request was a no-op.
    pub async fn request_submit(&self) -> Result<bool, SessionError> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(SessionCommand::Submit { reply })
            .await
            .is_err()
        {
            return Err(SessionError::SessionFrozen);
        }
        rx.await.map_err(|_| SessionError::SessionFrozen)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(SessionCommand::Snapshot { reply })
            .await
            .is_err()
        {
            return Err(SessionError::SessionFrozen);
        }
        rx.await.map_err(|_| SessionError::SessionFrozen)
    }
}

/// Drives one [`Session`] to completion.
pub struct SessionEngine {
    session: Session,
    orchestrator: GradingOrchestrator,
    rx: mpsc::Receiver<SessionCommand>,
}

impl SessionEngine {
    /// Start a session and return the engine plus its command handle.
    pub fn start(
        assessment: Assessment,
        violation_policy: ViolationPolicy,
        orchestrator: GradingOrchestrator,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(32);
        let session = Session::start(assessment, violation_policy);
        (
            Self {
                session,
                orchestrator,
                rx,
            },
            SessionHandle { tx },
        )
    }

    /// Process events until the session is graded.
    ///
    /// Exactly one grading call happens per run. Commands still queued when
    /// grading finishes are answered through the absorbing barrier (edits
    /// rejected, submits no-ops) before the completed session is returned.
    pub async fn run(self) -> Result<CompletedSession, GradingUnavailable> {
        let Self {
            mut session,
            orchestrator,
            mut rx,
        } = self;

        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
        // The first tick of a tokio interval fires immediately; burn it so
        // the clock starts counting a full second from now.
        ticker.tick().await;
        let mut inbox_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    session.on_tick();
                }
                cmd = rx.recv(), if inbox_open => {
                    match cmd {
                        Some(cmd) => apply_command(&mut session, cmd),
                        None => inbox_open = false,
                    }
                }
            }

            if let Some(job) = session.take_grade_job() {
                let outcome = orchestrator.grade(&job).await?;
                let answers = job.answers;
                session.complete(outcome);

                // Reject anything that raced the freeze.
                while let Ok(cmd) = rx.try_recv() {
                    apply_command(&mut session, cmd);
                }

                let outcome = session
                    .summary()
                    .map_err(|e| GradingUnavailable(e.to_string()))?
                    .clone();

                return Ok(CompletedSession {
                    session_id: session.id(),
                    assessment: session.assessment().clone(),
                    answers,
                    freeze_cause: session
                        .freeze_cause()
                        .unwrap_or(FreezeCause::Submitted),
                    outcome,
                });
            }
        }
    }
}

fn apply_command(session: &mut Session, cmd: SessionCommand) {
    match cmd {
        SessionCommand::SetAnswer { index, text, reply } => {
            let _ = reply.send(session.set_answer(index, text));
        }
        SessionCommand::RecordViolation { reply } => {
            let _ = reply.send(session.record_violation());
        }
        SessionCommand::Submit { reply } => {
            let _ = reply.send(session.request_submit());
        }
        SessionCommand::Snapshot { reply } => {
            let _ = reply.send(SessionSnapshot {
                state: session.state(),
                remaining_seconds: session.remaining_seconds(),
                violation_count: session.violation_count(),
            });
        }
    }
}
