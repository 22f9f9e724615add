//! InterviewRunner – loads the active session, performs exactly **one** interview step, and
//! persists the updated session back to storage.
//!
//! Every public method takes the runner's lock for its whole duration, model round-trip
//! included, so concurrent requests are applied one after another and never interleave
//! their appends.
//!
//! ```rust,ignore
//! let runner = InterviewRunner::new(model, Arc::new(InMemorySessionStorage::new()));
//! let session = runner.start("headache").await?;
//! match runner.continue_interview("started yesterday").await? {
//!     TurnOutcome::AwaitingAnswer { question, .. } => println!("{question}"),
//!     TurnOutcome::Completed { report, .. } => println!("{report:?}"),
//! }
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    error::{IntakeError, Result},
    model::ModelClient,
    planner::QuestionPlanner,
    policy::InterviewState,
    report::{ReportOutcome, ReportSynthesizer},
    storage::SessionStorage,
    transcript::{Role, Session},
};

pub const COMPLETION_MESSAGE: &str = "The interview is complete. Thank you for your patience. I have generated a structured report for review. Please find the JSON report below.";

pub const EMPTY_SYMPTOM: &str = "Please provide an initial symptom to start the interview.";
pub const EMPTY_RESPONSE: &str = "Please provide a response to continue.";
pub const NO_INTERVIEW: &str = "No interview is in progress. Please start a new one.";
pub const ALREADY_COMPLETE: &str = "Interview is already complete. Please start a new one.";
pub const NOT_COMPLETE: &str = "Interview is not yet complete. Cannot generate report.";

/// Result of one `continue_interview` step
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The interview goes on; `question` has been appended as an Agent turn
    AwaitingAnswer { session: Session, question: String },
    /// The last answer completed the interview
    Completed {
        session: Session,
        report: ReportOutcome,
    },
}

impl TurnOutcome {
    pub fn session(&self) -> &Session {
        match self {
            TurnOutcome::AwaitingAnswer { session, .. } => session,
            TurnOutcome::Completed { session, .. } => session,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

#[derive(Debug, Default)]
struct ActiveInterview {
    last_id: u64,
    current: Option<u64>,
}

/// Drives the single active interview
pub struct InterviewRunner {
    storage: Arc<dyn SessionStorage>,
    planner: QuestionPlanner,
    synthesizer: ReportSynthesizer,
    active: Mutex<ActiveInterview>,
}

impl InterviewRunner {
    pub fn new(model: Arc<dyn ModelClient>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            planner: QuestionPlanner::new(model.clone()),
            synthesizer: ReportSynthesizer::new(model),
            active: Mutex::new(ActiveInterview::default()),
        }
    }

    /// Replace the active interview with a fresh one
    pub async fn start(&self, initial_symptom: &str) -> Result<Session> {
        let initial_symptom = initial_symptom.trim();
        if initial_symptom.is_empty() {
            return Err(IntakeError::InputValidation(EMPTY_SYMPTOM.to_string()));
        }

        let mut active = self.active.lock().await;
        let id = active.last_id + 1;
        let session = Session::start(id, initial_symptom);
        self.storage.save(session.clone()).await?;

        if let Some(previous) = active.current {
            if let Err(e) = self.storage.delete(previous).await {
                warn!(interview_id = previous, error = %e, "Failed to discard previous interview");
            }
        }
        active.last_id = id;
        active.current = Some(id);

        info!(interview_id = id, "Interview started");
        Ok(session)
    }

    /// Record the user's answer, then either ask the next question or finish with a report
    pub async fn continue_interview(&self, user_response: &str) -> Result<TurnOutcome> {
        let active = self.active.lock().await;
        let mut session = self.load_active(&active).await?;

        if session.is_complete() {
            return Err(IntakeError::InvalidState(ALREADY_COMPLETE.to_string()));
        }

        let user_response = user_response.trim();
        if user_response.is_empty() {
            return Err(IntakeError::InputValidation(EMPTY_RESPONSE.to_string()));
        }

        session.append(Role::User, user_response);
        let user_turns = session.user_turn_count();
        info!(interview_id = session.id, user_turns, "Answer recorded");

        if session.state() == InterviewState::Complete {
            session.mark_complete();
            let report = ReportOutcome::from(self.synthesizer.synthesize(&session).await);
            session.append(Role::System, COMPLETION_MESSAGE);
            self.storage.save(session.clone()).await?;

            info!(interview_id = session.id, "Interview complete");
            return Ok(TurnOutcome::Completed { session, report });
        }

        let question = self.planner.next_question(&session).await;
        session.append(Role::Agent, question.clone());
        self.storage.save(session.clone()).await?;

        Ok(TurnOutcome::AwaitingAnswer { session, question })
    }

    /// Regenerate the report for a completed interview
    pub async fn report(&self) -> Result<ReportOutcome> {
        let active = self.active.lock().await;
        if active.current.is_none() {
            return Err(IntakeError::InvalidState(NOT_COMPLETE.to_string()));
        }

        let session = self.load_active(&active).await?;
        if !session.is_complete() {
            return Err(IntakeError::InvalidState(NOT_COMPLETE.to_string()));
        }

        Ok(self.synthesizer.synthesize(&session).await.into())
    }

    /// Append a turn to the active interview
    pub async fn append(&self, role: Role, text: &str) -> Result<Session> {
        let active = self.active.lock().await;
        let mut session = self.load_active(&active).await?;
        session.append(role, text);
        self.storage.save(session.clone()).await?;
        Ok(session)
    }

    pub async fn mark_complete(&self) -> Result<Session> {
        let active = self.active.lock().await;
        let mut session = self.load_active(&active).await?;
        session.mark_complete();
        self.storage.save(session.clone()).await?;
        Ok(session)
    }

    /// Best-effort completion after an unexpected failure, so the caller cannot
    /// keep feeding answers into an inconsistent transcript
    pub async fn force_complete(&self) {
        match self.mark_complete().await {
            Ok(session) => warn!(interview_id = session.id, "Interview force-completed"),
            Err(IntakeError::InvalidState(_)) => {}
            Err(e) => error!(error = %e, "Failed to force-complete interview"),
        }
    }

    /// Snapshot of the active interview, if any
    pub async fn current(&self) -> Result<Option<Session>> {
        let active = self.active.lock().await;
        match active.current {
            Some(id) => self.storage.get(id).await,
            None => Ok(None),
        }
    }

    async fn load_active(&self, active: &ActiveInterview) -> Result<Session> {
        let id = active
            .current
            .ok_or_else(|| IntakeError::InvalidState(NO_INTERVIEW.to_string()))?;
        self.storage
            .get(id)
            .await?
            .ok_or(IntakeError::SessionNotFound(id))
    }
}
