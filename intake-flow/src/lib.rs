pub mod error;
pub mod model;
pub mod planner;
pub mod policy;
pub mod report;
pub mod runner;
pub mod storage;
pub mod transcript;

// Re-export commonly used types
pub use error::{IntakeError, Result};
pub use model::{ModelClient, ModelError};
pub use planner::{QuestionPlanner, Topic, topic_for};
pub use policy::{COMPLETION_THRESHOLD, InterviewState};
pub use report::{Report, ReportOutcome, ReportSection, ReportSynthesizer, SynthesisError};
pub use runner::{InterviewRunner, TurnOutcome};
pub use storage::{InMemorySessionStorage, SessionStorage};
pub use transcript::{Role, Session, Turn};
