use intake_flow::{ReportOutcome, Turn, TurnOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub initial_symptom: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContinueInterviewRequest {
    #[serde(default)]
    pub user_response: String,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub interview_id: u64,
    pub initial_question: String,
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct ContinueInterviewResponse {
    pub interview_id: u64,
    /// `None` once the interview is complete
    pub next_question: Option<String>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_report: Option<ReportOutcome>,
    pub history: Vec<Turn>,
}

impl From<TurnOutcome> for ContinueInterviewResponse {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::AwaitingAnswer { session, question } => Self {
                interview_id: session.id,
                next_question: Some(question),
                is_complete: false,
                structured_report: None,
                history: session.turns().to_vec(),
            },
            TurnOutcome::Completed { session, report } => Self {
                interview_id: session.id,
                next_question: None,
                is_complete: true,
                structured_report: Some(report),
                history: session.turns().to_vec(),
            },
        }
    }
}
