use std::sync::Arc;
use tracing::{error, info};

use crate::{model::ModelClient, transcript::Session};

pub const INTERVIEWER_PREAMBLE: &str = "You are a meticulous, empathetic medical intake specialist (non-physician). \
You guide the user through a non-diagnostic symptom interview by asking one structured, open-ended question at a time, \
gathering details on onset, duration, severity and modifying factors of a symptom. \
Never provide a diagnosis or medical advice.";

pub const CLOSING_QUESTION: &str = "Is there anything else you think is important for a doctor to know about this symptom or your overall health right now?";

pub const FALLBACK_QUESTION: &str =
    "I apologize, an error occurred. Can you please summarize your symptoms one more time?";

/// History of Present Illness facet the next question should cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Severity,
    Onset,
    Modifiers,
    Associated,
    Closing,
}

impl Topic {
    /// Topic text handed to the model, or the literal closing question
    pub fn prompt(&self) -> &'static str {
        match self {
            Topic::Severity => {
                "What is the exact location, quality (e.g., sharp, dull), and severity (on a scale of 1-10) of the symptom?"
            }
            Topic::Onset => {
                "When did this symptom first start, and how has it changed over time (e.g., constant, intermittent)?"
            }
            Topic::Modifiers => "What makes the symptom better, and what makes it worse?",
            Topic::Associated => {
                "Are you experiencing any other related symptoms, even minor ones?"
            }
            Topic::Closing => CLOSING_QUESTION,
        }
    }
}

/// Pick the topic for a transcript containing `user_turns` user turns
pub fn topic_for(user_turns: usize) -> Topic {
    match user_turns {
        0 | 1 => Topic::Severity,
        2 => Topic::Onset,
        3 => Topic::Modifiers,
        4 => Topic::Associated,
        _ => Topic::Closing,
    }
}

fn question_prompt(topic: Topic, session: &Session) -> String {
    format!(
        r#"Based on the history and the initial symptom ('{symptom}'), generate the next single, best follow-up question.
The question MUST be one of the core elements of a standard medical interview (HPI - History of Present Illness) to gather necessary details for the report.

The next specific topic to cover is: '{topic}'.

Current Conversation History:
---
{history}
---

Generate ONLY the single question text. Do NOT include a diagnosis or medical advice."#,
        symptom = session.initial_symptom,
        topic = topic.prompt(),
        history = session.transcript(),
    )
}

/// Chooses and phrases the next follow-up question
#[derive(Clone)]
pub struct QuestionPlanner {
    model: Arc<dyn ModelClient>,
}

impl QuestionPlanner {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Never fails: model errors are replaced by [`FALLBACK_QUESTION`].
    /// The session is not touched; appending the question is up to the caller.
    pub async fn next_question(&self, session: &Session) -> String {
        let user_turns = session.user_turn_count();
        let topic = topic_for(user_turns);

        if topic == Topic::Closing {
            return CLOSING_QUESTION.to_string();
        }

        info!(
            interview_id = session.id,
            user_turns,
            topic = ?topic,
            model = %self.model.model_id(),
            "Generating follow-up question"
        );

        let prompt = question_prompt(topic, session);
        match self.model.complete(INTERVIEWER_PREAMBLE, &prompt).await {
            Ok(question) => question.trim().to_string(),
            Err(e) => {
                error!(interview_id = session.id, error = %e, "Error generating question");
                FALLBACK_QUESTION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scripted::ScriptedModel;
    use crate::transcript::Role;

    #[test]
    fn topic_follows_user_turn_count() {
        assert_eq!(topic_for(0), Topic::Severity);
        assert_eq!(topic_for(1), Topic::Severity);
        assert_eq!(topic_for(2), Topic::Onset);
        assert_eq!(topic_for(3), Topic::Modifiers);
        assert_eq!(topic_for(4), Topic::Associated);
        assert_eq!(topic_for(5), Topic::Closing);
        assert_eq!(topic_for(42), Topic::Closing);
    }

    #[tokio::test]
    async fn asks_model_for_selected_topic_and_trims_reply() {
        let model = Arc::new(ScriptedModel::new().reply("  How has it changed since then?\n"));
        let planner = QuestionPlanner::new(model.clone());

        let mut session = Session::start(1, "headache");
        session.append(Role::User, "started yesterday");

        let question = planner.next_question(&session).await;
        assert_eq!(question, "How has it changed since then?");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(Topic::Onset.prompt()));
        assert!(prompts[0].contains("('headache')"));
        assert!(prompts[0].contains("User: started yesterday"));
    }

    #[tokio::test]
    async fn model_failure_yields_apology() {
        let planner = QuestionPlanner::new(Arc::new(ScriptedModel::new().fail("timeout")));
        let session = Session::start(1, "dizziness");

        assert_eq!(planner.next_question(&session).await, FALLBACK_QUESTION);
    }

    #[tokio::test]
    async fn closing_question_skips_model() {
        let model = Arc::new(ScriptedModel::new());
        let planner = QuestionPlanner::new(model.clone());

        let mut session = Session::start(1, "back pain");
        for answer in ["a", "b", "c", "d"] {
            session.append(Role::User, answer);
        }

        assert_eq!(planner.next_question(&session).await, CLOSING_QUESTION);
        assert!(model.prompts().is_empty());
    }
}
