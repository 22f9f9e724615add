use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::{self, InterviewState};

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Agent,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "User",
            Role::Agent => "Agent",
            Role::System => "System",
        };
        f.write_str(name)
    }
}

/// One utterance in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}

/// Opening question asked right after the initial complaint
pub fn opening_question(initial_symptom: &str) -> String {
    format!(
        "Thank you for sharing your symptom: '{}'. To begin, can you tell me when you first noticed this symptom?",
        initial_symptom
    )
}

/// Full state of a single interview.
///
/// Turns are append-only. `is_complete` only ever moves from `false` to `true`;
/// a fresh interview gets a fresh `Session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub initial_symptom: String,
    turns: Vec<Turn>,
    is_complete: bool,
}

impl Session {
    /// Create a session seeded with the complaint and the opening question
    pub fn start(id: u64, initial_symptom: impl Into<String>) -> Self {
        let initial_symptom = initial_symptom.into();
        let turns = vec![
            Turn::user(initial_symptom.clone()),
            Turn::agent(opening_question(&initial_symptom)),
        ];
        Self {
            id,
            initial_symptom,
            turns,
            is_complete: false,
        }
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
    }

    pub fn mark_complete(&mut self) {
        self.is_complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn user_turn_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }

    /// Where the completion policy puts this transcript
    pub fn state(&self) -> InterviewState {
        if self.is_complete {
            InterviewState::Complete
        } else {
            policy::state_for(self.user_turn_count())
        }
    }

    /// Render the transcript as `role: text` lines
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role, t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_seeds_complaint_and_opening_question() {
        let session = Session::start(7, "headache");

        assert_eq!(session.id, 7);
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0], Turn::user("headache"));
        assert_eq!(session.turns()[1].role, Role::Agent);
        assert!(session.turns()[1].text.contains("'headache'"));
        assert!(!session.is_complete());
        assert_eq!(session.user_turn_count(), 1);
    }

    #[test]
    fn transcript_renders_role_prefixed_lines() {
        let mut session = Session::start(1, "cough");
        session.append(Role::User, "two days ago");

        let rendered = session.transcript();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "User: cough");
        assert!(lines[1].starts_with("Agent: Thank you for sharing"));
        assert_eq!(lines[2], "User: two days ago");
    }

    #[test]
    fn role_serializes_as_capitalized_name() {
        let json = serde_json::to_value(Turn::system("done")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "System", "text": "done" }));
    }

    #[test]
    fn mark_complete_wins_over_turn_count() {
        let mut session = Session::start(1, "rash");
        assert_eq!(session.state(), InterviewState::Collecting);

        session.mark_complete();
        assert_eq!(session.state(), InterviewState::Complete);
    }
}
