//! Turn-completion policy.
//!
//! An interview is `Collecting` until the fifth user turn is appended. The
//! initial complaint counts as the first user turn, so only four follow-up
//! answers are collected before the report is produced.

use serde::{Deserialize, Serialize};

/// Number of user turns after which the interview is complete
pub const COMPLETION_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewState {
    Collecting,
    Complete,
}

pub fn state_for(user_turns: usize) -> InterviewState {
    if user_turns >= COMPLETION_THRESHOLD {
        InterviewState::Complete
    } else {
        InterviewState::Collecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_exactly_at_threshold() {
        for n in 0..COMPLETION_THRESHOLD {
            assert_eq!(state_for(n), InterviewState::Collecting, "n = {n}");
        }
        assert_eq!(state_for(5), InterviewState::Complete);
        assert_eq!(state_for(6), InterviewState::Complete);
    }
}
