use thiserror::Error;

/// Errors surfaced by the interview runner
#[derive(Error, Debug)]
pub enum IntakeError {
    /// A required field was empty after trimming
    #[error("{0}")]
    InputValidation(String),

    /// The request does not apply to the current interview state
    #[error("{0}")]
    InvalidState(String),

    #[error("Session not found: {0}")]
    SessionNotFound(u64),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl IntakeError {
    /// Whether the error is the caller's fault (as opposed to an internal failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IntakeError::InputValidation(_) | IntakeError::InvalidState(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
