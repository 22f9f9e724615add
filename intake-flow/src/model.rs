use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the completion provider
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    #[error("Model client not configured: {0}")]
    NotConfigured(String),

    #[error("Completion request failed: {0}")]
    RequestFailed(String),
}

/// Text-completion boundary.
///
/// `preamble` sets the role the model plays, `prompt` is the task itself.
/// Implementations return the raw completion text; callers decide how to
/// interpret it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Identifier of the model completions are requested from
    fn model_id(&self) -> &str;

    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, ModelError>;
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions in order and records every prompt it sees
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        pub fn fail(self, reason: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(ModelError::RequestFailed(reason.to_string())));
            self
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _preamble: &str, prompt: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::RequestFailed("no scripted reply".into())))
        }
    }
}
