use async_trait::async_trait;
use intake_flow::{ModelClient, ModelError};
use rig::{agent::Agent, client::CompletionClient, completion::Prompt, providers::openrouter};

/// Completion client backed by OpenRouter
pub struct OpenRouterModelClient {
    client: openrouter::Client,
    model: String,
}

impl OpenRouterModelClient {
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client: openrouter::Client::new(api_key),
            model: model.into(),
        }
    }

    fn get_llm_agent(&self, preamble: &str) -> Agent<openrouter::CompletionModel> {
        self.client.agent(&self.model).preamble(preamble).build()
    }
}

#[async_trait]
impl ModelClient for OpenRouterModelClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, preamble: &str, prompt: &str) -> Result<String, ModelError> {
        let agent = self.get_llm_agent(preamble);
        agent
            .prompt(prompt.to_string())
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))
    }
}
