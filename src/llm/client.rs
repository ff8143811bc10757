//! Groq chat backend built on Rig.

use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::groq;
use tracing::debug;

use crate::config::ModelConfig;
use crate::llm::error::{LlmError, LlmResult};
use crate::llm::{ChatModel, ChatRequest, ModelFuture};

/// Chat model served by Groq.
///
/// The credential is looked up in the environment on every call, so a key
/// exported after startup is picked up without a restart.
#[derive(Clone, Debug)]
pub struct GroqChat {
    config: ModelConfig,
}

impl GroqChat {
    /// Create a new Groq backend.
    #[must_use]
    pub const fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    fn api_key(&self) -> LlmResult<String> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.config.api_key_env.clone()))
    }

    async fn run(&self, request: ChatRequest) -> LlmResult<String> {
        let api_key = self.api_key()?;

        let builder = groq::Client::<ReqwestClient>::builder().api_key(api_key);
        let builder = if let Some(base_url) = &self.config.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build().map_err(LlmError::from)?;
        let model = client.completion_model(self.config.model.clone());

        debug!(
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            temperature = request.temperature,
            "Sending completion request"
        );

        let completion = model
            .completion_request(request.prompt)
            .preamble(request.preamble)
            .temperature(request.temperature)
            .build();

        let response = model.completion(completion).await?;
        let text = extract_text(&response.choice);
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

impl ChatModel for GroqChat {
    fn check_credentials(&self) -> LlmResult<()> {
        self.api_key().map(|_| ())
    }

    fn complete(&self, request: ChatRequest) -> ModelFuture<'_, LlmResult<String>> {
        Box::pin(self.run(request))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Extract text from assistant response.
fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
