//! Completion backends.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::SuggestConfig;
use crate::error::{Result, SuggestError};

/// A source of free-form chat completions.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Send `messages` and return the assistant's text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

/// Perplexity (OpenAI-compatible) chat completion client.
pub struct PerplexityClient {
    client: Client,
    config: SuggestConfig,
}

impl PerplexityClient {
    /// Create a client from configuration.
    pub fn new(config: SuggestConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SuggestConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }
}

#[async_trait]
impl Completion for PerplexityClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            SuggestError::Configuration("PERPLEXITY_API_KEY is not set".to_string())
        })?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending completion request (model: {})", request.model);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);

            return Err(SuggestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SuggestError::Parse("completion had no content".to_string()))
    }
}
