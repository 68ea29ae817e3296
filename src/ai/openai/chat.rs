use super::client::OpenAiHttpClient;
use super::sse;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::{ModelConfig, TextGenerationService, TextStream};
use crate::prompts::BlogPrompt;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Long posts stream for minutes; the timeout covers the whole body.
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(600);

/// Streaming chat-completion client.
pub struct OpenAiTextClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiTextClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Ok(Self {
            http: OpenAiHttpClient::new(api_key, STREAM_TIMEOUT)?,
            model,
        })
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client, STREAM_TIMEOUT),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl TextGenerationService for OpenAiTextClient {
    async fn stream_completion(
        &self,
        prompt: &BlogPrompt,
        config: &ModelConfig,
    ) -> Result<TextStream> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            stream: true,
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        };

        tracing::debug!("Opening chat completion stream (model: {})", self.model);

        let response = self
            .http
            .send("/v1/chat/completions", &request)
            .await
            .map_err(Error::into_generation)?;

        Ok(sse::content_fragments(response.bytes_stream()))
    }
}
