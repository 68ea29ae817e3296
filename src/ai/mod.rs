//! AI service integration for blog text and image generation
//!
//! Provides the service traits the assembler depends on, the OpenAI-backed
//! implementations, and in-memory mocks for tests.

pub mod mock;
pub mod openai;

pub use mock::{MockImageGenerationClient, MockTextGenerationClient};
pub use openai::{OpenAiImageClient, OpenAiTextClient};

use crate::prompts::BlogPrompt;
use crate::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Incremental text fragments in generation order. An `Err` item ends the stream.
pub type TextStream = BoxStream<'static, Result<String>>;

/// Sampling parameters for the text model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 4096,
        }
    }
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Open a streaming completion. Fails before yielding anything when the
    /// call cannot be established.
    async fn stream_completion(
        &self,
        prompt: &BlogPrompt,
        config: &ModelConfig,
    ) -> Result<TextStream>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate a single image and return its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
