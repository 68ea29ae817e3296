use super::{ImageGenerationService, ModelConfig, TextGenerationService, TextStream};
use crate::prompts::BlogPrompt;
use crate::{Error, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
enum StreamFailure {
    OnOpen(String),
    AfterFragments(usize, String),
}

/// Replays a fixed list of fragments as a text stream.
#[derive(Clone)]
pub struct MockTextGenerationClient {
    fragments: Vec<String>,
    failure: Option<StreamFailure>,
    prompts: Arc<Mutex<Vec<BlogPrompt>>>,
    configs: Arc<Mutex<Vec<ModelConfig>>>,
}

impl MockTextGenerationClient {
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
            failure: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            configs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragments.push(fragment.into());
        self
    }

    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Fail before the stream opens.
    pub fn failing_on_open(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(StreamFailure::OnOpen(message.into()));
        self
    }

    /// Yield the first `count` fragments, then a generation error.
    pub fn failing_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.failure = Some(StreamFailure::AfterFragments(count, message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<BlogPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn get_configs(&self) -> Vec<ModelConfig> {
        self.configs.lock().unwrap().clone()
    }
}

impl Default for MockTextGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationService for MockTextGenerationClient {
    async fn stream_completion(
        &self,
        prompt: &BlogPrompt,
        config: &ModelConfig,
    ) -> Result<TextStream> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.configs.lock().unwrap().push(*config);

        let items: Vec<Result<String>> = match &self.failure {
            Some(StreamFailure::OnOpen(message)) => {
                return Err(Error::Generation(message.clone()));
            }
            Some(StreamFailure::AfterFragments(count, message)) => {
                let mut items: Vec<Result<String>> =
                    self.fragments.iter().take(*count).cloned().map(Ok).collect();
                items.push(Err(Error::Generation(message.clone())));
                items
            }
            None => self.fragments.iter().cloned().map(Ok).collect(),
        };

        Ok(stream::iter(items).boxed())
    }
}

/// Returns queued image results in order, then default URLs once the queue
/// is empty.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(url.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(url)) => Ok(url),
            Some(Err(message)) => Err(Error::ImageGeneration(message)),
            None => Ok(format!("https://mock-images.example.com/{}.png", call)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> BlogPrompt {
        BlogPrompt {
            system: "system".to_string(),
            user: "user".to_string(),
        }
    }

    async fn drain(stream: TextStream) -> Vec<Result<String>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_mock_text_client_replays_fragments() {
        let client = MockTextGenerationClient::new().with_fragments(["a", "b", "c"]);

        let items = drain(
            client
                .stream_completion(&prompt(), &ModelConfig::default())
                .await
                .unwrap(),
        )
        .await;

        let text: String = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(text, "abc");
        assert_eq!(client.get_call_count(), 1);
        assert_eq!(client.get_prompts()[0], prompt());
    }

    #[tokio::test]
    async fn test_mock_text_client_fails_after_fragments() {
        let client = MockTextGenerationClient::new()
            .with_fragments(["a", "b", "c"])
            .failing_after(2, "reset");

        let items = drain(
            client
                .stream_completion(&prompt(), &ModelConfig::default())
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(items.len(), 3);
        assert!(matches!(items[2], Err(Error::Generation(_))));
    }

    #[tokio::test]
    async fn test_mock_text_client_fails_on_open() {
        let client = MockTextGenerationClient::new().failing_on_open("no route");
        let result = client
            .stream_completion(&prompt(), &ModelConfig::default())
            .await;
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[tokio::test]
    async fn test_mock_image_client_queue_then_default() {
        let client = MockImageGenerationClient::new()
            .with_url("https://u1")
            .with_failure("nope");

        assert_eq!(client.generate_image("one").await.unwrap(), "https://u1");
        assert!(matches!(
            client.generate_image("two").await,
            Err(Error::ImageGeneration(_))
        ));
        assert_eq!(
            client.generate_image("three").await.unwrap(),
            "https://mock-images.example.com/3.png"
        );
        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.get_prompts(), vec!["one", "two", "three"]);
    }
}
