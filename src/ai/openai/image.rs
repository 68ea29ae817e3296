use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const IMAGE_SIZE: &str = "1024x1024";
pub const IMAGE_QUALITY: &str = "standard";
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Ok(Self {
            http: OpenAiHttpClient::new(api_key, IMAGE_TIMEOUT)?,
            model,
        })
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client, IMAGE_TIMEOUT),
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

    async fn request_url(&self, prompt: &str) -> Result<String> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: IMAGE_SIZE.to_string(),
            quality: IMAGE_QUALITY.to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| Error::ImageGeneration("No image URL in OpenAI response".to_string()))
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Sending image generation request (model: {})", self.model);
        self.request_url(prompt)
            .await
            .map_err(Error::into_image_generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_image_returns_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_json(serde_json::json!({
                "model": "dall-e-3",
                "prompt": "a desk, high quality, professional photography style",
                "n": 1,
                "size": "1024x1024",
                "quality": "standard"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": 1,
                "data": [{ "url": "https://images.example.com/desk.png", "revised_prompt": "desk" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiImageClient::new("key".to_string(), "dall-e-3".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let url = client
            .generate_image("a desk, high quality, professional photography style")
            .await
            .unwrap();
        assert_eq!(url, "https://images.example.com/desk.png");
    }

    #[tokio::test]
    async fn test_generate_image_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_string("content policy violation"))
            .mount(&server)
            .await;

        let client = OpenAiImageClient::new("key".to_string(), "dall-e-3".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let err = client.generate_image("a desk").await.unwrap_err();
        assert!(matches!(err, Error::ImageGeneration(ref m) if m.contains("content policy")));
    }

    #[test]
    fn test_shared_client_gets_image_timeout() {
        let client =
            OpenAiImageClient::new_with_client("k".to_string(), "m".to_string(), reqwest::Client::new());
        assert_eq!(client.http.timeout(), IMAGE_TIMEOUT);
    }

    #[tokio::test]
    async fn test_stalled_response_times_out_on_shared_client() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({
                        "data": [{ "url": "https://images.example.com/late.png" }]
                    })),
            )
            .mount(&server)
            .await;

        let client = OpenAiImageClient::new_with_client(
            "key".to_string(),
            "dall-e-3".to_string(),
            reqwest::Client::new(),
        )
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let err = client.generate_image("a desk").await.unwrap_err();

        assert!(matches!(err, Error::ImageGeneration(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_generate_image_without_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "b64_json": "AAAA" }]
            })))
            .mount(&server)
            .await;

        let client = OpenAiImageClient::new("key".to_string(), "dall-e-3".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let err = client.generate_image("a desk").await.unwrap_err();
        assert!(matches!(err, Error::ImageGeneration(_)));
    }
}
