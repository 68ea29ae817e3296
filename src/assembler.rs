//! Blog document assembly: prompt, streamed text, then image substitution.

use crate::ai::{
    ImageGenerationService, ModelConfig, OpenAiImageClient, OpenAiTextClient,
    TextGenerationService,
};
use crate::config::Config;
use crate::document::{self, DocumentMetrics, FrozenDocument, StreamedDocument};
use crate::models::{GeneratedImage, GenerationRequest, ImagePlaceholder};
use crate::observer::DocumentObserver;
use crate::prompts::{self, BlogPrompt};
use crate::{placeholders, Error, Result};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Where an assembly run currently is. Observers see every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BuildingPrompt,
    Streaming,
    ExtractingPlaceholders,
    GeneratingImages,
    Done,
    /// The stream failed before producing any text.
    Failed,
}

/// Final result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    pub markdown: String,
    /// One entry per marker that was sent to the image model, in order.
    pub images: Vec<GeneratedImage>,
    /// Set when the stream broke after some text had already arrived.
    pub generation_error: Option<String>,
}

impl AssembledDocument {
    /// URLs of the images that were generated, in marker order.
    pub fn image_urls(&self) -> Vec<&str> {
        self.images
            .iter()
            .filter_map(|image| image.url.as_deref())
            .collect()
    }

    pub fn is_partial(&self) -> bool {
        self.generation_error.is_some()
    }

    pub fn metrics(&self) -> DocumentMetrics {
        DocumentMetrics::from_text(&self.markdown)
    }

    pub fn plain_text(&self) -> String {
        document::plain_text(&self.markdown)
    }
}

/// Injectable service bundle used to construct [`Assembler`] in tests/harnesses.
pub struct AssemblerServices {
    pub text: Box<dyn TextGenerationService>,
    pub images: Box<dyn ImageGenerationService>,
}

/// Drives a single generation request from prompt to finished document.
///
/// Each call to [`Assembler::assemble`] works on its own buffer, so one
/// assembler can serve many requests.
pub struct Assembler {
    text: Box<dyn TextGenerationService>,
    images: Box<dyn ImageGenerationService>,
    model_config: ModelConfig,
    image_delay: Duration,
}

impl Assembler {
    pub fn with_services(services: AssemblerServices, image_delay: Duration) -> Self {
        Self {
            text: services.text,
            images: services.images,
            model_config: ModelConfig::default(),
            image_delay,
        }
    }

    /// Construct OpenAI-backed services from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        info!("Text model: {}", config.text_model);
        info!("Image model: {}", config.image_model);

        let text = OpenAiTextClient::new_with_client(
            config.openai_api_key.clone(),
            config.text_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone());

        let images = OpenAiImageClient::new_with_client(
            config.openai_api_key.clone(),
            config.image_model.clone(),
            http_client,
        )
        .with_base_url(config.openai_base_url.clone());

        Ok(Self::with_services(
            AssemblerServices {
                text: Box::new(text),
                images: Box::new(images),
            },
            config.image_delay,
        ))
    }

    pub fn with_model_config(mut self, model_config: ModelConfig) -> Self {
        self.model_config = model_config;
        self
    }

    /// Generate the post for `request`.
    ///
    /// Returns `Err` only when the text stream fails before any content
    /// arrives. A stream that breaks later yields a partial document with
    /// `generation_error` set and no image phase. Image failures never abort:
    /// the marker stays in the text and the next marker is processed.
    pub async fn assemble(
        &self,
        request: &GenerationRequest,
        observer: &dyn DocumentObserver,
    ) -> Result<AssembledDocument> {
        info!("Generating blog post: {}", request.title());

        enter(observer, Phase::BuildingPrompt);
        let prompt = prompts::build_blog_prompt(request);

        enter(observer, Phase::Streaming);
        let mut streamed = StreamedDocument::new();
        let generation_error = match self.stream_into(&prompt, &mut streamed, observer).await {
            Ok(()) => None,
            Err(e) if streamed.is_empty() => {
                error!("Text generation failed before any content: {}", e);
                enter(observer, Phase::Failed);
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "Text generation stopped after {} chars, keeping partial text: {}",
                    streamed.as_str().len(),
                    e
                );
                Some(e.to_string())
            }
        };

        let mut document = streamed.freeze();
        let images = if generation_error.is_none() && request.image_count() > 0 {
            self.generate_images(request.image_count() as usize, &mut document, observer)
                .await
        } else {
            Vec::new()
        };

        enter(observer, Phase::Done);
        info!(
            "Blog post ready ({} images generated)",
            images.iter().filter(|image| image.succeeded()).count()
        );

        Ok(AssembledDocument {
            markdown: document.into_string(),
            images,
            generation_error,
        })
    }

    async fn stream_into(
        &self,
        prompt: &BlogPrompt,
        document: &mut StreamedDocument,
        observer: &dyn DocumentObserver,
    ) -> Result<()> {
        let mut stream = self
            .text
            .stream_completion(prompt, &self.model_config)
            .await
            .map_err(Error::into_generation)?;

        while let Some(item) = stream.next().await {
            let fragment = item.map_err(Error::into_generation)?;
            document.append(&fragment);
            observer.on_fragment(&fragment, document.as_str());
        }

        debug!("Stream finished ({} chars)", document.as_str().len());
        Ok(())
    }

    async fn generate_images(
        &self,
        image_count: usize,
        document: &mut FrozenDocument,
        observer: &dyn DocumentObserver,
    ) -> Vec<GeneratedImage> {
        enter(observer, Phase::ExtractingPlaceholders);
        let found = placeholders::extract(document.as_str());
        let total = found.len().min(image_count);

        if found.len() < image_count {
            info!(
                "Requested {} images but the text contains {} markers",
                image_count,
                found.len()
            );
        }
        if total == 0 {
            return Vec::new();
        }

        enter(observer, Phase::GeneratingImages);
        let mut images = Vec::with_capacity(total);

        for (position, placeholder) in found.into_iter().take(total).enumerate() {
            if position > 0 && !self.image_delay.is_zero() {
                tokio::time::sleep(self.image_delay).await;
            }
            observer.on_image_started(&placeholder, total);
            images.push(self.resolve(placeholder, document, observer).await);
        }

        images
    }

    async fn resolve(
        &self,
        placeholder: ImagePlaceholder,
        document: &mut FrozenDocument,
        observer: &dyn DocumentObserver,
    ) -> GeneratedImage {
        let prompt = prompts::build_image_prompt(&placeholder.description);

        match self.images.generate_image(&prompt).await {
            Ok(url) => {
                info!("Generated image {}: {}", placeholder.index + 1, url);
                let markdown =
                    placeholders::image_markdown(placeholder.index, &url, &placeholder.description);
                document.substitute(&placeholder.raw_marker, &markdown);

                let image = GeneratedImage {
                    index: placeholder.index,
                    description: placeholder.description,
                    url: Some(url),
                };
                observer.on_image_inserted(&image, document.as_str());
                image
            }
            Err(e) => {
                let e = e.into_image_generation();
                warn!("Image {} failed: {}", placeholder.index + 1, e);
                observer.on_image_failed(&placeholder, &e);
                GeneratedImage {
                    index: placeholder.index,
                    description: placeholder.description,
                    url: None,
                }
            }
        }
    }
}

fn enter(observer: &dyn DocumentObserver, phase: Phase) {
    debug!("Assembly phase: {:?}", phase);
    observer.on_phase(phase);
}
