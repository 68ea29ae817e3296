//! Data models and structures
//!
//! Defines the blog generation request collected from the user and the
//! image records derived while assembling a document.

use crate::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_WORD_COUNT: u32 = 250;
pub const MAX_WORD_COUNT: u32 = 2000;
pub const WORD_COUNT_STEP: u32 = 250;
pub const MAX_IMAGE_COUNT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Humorous,
    Inspirational,
    Informative,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Humorous => "Humorous",
            Tone::Inspirational => "Inspirational",
            Tone::Informative => "Informative",
        };
        f.write_str(name)
    }
}

/// Validated blog parameters. Fields are private so a request can only be
/// built through [`GenerationRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    title: String,
    keywords: String,
    tone: Tone,
    target_word_count: u32,
    image_count: u32,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        keywords: impl Into<String>,
        tone: Tone,
        target_word_count: u32,
        image_count: u32,
    ) -> Result<Self> {
        let title = title.into().trim().to_string();
        let keywords = keywords.into().trim().to_string();

        if title.is_empty() {
            return Err(Error::Validation(
                "Please enter a blog title to generate content.".to_string(),
            ));
        }
        if keywords.split(',').all(|k| k.trim().is_empty()) {
            return Err(Error::Validation(
                "Please enter at least one keyword.".to_string(),
            ));
        }
        if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&target_word_count)
            || target_word_count % WORD_COUNT_STEP != 0
        {
            return Err(Error::Validation(format!(
                "Word count must be a multiple of {} between {} and {}, got {}",
                WORD_COUNT_STEP, MIN_WORD_COUNT, MAX_WORD_COUNT, target_word_count
            )));
        }
        if image_count > MAX_IMAGE_COUNT {
            return Err(Error::Validation(format!(
                "Number of images must be between 0 and {}, got {}",
                MAX_IMAGE_COUNT, image_count
            )));
        }

        Ok(Self {
            title,
            keywords,
            tone,
            target_word_count,
            image_count,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn target_word_count(&self) -> u32 {
        self.target_word_count
    }

    pub fn image_count(&self) -> u32 {
        self.image_count
    }
}

/// A marker found in streamed text, e.g. `[IMAGE PLACEHOLDER: a desk]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlaceholder {
    pub raw_marker: String,
    pub description: String,
    /// Position in extraction order, starting at 0.
    pub index: usize,
}

/// Outcome of one image request. `url` is `None` when the request failed and
/// the marker was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub index: usize,
    pub description: String,
    pub url: Option<String>,
}

impl GeneratedImage {
    pub fn succeeded(&self) -> bool {
        self.url.is_some()
    }
}
