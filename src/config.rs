//! Runtime configuration loaded from the environment (and `.env`).

use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub text_model: String,
    pub image_model: String,
    /// Courtesy pause between successive image requests.
    pub image_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            Error::Configuration(
                "OPENAI_API_KEY not set. Please configure your OpenAI API key".to_string(),
            )
        })?;

        let image_delay = match get("GHOSTWRITER_IMAGE_DELAY_MS") {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| {
                    Error::Configuration(format!(
                        "GHOSTWRITER_IMAGE_DELAY_MS must be a whole number of milliseconds, got '{}'",
                        raw
                    ))
                })?;
                Duration::from_millis(millis)
            }
            None => Duration::from_millis(DEFAULT_IMAGE_DELAY_MS),
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            text_model: get("GHOSTWRITER_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: get("GHOSTWRITER_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            image_delay,
        })
    }
}
