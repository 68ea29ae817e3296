//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Could not generate image: {0}")]
    ImageGeneration(String),
}

impl Error {
    /// Re-tag any error raised while streaming text as a generation failure.
    pub fn into_generation(self) -> Self {
        match self {
            Error::Generation(_) => self,
            Error::AiProvider(message) => Error::Generation(message),
            other => Error::Generation(other.to_string()),
        }
    }

    /// Re-tag any error raised while requesting an image as an image failure.
    pub fn into_image_generation(self) -> Self {
        match self {
            Error::ImageGeneration(_) => self,
            Error::AiProvider(message) => Error::ImageGeneration(message),
            other => Error::ImageGeneration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_generation_unwraps_provider_message() {
        let err = Error::AiProvider("status 500".to_string()).into_generation();
        assert_eq!(err.to_string(), "Text generation failed: status 500");
    }

    #[test]
    fn test_into_generation_keeps_existing_generation_error() {
        let err = Error::Generation("boom".to_string()).into_generation();
        assert!(matches!(err, Error::Generation(ref m) if m == "boom"));
    }

    #[test]
    fn test_into_image_generation_wraps_other_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = Error::from(io).into_image_generation();
        assert!(matches!(err, Error::ImageGeneration(ref m) if m.contains("disk")));
    }
}
