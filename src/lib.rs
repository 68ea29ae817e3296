//! Ghostwriter - AI-assisted blog post generator
//!
//! Builds a writing prompt from the user's blog parameters, streams the post
//! from a chat-completion model, then swaps image markers in the text for
//! generated images.

pub mod ai;
pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod observer;
pub mod placeholders;
pub mod prompts;

pub use error::{Error, Result};
