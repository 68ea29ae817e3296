pub mod chat;
pub mod client;
pub mod image;
pub mod sse;
pub mod types;

pub use chat::OpenAiTextClient;
pub use client::OpenAiHttpClient;
pub use image::OpenAiImageClient;
