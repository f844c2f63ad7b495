//! Google Gemini REST client.
//!
//! [`GeminiClient`] speaks the `generateContent` endpoint and supports:
//! - Per-request model selection (text stages and illustration use
//!   different models through the same client)
//! - Schema-constrained JSON responses
//! - Image responses returned as inline base64 parts

mod client;
mod conversion;
mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
pub use dto::{
    Candidate, Content, GeminiRequest, GeminiResponse, GenerationConfig, ImageConfig, InlineData,
    Part, PromptFeedback, UsageMetadata,
};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, storyboard_error::GeminiError>;
