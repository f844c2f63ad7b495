//! Generation service integrations for Storyboard.
//!
//! Each provider sits behind its own feature flag. Only Google Gemini is
//! implemented; it covers both the text/JSON stages and page illustration.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storyboard_core::{GenerateRequest, Message};
//! use storyboard_interface::StoryboardDriver;
//! use storyboard_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Pitch a one-line story about a lighthouse")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    Candidate, Content, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiRequest,
    GeminiResponse, GeminiResult, GenerationConfig, ImageConfig, InlineData, Part,
    PromptFeedback, UsageMetadata,
};
