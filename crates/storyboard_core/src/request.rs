//! Request and response types for generation calls.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// What kind of content the caller wants back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// JSON constrained by a schema (OpenAPI-subset object as accepted by
    /// the service).
    Json {
        /// Response schema
        schema: serde_json::Value,
    },
    /// A rendered image.
    Image {
        /// Aspect ratio such as "3:4"; the service default when absent
        aspect_ratio: Option<String>,
    },
}

/// Provider-neutral generation request.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerateRequest, Message, ResponseFormat};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Describe a lighthouse at dusk")])
///     .max_tokens(Some(256))
///     .temperature(Some(0.7))
///     .model(Some("gemini-2.5-flash".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), Some(256));
/// assert_eq!(*request.response_format(), ResponseFormat::Text);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    max_tokens: Option<u32>,
    /// Sampling temperature
    temperature: Option<f32>,
    /// Model identifier; the driver default when absent
    model: Option<String>,
    /// Requested response content
    response_format: ResponseFormat,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// All text parts of every message, in order.
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(Message::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse::new(vec![
///     Output::Text("{\"story\":".to_string()),
///     Output::Text("\"...\"}".to_string()),
///     Output::Image { mime: Some("image/png".to_string()), data: vec![1, 2, 3] },
/// ]);
///
/// assert_eq!(response.text(), "{\"story\":\"...\"}");
/// assert_eq!(response.first_image().map(|(_, data)| data.len()), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Wraps a list of outputs.
    pub fn new(outputs: Vec<Output>) -> Self {
        Self { outputs }
    }

    /// Concatenation of all text outputs. JSON outputs are rendered back to
    /// text so schema-constrained callers can parse uniformly.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.clone()),
                Output::Json(value) => Some(value.to_string()),
                Output::Image { .. } => None,
            })
            .collect()
    }

    /// The first image part found, as `(mime, bytes)`.
    pub fn first_image(&self) -> Option<(Option<&str>, &[u8])> {
        self.outputs.iter().find_map(|output| match output {
            Output::Image { mime, data } => Some((mime.as_deref(), data.as_slice())),
            _ => None,
        })
    }
}
