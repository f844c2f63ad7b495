//! Model and response settings shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use storyboard_core::ResponsePolicy;

/// Default model for the concept and structure stages.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for page and panel illustration.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default illustration aspect ratio (portrait page).
pub const DEFAULT_ASPECT_RATIO: &str = "3:4";

/// Settings applied to every request a stage sends.
///
/// # Examples
///
/// ```
/// use storyboard_core::ResponsePolicy;
/// use storyboard_pipeline::PipelineSettings;
///
/// let settings = PipelineSettings::builder()
///     .temperature(Some(0.9))
///     .policy(ResponsePolicy::Lenient)
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.text_model(), "gemini-2.5-flash");
/// assert_eq!(*settings.policy(), ResponsePolicy::Lenient);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// Model for the concept and structure stages
    #[builder(default = "DEFAULT_TEXT_MODEL.to_string()")]
    text_model: String,
    /// Model for illustration
    #[builder(default = "DEFAULT_IMAGE_MODEL.to_string()")]
    image_model: String,
    /// Sampling temperature for the text stages
    #[builder(default)]
    temperature: Option<f32>,
    /// Output token cap for the text stages
    #[builder(default)]
    max_output_tokens: Option<u32>,
    /// Aspect ratio requested for images
    #[builder(default = "Some(DEFAULT_ASPECT_RATIO.to_string())")]
    aspect_ratio: Option<String>,
    /// How to treat responses that do not match the requested shape
    #[builder(default)]
    policy: ResponsePolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            aspect_ratio: Some(DEFAULT_ASPECT_RATIO.to_string()),
            policy: ResponsePolicy::Strict,
        }
    }
}

impl PipelineSettings {
    /// Creates a settings builder.
    pub fn builder() -> PipelineSettingsBuilder {
        PipelineSettingsBuilder::default()
    }

    /// Same settings with a different response policy.
    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }
}
