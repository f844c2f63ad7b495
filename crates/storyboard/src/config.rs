//! Configuration loading for the storyboard binary.
//!
//! Settings are merged from several sources, later ones winning:
//! - Bundled defaults (include_str! from storyboard.toml)
//! - `~/.config/storyboard/storyboard.toml`
//! - `./storyboard.toml`
//! - An explicit file passed with `--config`

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use storyboard_core::{Mode, ProductionConfig, ResponsePolicy};
use storyboard_error::{BuilderError, ConfigError, StoryboardError, StoryboardResult};
use storyboard_orchestrator::StudioSettings;
use storyboard_pipeline::PipelineSettings;
use tracing::debug;

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

/// Generation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeminiSection {
    /// Model for the concept and structure stages
    text_model: String,
    /// Model for illustration
    image_model: String,
    /// API base URL override
    #[serde(default)]
    base_url: Option<String>,
    /// Sampling temperature for the text stages
    #[serde(default)]
    temperature: Option<f32>,
    /// Output token cap for the text stages
    #[serde(default)]
    max_output_tokens: Option<u32>,
}

/// Default page grid and mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProductionSection {
    /// Pages per storyboard
    pages: u32,
    /// Panels per page
    panels: u32,
    /// Creative or quick
    mode: Mode,
}

/// Illustration and parsing behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StudioSection {
    /// Pause before each image request, in milliseconds
    illustration_pause_ms: u64,
    /// Queue every page as soon as a storyboard exists
    auto_illustrate: bool,
    /// Strict or lenient handling of malformed model output
    response_policy: ResponsePolicy,
    /// Aspect ratio requested for images
    aspect_ratio: String,
}

/// Complete storyboard configuration.
///
/// # Example
///
/// ```
/// use storyboard::StoryboardConfig;
///
/// let config = StoryboardConfig::from_toml_str("[production]\npages = 3")?;
/// assert_eq!(*config.production().pages(), 3);
/// assert_eq!(*config.production().panels(), 4);
/// # Ok::<(), storyboard::StoryboardError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryboardConfig {
    /// `[gemini]` section
    gemini: GeminiSection,
    /// `[production]` section
    production: ProductionSection,
    /// `[studio]` section
    studio: StudioSection,
}

impl StoryboardConfig {
    /// Load configuration from the bundled defaults and the user's files.
    pub fn load() -> StoryboardResult<Self> {
        Self::load_with(None)
    }

    /// Load configuration, layering `explicit` on top of everything else.
    ///
    /// The explicit file must exist; the home and working-directory files
    /// are optional.
    pub fn load_with(explicit: Option<&Path>) -> StoryboardResult<Self> {
        debug!(
            explicit = ?explicit,
            "Loading configuration with precedence: explicit > current dir > home dir > bundled defaults"
        );

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        Self::finish(builder)
    }

    /// Bundled defaults overridden by a TOML string.
    pub fn from_toml_str(overrides: &str) -> StoryboardResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StoryboardResult<Self> {
        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Settings for the pipeline stages.
    pub fn pipeline_settings(&self) -> StoryboardResult<PipelineSettings> {
        let aspect_ratio = Some(self.studio.aspect_ratio.trim())
            .filter(|ratio| !ratio.is_empty())
            .map(str::to_string);

        PipelineSettings::builder()
            .text_model(self.gemini.text_model.clone())
            .image_model(self.gemini.image_model.clone())
            .temperature(self.gemini.temperature)
            .max_output_tokens(self.gemini.max_output_tokens)
            .aspect_ratio(aspect_ratio)
            .policy(self.studio.response_policy)
            .build()
            .map_err(|e| BuilderError::from_builder(e).into())
    }

    /// Settings for the orchestrator.
    pub fn studio_settings(&self) -> StudioSettings {
        StudioSettings::default()
            .with_illustration_pause(Duration::from_millis(self.studio.illustration_pause_ms))
            .with_auto_illustrate(self.studio.auto_illustrate)
    }

    /// The configured page grid and mode, validated against the bounds.
    pub fn production_config(&self) -> StoryboardResult<ProductionConfig> {
        Ok(ProductionConfig::new(
            self.production.pages,
            self.production.panels,
            self.production.mode,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config = StoryboardConfig::from_toml_str("").unwrap();
        assert_eq!(config.gemini().text_model(), "gemini-2.5-flash");
        assert_eq!(config.gemini().image_model(), "gemini-2.5-flash-image");
        assert!(config.gemini().base_url().is_none());
        assert_eq!(*config.production().mode(), Mode::Creative);
        assert_eq!(*config.studio().response_policy(), ResponsePolicy::Strict);

        let production = config.production_config().unwrap();
        assert_eq!(production.total_panels(), 20);
    }

    #[test]
    fn overrides_merge_per_key() {
        let config = StoryboardConfig::from_toml_str(
            r#"
            [gemini]
            temperature = 0.4

            [studio]
            illustration_pause_ms = 0
            response_policy = "lenient"
            "#,
        )
        .unwrap();

        assert_eq!(*config.gemini().temperature(), Some(0.4));
        assert_eq!(config.gemini().text_model(), "gemini-2.5-flash");
        assert!(*config.studio().auto_illustrate());

        let studio = config.studio_settings();
        assert!(studio.illustration_pause.is_zero());

        let pipeline = config.pipeline_settings().unwrap();
        assert_eq!(*pipeline.policy(), ResponsePolicy::Lenient);
        assert_eq!(pipeline.aspect_ratio().as_deref(), Some("3:4"));
    }

    #[test]
    fn blank_aspect_ratio_is_omitted() {
        let config = StoryboardConfig::from_toml_str("[studio]\naspect_ratio = \"\"").unwrap();
        assert!(config.pipeline_settings().unwrap().aspect_ratio().is_none());
    }

    #[test]
    fn out_of_bounds_grid_is_rejected() {
        let config = StoryboardConfig::from_toml_str("[production]\npanels = 12").unwrap();
        assert!(config.production_config().is_err());
    }

    #[test]
    fn unknown_mode_fails_to_parse() {
        let err = StoryboardConfig::from_toml_str("[production]\nmode = \"frantic\"").unwrap_err();
        assert!(err.user_message().contains("Failed to parse configuration"));
    }
}
