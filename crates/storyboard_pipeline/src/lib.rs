//! The three generation stages of a storyboard production.
//!
//! - [`ConceptDeveloper`] turns a seed idea into a story and screenplay.
//! - [`StoryboardStructurer`] partitions a screenplay into pages of panels.
//! - [`PageIllustrator`] renders one page (or one panel) as an image.
//!
//! Each stage is generic over a [`StoryboardDriver`] and stateless apart
//! from its [`PipelineSettings`]; [`Pipeline`] bundles all three over a
//! shared driver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod concept;
mod extraction;
mod illustrate;
mod prompts;
mod schema;
mod settings;
mod structure;
mod wire;

pub use concept::ConceptDeveloper;
pub use extraction::extract_json_object;
pub use illustrate::PageIllustrator;
pub use prompts::{SKETCH_STYLE, compose_page_prompt, compose_scene_prompt, referenced_characters};
pub use schema::{concept_schema, storyboard_schema};
pub use settings::{
    DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, PipelineSettings,
    PipelineSettingsBuilder,
};
pub use structure::StoryboardStructurer;

use storyboard_core::{GenerateRequest, Message, ResponseFormat};
use storyboard_error::{BuilderError, StoryboardResult};
use storyboard_interface::StoryboardDriver;

/// All three stages over clones of one driver.
#[derive(Debug, Clone)]
pub struct Pipeline<D> {
    /// Concept stage
    pub concept: ConceptDeveloper<D>,
    /// Structure stage
    pub structurer: StoryboardStructurer<D>,
    /// Illustration stage
    pub illustrator: PageIllustrator<D>,
}

impl<D: StoryboardDriver + Clone> Pipeline<D> {
    /// Builds every stage over `driver` with the same settings.
    pub fn new(driver: D, settings: PipelineSettings) -> Self {
        Self {
            concept: ConceptDeveloper::new(driver.clone(), settings.clone()),
            structurer: StoryboardStructurer::new(driver.clone(), settings.clone()),
            illustrator: PageIllustrator::new(driver, settings),
        }
    }
}

/// Schema-constrained text request shared by the concept and structure
/// stages.
pub(crate) fn json_request(
    settings: &PipelineSettings,
    system: &str,
    prompt: String,
    schema: serde_json::Value,
) -> StoryboardResult<GenerateRequest> {
    Ok(GenerateRequest::builder()
        .messages(vec![Message::system(system), Message::user(prompt)])
        .model(Some(settings.text_model().clone()))
        .temperature(*settings.temperature())
        .max_tokens(*settings.max_output_tokens())
        .response_format(ResponseFormat::Json { schema })
        .build()
        .map_err(BuilderError::from_builder)?)
}
