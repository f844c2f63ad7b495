//! Concept stage: idea to developed story.

use crate::prompts::{CONCEPT_SYSTEM, concept_prompt};
use crate::schema::concept_schema;
use crate::wire::{ConceptWire, parse_response};
use crate::{PipelineSettings, json_request};
use storyboard_core::{DevelopedStory, ResponsePolicy};
use storyboard_error::{PipelineError, PipelineErrorKind, StoryboardResult};
use storyboard_interface::StoryboardDriver;
use tracing::{debug, info, instrument, warn};

/// Expands a seed idea into a story summary and a beat-by-beat screenplay.
#[derive(Debug, Clone)]
pub struct ConceptDeveloper<D> {
    driver: D,
    settings: PipelineSettings,
}

impl<D: StoryboardDriver> ConceptDeveloper<D> {
    /// Creates a developer over `driver`.
    pub fn new(driver: D, settings: PipelineSettings) -> Self {
        Self { driver, settings }
    }

    /// Develops `idea` into a screenplay of exactly `panel_count` beats.
    ///
    /// # Errors
    ///
    /// Fails before any network call when the idea is blank or
    /// `panel_count` is zero. Service failures are returned as-is. A
    /// response without the required fields is an invalid-response-shape
    /// error under the strict policy and an empty story under the lenient
    /// one.
    #[instrument(skip(self, idea), fields(idea_len = idea.len()))]
    pub async fn develop(&self, idea: &str, panel_count: u32) -> StoryboardResult<DevelopedStory> {
        if idea.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::EmptyInput("Idea".into())).into());
        }
        if panel_count == 0 {
            return Err(PipelineError::new(PipelineErrorKind::InvalidPanelCount(panel_count)).into());
        }

        let request = json_request(
            &self.settings,
            CONCEPT_SYSTEM,
            concept_prompt(idea.trim(), panel_count),
            concept_schema(),
        )?;

        debug!("Requesting story development");
        let response = self.driver.generate(&request).await?;
        let text = response.text();
        let policy = *self.settings.policy();

        let story = if text.trim().is_empty() {
            match policy {
                ResponsePolicy::Strict => {
                    return Err(PipelineError::new(PipelineErrorKind::MissingTextOutput(
                        "develop".into(),
                    ))
                    .into());
                }
                ResponsePolicy::Lenient => DevelopedStory::default(),
            }
        } else {
            parse_response::<ConceptWire>(&text, "develop", policy)?.into_story(policy)?
        };

        let beats = story.beats().count();
        if beats != panel_count as usize {
            warn!(
                expected = panel_count,
                actual = beats,
                "Screenplay line count differs from requested panel count"
            );
        }
        info!(beats, "Story developed");
        Ok(story)
    }
}
