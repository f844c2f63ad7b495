//! Illustration stage: one image per page, or per panel on request.

use crate::PipelineSettings;
use crate::prompts::{compose_page_prompt, compose_scene_prompt};
use storyboard_core::{
    Character, GenerateRequest, ImageHandle, Message, Page, ResponseFormat, Scene,
};
use storyboard_error::{BuilderError, PipelineError, PipelineErrorKind, StoryboardResult};
use storyboard_interface::StoryboardDriver;
use tracing::{debug, info, instrument};

/// MIME type assumed when the service omits one.
const FALLBACK_MIME: &str = "image/png";

/// Renders storyboard pages (and single panels) as images.
#[derive(Debug, Clone)]
pub struct PageIllustrator<D> {
    driver: D,
    settings: PipelineSettings,
}

impl<D: StoryboardDriver> PageIllustrator<D> {
    /// Creates an illustrator over `driver`.
    pub fn new(driver: D, settings: PipelineSettings) -> Self {
        Self { driver, settings }
    }

    /// Renders the whole page as a single multi-panel grid image.
    ///
    /// # Errors
    ///
    /// Service failures are returned as-is. A response without an image part
    /// is a [`PipelineErrorKind::NoImageData`] error.
    #[instrument(skip_all, fields(page = *page.page_number(), panels = page.scenes().len()))]
    pub async fn illustrate_page(
        &self,
        page: &Page,
        characters: &[Character],
    ) -> StoryboardResult<ImageHandle> {
        let prompt = compose_page_prompt(page, characters);
        let image = self
            .render(prompt, format!("page {}", page.page_number()))
            .await?;
        info!(bytes = image.bytes().len(), mime = image.mime(), "Page illustrated");
        Ok(image)
    }

    /// Renders one panel from its own visual prompt.
    ///
    /// # Errors
    ///
    /// Same as [`PageIllustrator::illustrate_page`].
    #[instrument(skip_all, fields(scene = %scene.id()))]
    pub async fn illustrate_scene(
        &self,
        scene: &Scene,
        characters: &[Character],
    ) -> StoryboardResult<ImageHandle> {
        let prompt = compose_scene_prompt(scene, characters);
        let image = self.render(prompt, format!("scene {}", scene.id())).await?;
        info!(bytes = image.bytes().len(), "Scene illustrated");
        Ok(image)
    }

    async fn render(&self, prompt: String, target: String) -> StoryboardResult<ImageHandle> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(prompt)])
            .model(Some(self.settings.image_model().clone()))
            .response_format(ResponseFormat::Image {
                aspect_ratio: self.settings.aspect_ratio().clone(),
            })
            .build()
            .map_err(BuilderError::from_builder)?;

        debug!(target = %target, "Requesting illustration");
        let response = self.driver.generate(&request).await?;

        let (mime, data) = response
            .first_image()
            .filter(|(_, data)| !data.is_empty())
            .ok_or_else(|| PipelineError::new(PipelineErrorKind::NoImageData(target)))?;

        Ok(ImageHandle::new(mime.unwrap_or(FALLBACK_MIME), data.to_vec()))
    }
}
