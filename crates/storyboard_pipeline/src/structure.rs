//! Structure stage: screenplay to paginated storyboard.

use crate::prompts::{STRUCTURE_SYSTEM, structure_prompt};
use crate::schema::storyboard_schema;
use crate::wire::{Grid, StoryboardWire, parse_response};
use crate::{PipelineSettings, json_request};
use storyboard_core::{MAX_PAGES, MAX_PANELS_PER_PAGE, ResponsePolicy, StoryboardData};
use storyboard_error::{PipelineError, PipelineErrorKind, StoryboardResult};
use storyboard_interface::StoryboardDriver;
use tracing::{debug, info, instrument};

/// Partitions a screenplay into a fixed grid of pages and panels.
#[derive(Debug, Clone)]
pub struct StoryboardStructurer<D> {
    driver: D,
    settings: PipelineSettings,
}

impl<D: StoryboardDriver> StoryboardStructurer<D> {
    /// Creates a structurer over `driver`.
    pub fn new(driver: D, settings: PipelineSettings) -> Self {
        Self { driver, settings }
    }

    /// Structures `screenplay` into `pages` pages of `panels_per_page`
    /// panels each.
    ///
    /// # Errors
    ///
    /// Fails before any network call on a blank screenplay, or on a grid
    /// that is empty or larger than [`MAX_PAGES`] by [`MAX_PANELS_PER_PAGE`]. Under the strict policy the response must contain exactly the
    /// requested grid with contiguous numbering, unique ids and non-empty
    /// visual prompts.
    #[instrument(skip(self, screenplay), fields(screenplay_len = screenplay.len()))]
    pub async fn structure(
        &self,
        screenplay: &str,
        pages: u32,
        panels_per_page: u32,
    ) -> StoryboardResult<StoryboardData> {
        if screenplay.trim().is_empty() {
            return Err(
                PipelineError::new(PipelineErrorKind::EmptyInput("Screenplay".into())).into(),
            );
        }
        if !(1..=MAX_PAGES).contains(&pages)
            || !(1..=MAX_PANELS_PER_PAGE).contains(&panels_per_page)
        {
            return Err(PipelineError::new(PipelineErrorKind::InvalidGrid {
                pages,
                panels_per_page,
            })
            .into());
        }

        let request = json_request(
            &self.settings,
            STRUCTURE_SYSTEM,
            structure_prompt(screenplay.trim(), pages, panels_per_page),
            storyboard_schema(),
        )?;

        debug!("Requesting storyboard structure");
        let response = self.driver.generate(&request).await?;
        let text = response.text();
        let policy = *self.settings.policy();

        if text.trim().is_empty() {
            return match policy {
                ResponsePolicy::Strict => Err(PipelineError::new(
                    PipelineErrorKind::MissingTextOutput("structure".into()),
                )
                .into()),
                ResponsePolicy::Lenient => Ok(StoryboardData::default()),
            };
        }

        let board = parse_response::<StoryboardWire>(&text, "structure", policy)?.into_storyboard(
            Grid {
                pages,
                panels_per_page,
            },
            policy,
        )?;

        info!(
            title = %board.title(),
            pages = board.pages().len(),
            panels = board.panel_count(),
            characters = board.characters().len(),
            "Storyboard structured"
        );
        Ok(board)
    }
}
