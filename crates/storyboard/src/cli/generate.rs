//! One-shot command handlers: develop, structure, create, illustrate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use storyboard::{
    ConceptDeveloper, GeminiClient, Illustration, IllustrationEvent, JsonError, Mode,
    OrchestratorError, OrchestratorErrorKind, Orchestrator, PageIllustrator, ProductionConfig,
    Step, StoryboardConfig, StoryboardResult, StoryboardStructurer, page_file_name, read_storyboard,
    read_text, write_storyboard,
};
use tracing::{info, warn};

/// Build the Gemini client from `GEMINI_API_KEY` and the `[gemini]` section.
pub fn build_client(config: &StoryboardConfig) -> StoryboardResult<Arc<GeminiClient>> {
    let mut client = GeminiClient::new()?.with_default_model(config.gemini().text_model().clone());
    if let Some(base_url) = config.gemini().base_url() {
        client = client.with_base_url(base_url.clone());
    }
    Ok(Arc::new(client))
}

/// Page grid from CLI overrides, falling back to the configured defaults.
pub fn resolve_grid(
    config: &StoryboardConfig,
    pages: Option<u32>,
    panels: Option<u32>,
    mode: Option<Mode>,
) -> StoryboardResult<ProductionConfig> {
    let defaults = config.production_config()?;
    Ok(ProductionConfig::new(
        pages.unwrap_or(defaults.pages()),
        panels.unwrap_or(defaults.panels_per_page()),
        mode.unwrap_or(defaults.mode()),
    )?)
}

fn print_json<T: serde::Serialize>(value: &T) -> StoryboardResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to serialize output: {}", e)))?;
    println!("{json}");
    Ok(())
}

/// Develop an idea and print the story and screenplay.
pub async fn develop(
    config: &StoryboardConfig,
    idea: &str,
    panels: Option<u32>,
) -> StoryboardResult<()> {
    let panel_count = match panels {
        Some(count) => count,
        None => config.production_config()?.total_panels(),
    };

    let developer = ConceptDeveloper::new(build_client(config)?, config.pipeline_settings()?);
    let developed = developer.develop(idea, panel_count).await?;
    print_json(&developed)
}

/// Structure a screenplay file and print the storyboard.
pub async fn structure(
    config: &StoryboardConfig,
    screenplay: &Path,
    pages: Option<u32>,
    panels: Option<u32>,
) -> StoryboardResult<()> {
    let grid = resolve_grid(config, pages, panels, None)?;
    let text = read_text(screenplay).await?;

    let structurer = StoryboardStructurer::new(build_client(config)?, config.pipeline_settings()?);
    let board = structurer
        .structure(&text, grid.pages(), grid.panels_per_page())
        .await?;
    print_json(&board)
}

/// Where the text for a `create` run comes from.
#[derive(Debug, Clone)]
pub enum CreateSource {
    /// A seed idea, handled according to the mode
    Idea(String),
    /// A finished screenplay file
    Script(PathBuf),
}

/// Run a whole production: text stages, then every page illustrated, then
/// the result written to `out`.
pub async fn create(
    config: &StoryboardConfig,
    source: CreateSource,
    grid: ProductionConfig,
    out: &Path,
) -> StoryboardResult<()> {
    let (text, grid) = match source {
        CreateSource::Idea(idea) => (idea, grid),
        CreateSource::Script(path) => (read_text(&path).await?, grid.with_mode(Mode::Quick)),
    };

    let studio_settings = config.studio_settings().with_auto_illustrate(true);
    let mut studio = Orchestrator::new(
        build_client(config)?,
        config.pipeline_settings()?,
        studio_settings,
        grid,
    );

    info!(
        mode = %grid.mode(),
        pages = grid.pages(),
        panels_per_page = grid.panels_per_page(),
        "Starting production"
    );

    studio.submit_idea(&text).await?;
    if *studio.state().step() == Step::Development {
        if let Some(developed) = studio.state().developed() {
            info!(beats = developed.beats().count(), "Screenplay developed");
        }
        studio.confirm_development().await?;
    }

    while studio.outstanding_jobs() > 0 {
        match studio.next_event().await {
            Some(IllustrationEvent::Started { target, .. }) => info!(%target, "Illustrating"),
            Some(IllustrationEvent::Finished { target, result, .. }) => match result {
                Ok(_) => info!(%target, "Illustrated"),
                Err(message) => warn!(%target, %message, "Illustration failed"),
            },
            None => {
                return Err(OrchestratorError::new(OrchestratorErrorKind::WorkerStopped).into());
            }
        }
    }

    let board = studio
        .state()
        .storyboard()
        .clone()
        .ok_or_else(|| OrchestratorError::new(OrchestratorErrorKind::NoStoryboard))?;
    studio.shutdown().await;

    let failed = board
        .pages()
        .iter()
        .filter(|page| matches!(page.illustration(), Illustration::Failed(_)))
        .count();

    let written = write_storyboard(&board, out).await?;
    println!(
        "Saved \"{}\" to {} ({} files)",
        board.title(),
        out.display(),
        written.len()
    );
    if failed > 0 {
        println!(
            "{failed} of {} pages could not be illustrated; re-render them with `storyboard illustrate`",
            board.pages().len()
        );
    }
    Ok(())
}

/// Re-render one page of a saved storyboard.
pub async fn illustrate(
    config: &StoryboardConfig,
    storyboard: &Path,
    page_number: u32,
    out: Option<&Path>,
) -> StoryboardResult<()> {
    let mut board = read_storyboard(storyboard).await?;
    let page = board.page_by_number(page_number).cloned().ok_or_else(|| {
        OrchestratorError::new(OrchestratorErrorKind::PageNotFound(format!(
            "page {page_number}"
        )))
    })?;

    let illustrator = PageIllustrator::new(build_client(config)?, config.pipeline_settings()?);
    let image = illustrator
        .illustrate_page(&page, board.characters())
        .await?;

    let out_dir = match out {
        Some(dir) => dir.to_path_buf(),
        None if storyboard.is_dir() => storyboard.to_path_buf(),
        None => storyboard
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let path = out_dir.join(page_file_name(page_number, &image));
    if let Some(target) = board.page_mut(page.id()) {
        target.set_illustration(Illustration::Illustrated(image));
    }
    write_storyboard(&board, &out_dir).await?;

    println!("Page {page_number} saved to {}", path.display());
    Ok(())
}
