//! Stage behavior against scripted drivers.

use serde_json::json;
use storyboard_core::{Page, ResponseFormat, ResponsePolicy};
use storyboard_error::{PipelineErrorKind, StoryboardErrorKind};
use storyboard_pipeline::{
    ConceptDeveloper, PageIllustrator, Pipeline, PipelineSettings, StoryboardStructurer,
};
use storyboard_test_support::{
    FakeStudio, LIGHTHOUSE_IDEA, ScriptedDriver, concept_value, page, storyboard,
    storyboard_value, text_response,
};

fn strict() -> PipelineSettings {
    PipelineSettings::default()
}

fn lenient() -> PipelineSettings {
    PipelineSettings::default().with_policy(ResponsePolicy::Lenient)
}

#[tokio::test]
async fn test_develop_returns_story_and_screenplay() -> anyhow::Result<()> {
    let driver = ScriptedDriver::always_text(concept_value(8).to_string());
    let developer = ConceptDeveloper::new(driver.clone(), strict());

    let story = developer.develop(LIGHTHOUSE_IDEA, 8).await?;

    assert!(!story.story.is_empty());
    assert_eq!(story.beats().count(), 8);
    assert_eq!(driver.call_count(), 1);

    let request = &driver.requests()[0];
    assert!(matches!(request.response_format(), ResponseFormat::Json { .. }));
    assert!(request.prompt_text().contains("exactly 8 beats"));
    assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash"));
    Ok(())
}

#[tokio::test]
async fn test_develop_rejects_blank_idea_without_calling_service() {
    let driver = ScriptedDriver::always_text("{}");
    let developer = ConceptDeveloper::new(driver.clone(), strict());

    let err = developer.develop("   \n", 4).await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::EmptyInput(_))));

    let err = developer.develop(LIGHTHOUSE_IDEA, 0).await.unwrap_err();
    assert_eq!(err.pipeline_kind(), Some(&PipelineErrorKind::InvalidPanelCount(0)));

    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_develop_strict_rejects_missing_field() {
    let driver = ScriptedDriver::always_text(json!({"story": "only a story"}).to_string());
    let developer = ConceptDeveloper::new(driver, strict());

    let err = developer.develop(LIGHTHOUSE_IDEA, 4).await.unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::InvalidResponseShape { operation, .. }) if operation == "develop"
    ));
}

#[tokio::test]
async fn test_develop_lenient_degrades_to_empty() -> anyhow::Result<()> {
    let driver = ScriptedDriver::always_text("the model rambled instead");
    let developer = ConceptDeveloper::new(driver, lenient());

    let story = developer.develop(LIGHTHOUSE_IDEA, 4).await?;
    assert!(story.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_develop_accepts_fenced_json() -> anyhow::Result<()> {
    let fenced = format!("```json\n{}\n```", concept_value(4));
    let developer = ConceptDeveloper::new(ScriptedDriver::always_text(fenced), strict());

    let story = developer.develop(LIGHTHOUSE_IDEA, 4).await?;
    assert_eq!(story.beats().count(), 4);
    Ok(())
}

#[tokio::test]
async fn test_develop_propagates_service_errors() {
    let developer = ConceptDeveloper::new(ScriptedDriver::always_failing("down"), lenient());

    let err = developer.develop(LIGHTHOUSE_IDEA, 4).await.unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Gemini(_)));
}

#[tokio::test]
async fn test_structure_produces_exact_grid() -> anyhow::Result<()> {
    for (pages, panels) in [(1, 4), (3, 6), (5, 4), (2, 10)] {
        let driver =
            ScriptedDriver::always_text(storyboard_value("Grid", pages, panels).to_string());
        let structurer = StoryboardStructurer::new(driver, strict());

        let board = structurer.structure("1. A beat", pages, panels).await?;

        assert_eq!(board.pages().len(), pages as usize);
        assert_eq!(board.panel_count(), (pages * panels) as usize);
        for (i, page) in board.pages().iter().enumerate() {
            assert_eq!(*page.page_number(), i as u32 + 1);
            assert_eq!(page.scenes().len(), panels as usize);
            assert!(page.has_contiguous_numbering());
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_structure_strict_rejects_wrong_grid() {
    let driver = ScriptedDriver::always_text(storyboard_value("Grid", 4, 4).to_string());
    let structurer = StoryboardStructurer::new(driver, strict());

    let err = structurer.structure("1. A beat", 5, 4).await.unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::InvalidResponseShape { operation, .. }) if operation == "structure"
    ));
}

#[tokio::test]
async fn test_structure_lenient_returns_empty_board_on_garbage() -> anyhow::Result<()> {
    let structurer =
        StoryboardStructurer::new(ScriptedDriver::always_text("<html>oops</html>"), lenient());

    let board = structurer.structure("1. A beat", 2, 4).await?;
    assert!(board.pages().is_empty());
    assert_eq!(board.title(), "");
    Ok(())
}

#[tokio::test]
async fn test_structure_empty_text_is_missing_output() {
    let structurer = StoryboardStructurer::new(ScriptedDriver::always_text("  "), strict());

    let err = structurer.structure("1. A beat", 1, 4).await.unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::MissingTextOutput(_))
    ));
}

#[tokio::test]
async fn test_structure_rejects_degenerate_grid_without_calling_service() {
    let driver = ScriptedDriver::always_text("{}");
    let structurer = StoryboardStructurer::new(driver.clone(), strict());

    let err = structurer.structure("1. A beat", 0, 4).await.unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::InvalidGrid { pages: 0, .. })
    ));
    let err = structurer.structure("", 1, 4).await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::EmptyInput(_))));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_structure_rejects_oversized_grid_without_calling_service() {
    let driver = ScriptedDriver::always_text("{}");
    let structurer = StoryboardStructurer::new(driver.clone(), strict());

    let err = structurer
        .structure("1. A beat", u32::MAX, u32::MAX)
        .await
        .unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::InvalidGrid { pages: u32::MAX, .. })
    ));
    let err = structurer.structure("1. A beat", 1, 11).await.unwrap_err();
    assert!(matches!(
        err.pipeline_kind(),
        Some(PipelineErrorKind::InvalidGrid { panels_per_page: 11, .. })
    ));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_illustrate_page_returns_image() -> anyhow::Result<()> {
    let driver = ScriptedDriver::always_image();
    let illustrator = PageIllustrator::new(driver.clone(), strict());
    let board = storyboard(1, 4);

    let image = illustrator
        .illustrate_page(&board.pages()[0], board.characters())
        .await?;

    assert_eq!(image.mime(), "image/png");
    assert!(image.to_data_uri().starts_with("data:image/png;base64,"));

    let request = &driver.requests()[0];
    assert_eq!(request.model().as_deref(), Some("gemini-2.5-flash-image"));
    assert_eq!(
        request.response_format(),
        &ResponseFormat::Image {
            aspect_ratio: Some("3:4".to_string())
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_image_data_is_identifiable() {
    let illustrator = PageIllustrator::new(
        ScriptedDriver::new(|_| Ok(text_response("Sorry, no picture."))),
        strict(),
    );
    let target: Page = page(3, 4);

    let err = illustrator.illustrate_page(&target, &[]).await.unwrap_err();
    assert_eq!(
        err.pipeline_kind(),
        Some(&PipelineErrorKind::NoImageData("page 3".to_string()))
    );
}

#[tokio::test]
async fn test_illustrate_scene_uses_panel_prompt() -> anyhow::Result<()> {
    let driver = ScriptedDriver::always_image();
    let illustrator = PageIllustrator::new(driver.clone(), strict());
    let board = storyboard(1, 4);
    let scene = &board.pages()[0].scenes()[1];

    illustrator.illustrate_scene(scene, board.characters()).await?;

    let prompt = driver.requests()[0].prompt_text();
    assert!(prompt.starts_with("A single storyboard panel."));
    assert!(prompt.contains("Panel 1.2"));
    Ok(())
}

#[tokio::test]
async fn test_full_pipeline_over_fake_studio() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 5, 4).driver();
    let pipeline = Pipeline::new(driver.clone(), strict());

    let story = pipeline.concept.develop(LIGHTHOUSE_IDEA, 20).await?;
    assert_eq!(story.beats().count(), 20);

    let board = pipeline.structurer.structure(&story.screenplay, 5, 4).await?;
    assert_eq!(board.title(), "The Bottle");
    assert_eq!(board.panel_count(), 20);

    for page in board.pages() {
        pipeline
            .illustrator
            .illustrate_page(page, board.characters())
            .await?;
    }
    assert_eq!(driver.call_count(), 2 + 5);
    Ok(())
}
