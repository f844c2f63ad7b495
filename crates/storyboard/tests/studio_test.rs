//! Interactive studio session against the fake studio.

use std::time::Duration;

use storyboard::{
    Illustration, Mode, Orchestrator, PipelineSettings, ProductionConfig, Reply, Step,
    StudioCommand, StudioSession, StudioSettings, read_storyboard,
};
use storyboard_test_support::{FakeStudio, LIGHTHOUSE_IDEA, ScriptedDriver};
use tempfile::TempDir;

fn session(driver: ScriptedDriver, pages: u32, panels: u32) -> StudioSession<ScriptedDriver> {
    StudioSession::new(Orchestrator::new(
        driver,
        PipelineSettings::default(),
        StudioSettings::default().with_illustration_pause(Duration::ZERO),
        ProductionConfig::new(pages, panels, Mode::Creative).unwrap(),
    ))
}

async fn run(session: &mut StudioSession<ScriptedDriver>, line: &str) -> anyhow::Result<String> {
    let command: StudioCommand = line.parse().map_err(anyhow::Error::msg)?;
    match session.execute(command).await? {
        Reply::Text(text) => Ok(text),
        Reply::Quit => Ok(String::new()),
    }
}

#[tokio::test]
async fn test_creative_session_saves_illustrated_pages() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 2, 4).driver();
    let mut studio = session(driver.clone(), 5, 4);

    let grid = run(&mut studio, "pages 2").await?;
    assert_eq!(grid, "Grid: 2 pages x 4 panels (8 panels)");

    let developed = run(&mut studio, &format!("idea {LIGHTHOUSE_IDEA}")).await?;
    assert!(developed.starts_with("Screenplay developed:"));
    assert!(developed.contains("8. The keeper does thing 8."));

    let structured = run(&mut studio, "confirm").await?;
    assert!(structured.contains("\"The Bottle\" has 2 pages"));

    studio.wait_idle().await?;
    let shown = run(&mut studio, "show").await?;
    assert!(shown.contains("Page 1 [done]"));
    assert!(shown.contains("Page 2 [done]"));
    assert!(shown.contains("p2-s3 [pending]"));

    let temp_dir = TempDir::new()?;
    let saved = run(&mut studio, &format!("save {}", temp_dir.path().display())).await?;
    assert!(saved.starts_with("Saved 3 files"));

    let board = read_storyboard(temp_dir.path()).await?;
    assert_eq!(board.title(), "The Bottle");
    assert!(board.pages().iter().all(|page| page.illustration().image().is_some()));

    // concept + structure + two pages
    assert_eq!(driver.call_count(), 4);
    Ok(())
}

#[tokio::test]
async fn test_edit_and_redraw_one_page() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 2, 4).driver();
    let mut studio = session(driver.clone(), 2, 4);

    run(&mut studio, "mode quick").await?;
    run(&mut studio, "idea INT. LIGHTHOUSE - NIGHT. The keeper climbs.").await?;
    studio.wait_idle().await?;
    assert_eq!(driver.call_count(), 3);

    let edited = run(&mut studio, "edit p2-s2 The keeper drops the lamp").await?;
    assert!(edited.starts_with("Updated p2-s2"));

    run(&mut studio, "redraw 2").await?;
    studio.wait_idle().await?;
    assert_eq!(driver.call_count(), 4);

    let last_prompt = driver.requests().last().unwrap().prompt_text();
    assert!(last_prompt.contains("Storyboard page 2"));
    assert!(last_prompt.contains("The keeper drops the lamp"));

    let state = studio.orchestrator().state();
    let board = state.storyboard().as_ref().unwrap();
    let (_, scene) = board.scene("p2-s2").unwrap();
    assert_eq!(scene.action(), "The keeper drops the lamp");
    let (_, untouched) = board.scene("p2-s1").unwrap();
    assert_eq!(untouched.action(), "The Keeper looks out on page 2.");
    Ok(())
}

#[tokio::test]
async fn test_failed_page_is_reported_as_event() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 2, 4).failing_page(2).driver();
    let mut studio = session(driver, 2, 4);

    run(&mut studio, "mode quick").await?;
    run(&mut studio, "idea The keeper climbs the stairs.").await?;

    let mut updates = Vec::new();
    while studio.orchestrator().outstanding_jobs() > 0 {
        match studio.next_event().await {
            Some(update) => updates.push(update),
            None => break,
        }
    }

    assert!(updates.contains(&"Page 1: done".to_string()));
    assert!(
        updates
            .iter()
            .any(|update| update.starts_with("Page 2: failed (") && update.contains("500"))
    );

    let shown = run(&mut studio, "show").await?;
    assert!(shown.contains("Page 2 [failed:"));
    assert!(shown.contains("Last error: Page 2 could not be illustrated"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_commands_keep_session_usable() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 2, 4).driver();
    let mut studio = session(driver.clone(), 2, 4);

    let command: StudioCommand = "confirm".parse().map_err(anyhow::Error::msg)?;
    let err = studio.execute(command).await.unwrap_err();
    assert!(err.orchestrator_kind().is_some());

    let command: StudioCommand = "panels 11".parse().map_err(anyhow::Error::msg)?;
    assert!(studio.execute(command).await.is_err());

    let command: StudioCommand = "redraw 1".parse().map_err(anyhow::Error::msg)?;
    assert!(studio.execute(command).await.is_err());

    assert_eq!(driver.call_count(), 0);
    assert_eq!(*studio.orchestrator().state().step(), Step::Input);

    run(&mut studio, "idea A keeper and a bottle").await?;
    assert_eq!(*studio.orchestrator().state().step(), Step::Development);

    let restarted = run(&mut studio, "restart").await?;
    assert_eq!(restarted, "Started a new run.");
    assert_eq!(*studio.orchestrator().state().step(), Step::Input);

    let command: StudioCommand = "quit".parse().map_err(anyhow::Error::msg)?;
    assert_eq!(studio.execute(command).await?, Reply::Quit);
    studio.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_single_panel_illustration() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 1, 4).driver();
    let mut studio = session(driver.clone(), 1, 4);

    run(&mut studio, "mode quick").await?;
    run(&mut studio, "idea The keeper climbs.").await?;
    studio.wait_idle().await?;

    let queued = run(&mut studio, "panel p1-s3").await?;
    assert_eq!(queued, "Queued panel p1-s3.");
    studio.wait_idle().await?;

    let state = studio.orchestrator().state();
    let board = state.storyboard().as_ref().unwrap();
    let (page, scene) = board.scene("p1-s3").unwrap();
    assert!(matches!(scene.illustration(), Illustration::Illustrated(_)));
    assert!(matches!(page.illustration(), Illustration::Illustrated(_)));
    assert!(
        driver
            .requests()
            .last()
            .unwrap()
            .prompt_text()
            .starts_with("A single storyboard panel.")
    );
    Ok(())
}

#[tokio::test]
async fn test_events_between_commands_lead_the_next_reply() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 2, 4).driver();
    let mut studio = session(driver, 2, 4);

    run(&mut studio, "mode quick").await?;
    run(&mut studio, "idea The keeper climbs the stairs.").await?;

    // Let the worker finish both pages while nobody reads its events.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let shown = run(&mut studio, "show").await?;
    let lines: Vec<&str> = shown.lines().collect();
    assert_eq!(
        &lines[..4],
        &["Page 1: drawing...", "Page 1: done", "Page 2: drawing...", "Page 2: done"]
    );
    assert!(shown.contains("Page 2 [done]"));
    assert_eq!(studio.orchestrator().outstanding_jobs(), 0);

    let again = run(&mut studio, "help").await?;
    assert!(again.starts_with("Commands:"));
    Ok(())
}

#[tokio::test]
async fn test_script_file_needs_quick_mode() -> anyhow::Result<()> {
    let driver = FakeStudio::new("The Bottle", 1, 4).driver();
    let mut studio = session(driver.clone(), 1, 4);

    let temp_dir = TempDir::new()?;
    let script = temp_dir.path().join("draft.txt");
    std::fs::write(&script, "1. The keeper climbs.\n2. The lamp is lit.")?;

    let refused = run(&mut studio, &format!("script {}", script.display())).await?;
    assert!(refused.contains("mode quick"));
    assert_eq!(studio.orchestrator().state().mode(), Mode::Creative);
    assert_eq!(*studio.orchestrator().state().step(), Step::Input);
    assert_eq!(driver.call_count(), 0);

    run(&mut studio, "mode quick").await?;
    let structured = run(&mut studio, &format!("script {}", script.display())).await?;
    assert!(structured.contains("\"The Bottle\" has 1 pages"));
    studio.wait_idle().await?;

    run(&mut studio, "restart").await?;
    assert_eq!(studio.orchestrator().state().mode(), Mode::Quick);
    Ok(())
}
