//! Saving and loading storyboards on disk.

use storyboard::{
    ImageHandle, Illustration, STORYBOARD_FILE, StorageErrorKind, StoryboardErrorKind,
    read_storyboard, read_text, write_storyboard,
};
use storyboard_test_support::{storyboard, tiny_png};
use tempfile::TempDir;

#[tokio::test]
async fn test_write_and_read_back() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out = temp_dir.path().join("lighthouse");

    let mut board = storyboard(3, 4);
    let image = ImageHandle::new("image/png", tiny_png());
    board
        .page_mut("page-2")
        .unwrap()
        .set_illustration(Illustration::Illustrated(image.clone()));
    board
        .scene_mut("p3-s4")
        .unwrap()
        .set_illustration(Illustration::Illustrated(image.clone()));
    board
        .page_mut("page-3")
        .unwrap()
        .set_illustration(Illustration::Failed("render failed".into()));

    let written = write_storyboard(&board, &out).await?;
    let names: Vec<String> = written
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![STORYBOARD_FILE, "page-02.png", "page-03-panel-04.png"]
    );
    assert_eq!(std::fs::read(out.join("page-02.png"))?, tiny_png());

    // From the directory and from the file itself
    let from_dir = read_storyboard(&out).await?;
    let from_file = read_storyboard(&out.join(STORYBOARD_FILE)).await?;
    assert_eq!(from_dir, board);
    assert_eq!(from_file, board);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_not_found() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("nope.txt");

    let err = read_text(&missing).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        StoryboardErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_malformed_storyboard_is_json_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json")?;

    let err = read_storyboard(&path).await.unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
    Ok(())
}
