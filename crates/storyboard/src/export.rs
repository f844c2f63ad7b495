//! Saving and loading storyboards on disk.
//!
//! A saved storyboard is a directory holding `storyboard.json` (the full
//! board, images embedded as data URIs) plus one file per rendered page
//! (`page-01.png`, ...) and per rendered panel (`page-01-panel-02.png`, ...).

use std::path::{Path, PathBuf};
use storyboard_core::{ImageHandle, StoryboardData};
use storyboard_error::{JsonError, StorageError, StorageErrorKind, StoryboardResult};
use tracing::{debug, info, instrument};

/// File name of the board document inside an export directory.
pub const STORYBOARD_FILE: &str = "storyboard.json";

/// File name for a rendered page.
pub fn page_file_name(page_number: u32, image: &ImageHandle) -> String {
    format!("page-{:02}.{}", page_number, image.extension())
}

/// File name for a rendered single panel.
pub fn panel_file_name(page_number: u32, scene_number: u32, image: &ImageHandle) -> String {
    format!(
        "page-{:02}-panel-{:02}.{}",
        page_number,
        scene_number,
        image.extension()
    )
}

/// Write a storyboard and its rendered images into `dir`.
///
/// Creates the directory if needed. Returns every path written, board
/// document first.
#[instrument(skip(board), fields(title = %board.title()))]
pub async fn write_storyboard(board: &StoryboardData, dir: &Path) -> StoryboardResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation {
            path: dir.display().to_string(),
            message: e.to_string(),
        })
    })?;

    let json = serde_json::to_vec_pretty(board)
        .map_err(|e| JsonError::new(format!("Failed to serialize storyboard: {}", e)))?;

    let mut written = Vec::new();
    let board_path = dir.join(STORYBOARD_FILE);
    write_file(&board_path, &json).await?;
    written.push(board_path);

    for page in board.pages() {
        if let Some(image) = page.illustration().image() {
            let path = dir.join(page_file_name(*page.page_number(), image));
            write_file(&path, image.bytes()).await?;
            written.push(path);
        }

        for scene in page.scenes() {
            if let Some(image) = scene.illustration().image() {
                let path = dir.join(panel_file_name(
                    *page.page_number(),
                    *scene.scene_number(),
                    image,
                ));
                write_file(&path, image.bytes()).await?;
                written.push(path);
            }
        }
    }

    info!(
        dir = %dir.display(),
        files = written.len(),
        "Storyboard saved"
    );

    Ok(written)
}

/// Read a storyboard document.
///
/// `path` may name the JSON file itself or an export directory containing
/// `storyboard.json`.
#[instrument]
pub async fn read_storyboard(path: &Path) -> StoryboardResult<StoryboardData> {
    let file = if tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        path.join(STORYBOARD_FILE)
    } else {
        path.to_path_buf()
    };

    let content = read_text(&file).await?;
    let board: StoryboardData = serde_json::from_str(&content).map_err(|e| {
        JsonError::new(format!(
            "Failed to parse storyboard {}: {}",
            file.display(),
            e
        ))
    })?;

    debug!(
        pages = board.pages().len(),
        panels = board.panel_count(),
        "Storyboard loaded"
    );

    Ok(board)
}

/// Read a UTF-8 text file, such as a screenplay.
pub async fn read_text(path: &Path) -> StoryboardResult<String> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
        } else {
            StorageError::new(StorageErrorKind::FileRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    })?;
    Ok(content)
}

/// Write through a temporary sibling, then rename into place.
async fn write_file(path: &Path, data: &[u8]) -> StoryboardResult<()> {
    let temp_path = path.with_extension("tmp");

    tokio::fs::write(&temp_path, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite {
            path: temp_path.display().to_string(),
            message: e.to_string(),
        })
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;

    debug!(path = %path.display(), bytes = data.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded() {
        let png = ImageHandle::new("image/png", vec![0]);
        let jpeg = ImageHandle::new("image/jpeg", vec![0]);
        assert_eq!(page_file_name(3, &png), "page-03.png");
        assert_eq!(page_file_name(12, &jpeg), "page-12.jpg");
        assert_eq!(panel_file_name(1, 4, &png), "page-01-panel-04.png");
    }
}
