//! Live Gemini API tests.
//!
//! These make real (billed) calls and need `GEMINI_API_KEY`:
//! ```bash
//! cargo test -p storyboard_models --features api
//! ```

#![cfg(all(feature = "gemini", feature = "api"))]

use serde_json::json;
use storyboard_core::{GenerateRequest, Message, ResponseFormat};
use storyboard_error::{GeminiErrorKind, StoryboardErrorKind};
use storyboard_interface::StoryboardDriver;
use storyboard_models::GeminiClient;

fn client() -> anyhow::Result<GeminiClient> {
    let _ = dotenvy::dotenv();
    Ok(GeminiClient::new()?)
}

#[tokio::test]
async fn test_text_generation() -> anyhow::Result<()> {
    let client = client()?;
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("Reply with the single word: lighthouse")])
        .max_tokens(Some(20))
        .build()?;

    let response = client.generate(&request).await?;
    assert!(!response.text().trim().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_schema_constrained_json() -> anyhow::Result<()> {
    let client = client()?;
    let schema = json!({
        "type": "OBJECT",
        "properties": {"title": {"type": "STRING"}},
        "required": ["title"]
    });
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("Give a title for a story about a lighthouse.")])
        .response_format(ResponseFormat::Json { schema })
        .build()?;

    let response = client.generate(&request).await?;
    let value: serde_json::Value = serde_json::from_str(&response.text())?;
    assert!(value["title"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_image_generation() -> anyhow::Result<()> {
    let client = client()?;
    let request = GenerateRequest::builder()
        .messages(vec![Message::user(
            "A simple pencil sketch of a lighthouse on a cliff, grayscale",
        )])
        .model(Some("gemini-2.5-flash-image".to_string()))
        .response_format(ResponseFormat::Image {
            aspect_ratio: Some("3:4".to_string()),
        })
        .build()?;

    let response = client.generate(&request).await?;
    let (_, data) = response
        .first_image()
        .ok_or_else(|| anyhow::anyhow!("no image in response"))?;
    assert!(!data.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_key_is_http_error() -> anyhow::Result<()> {
    let client = GeminiClient::with_api_key("not-a-real-key")?;
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hello")])
        .build()?;

    let err = client.generate(&request).await.unwrap_err();
    match err.kind() {
        StoryboardErrorKind::Gemini(e) => {
            assert!(matches!(e.kind, GeminiErrorKind::HttpError { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
