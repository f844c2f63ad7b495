//! Conversions between storyboard request/response types and Gemini wire
//! types.

use super::GeminiResult;
use super::dto::{
    Content, GeminiRequest, GeminiResponse, GenerationConfig, ImageConfig, Part,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use storyboard_core::{GenerateRequest, GenerateResponse, Output, ResponseFormat, Role};
use storyboard_error::{GeminiError, GeminiErrorKind};
use tracing::{debug, warn};

/// Builds the wire request. System messages are merged into the separate
/// system instruction.
pub(crate) fn to_gemini_request(req: &GenerateRequest) -> GeminiResult<GeminiRequest> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for msg in req.messages() {
        let parts = msg
            .content
            .iter()
            .map(|input| Part::text(input.text()))
            .collect::<Vec<_>>();
        match msg.role {
            Role::System => system_parts.extend(parts),
            Role::User => contents.push(Content {
                role: Some("user".to_string()),
                parts,
            }),
        }
    }

    if contents.is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::UnsupportedInput(
            "request has no user messages".to_string(),
        )));
    }

    let mut config = GenerationConfig {
        temperature: *req.temperature(),
        max_output_tokens: *req.max_tokens(),
        ..Default::default()
    };

    match req.response_format() {
        ResponseFormat::Text => {}
        ResponseFormat::Json { schema } => {
            config.response_mime_type = Some("application/json".to_string());
            config.response_schema = Some(schema.clone());
        }
        ResponseFormat::Image { aspect_ratio } => {
            config.response_modalities = Some(vec!["IMAGE".to_string()]);
            config.image_config = aspect_ratio.as_ref().map(|ratio| ImageConfig {
                aspect_ratio: ratio.clone(),
            });
        }
    }

    let system_instruction = (!system_parts.is_empty()).then(|| Content {
        role: None,
        parts: system_parts,
    });

    Ok(GeminiRequest {
        contents,
        system_instruction,
        generation_config: (config != GenerationConfig::default()).then_some(config),
    })
}

/// Flattens the first candidate into outputs. Thought parts are dropped and
/// inline data is decoded.
pub(crate) fn from_gemini_response(response: GeminiResponse) -> GeminiResult<GenerateResponse> {
    if let Some(usage) = &response.usage_metadata {
        debug!(
            prompt_tokens = ?usage.prompt_token_count,
            candidate_tokens = ?usage.candidates_token_count,
            total_tokens = ?usage.total_token_count,
            "Gemini usage"
        );
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(GeminiError::new(GeminiErrorKind::Blocked(reason)));
        }
        return Err(GeminiError::new(GeminiErrorKind::NoCandidates));
    };

    if let Some(reason) = candidate.finish_reason.as_deref()
        && reason != "STOP"
    {
        warn!(finish_reason = reason, "Gemini candidate finished early");
    }

    let mut outputs = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text {
            outputs.push(Output::Text(text));
        }
        if let Some(inline) = part.inline_data {
            let data = STANDARD
                .decode(inline.data.trim())
                .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;
            outputs.push(Output::Image {
                mime: Some(inline.mime_type),
                data,
            });
        }
    }

    Ok(GenerateResponse::new(outputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::dto::{Candidate, InlineData, PromptFeedback};
    use serde_json::json;
    use storyboard_core::Message;

    fn request(format: ResponseFormat) -> GenerateRequest {
        GenerateRequest::builder()
            .messages(vec![
                Message::system("You are a storyboard artist."),
                Message::user("Draw page 1"),
            ])
            .temperature(Some(0.4))
            .response_format(format)
            .build()
            .unwrap()
    }

    #[test]
    fn system_messages_become_system_instruction() {
        let wire = to_gemini_request(&request(ResponseFormat::Text)).unwrap();
        let body = serde_json::to_value(&wire).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a storyboard artist.");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["temperature"], 0.4_f32 as f64);
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn json_format_sets_schema() {
        let schema = json!({"type": "OBJECT", "properties": {"story": {"type": "STRING"}}});
        let wire = to_gemini_request(&request(ResponseFormat::Json {
            schema: schema.clone(),
        }))
        .unwrap();
        let config = wire.generation_config().clone().unwrap();

        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(config.response_schema, Some(schema));
    }

    #[test]
    fn image_format_requests_image_modality() {
        let wire = to_gemini_request(&request(ResponseFormat::Image {
            aspect_ratio: Some("3:4".to_string()),
        }))
        .unwrap();
        let body = serde_json::to_value(&wire).unwrap();

        assert_eq!(body["generationConfig"]["responseModalities"], json!(["IMAGE"]));
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "3:4");
    }

    #[test]
    fn system_only_request_is_rejected() {
        let req = GenerateRequest::builder()
            .messages(vec![Message::system("rules")])
            .build()
            .unwrap();
        let err = to_gemini_request(&req).unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::UnsupportedInput(_)));
    }

    #[test]
    fn response_with_image_part() {
        let response = GeminiResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".into()),
                    parts: vec![
                        Part {
                            text: Some("thinking".into()),
                            thought: Some(true),
                            ..Default::default()
                        },
                        Part::text("Here is your page"),
                        Part {
                            inline_data: Some(InlineData {
                                mime_type: "image/png".into(),
                                data: "AQID".into(),
                            }),
                            ..Default::default()
                        },
                    ],
                }),
                finish_reason: Some("STOP".into()),
            }],
            ..Default::default()
        };

        let converted = from_gemini_response(response).unwrap();
        assert_eq!(converted.text(), "Here is your page");
        let (mime, data) = converted.first_image().unwrap();
        assert_eq!(mime, Some("image/png"));
        assert_eq!(data, &[1, 2, 3]);
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let response = GeminiResponse {
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".into()),
            }),
            ..Default::default()
        };
        let err = from_gemini_response(response).unwrap_err();
        assert_eq!(err.kind, GeminiErrorKind::Blocked("SAFETY".into()));
    }

    #[test]
    fn empty_response_has_no_candidates() {
        let err = from_gemini_response(GeminiResponse::default()).unwrap_err();
        assert_eq!(err.kind, GeminiErrorKind::NoCandidates);
    }

    #[test]
    fn bad_base64_is_an_error() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "***"}}]}
            }]
        }))
        .unwrap();
        let err = from_gemini_response(response).unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::Base64Decode(_)));
    }
}
