//! A fake generation service that answers every pipeline stage.

use std::collections::HashSet;

use serde_json::Value;
use storyboard_core::{GenerateRequest, GenerateResponse, ResponseFormat};
use storyboard_error::StoryboardResult;

use crate::driver::{ScriptedDriver, image_response, server_error, text_response};
use crate::fixtures::{concept_value, storyboard_value};

/// Builder for a [`ScriptedDriver`] that behaves like a well-formed service:
/// concept requests get a screenplay of `pages * panels` beats, structure
/// requests get an exact grid, and image requests get a PNG.
///
/// Individual pages can be made to fail or to come back without image data.
#[derive(Debug, Clone)]
pub struct FakeStudio {
    title: String,
    pages: u32,
    panels_per_page: u32,
    failing_pages: HashSet<u32>,
    imageless_pages: HashSet<u32>,
}

impl FakeStudio {
    /// A studio producing `pages` x `panels_per_page` storyboards.
    pub fn new(title: impl Into<String>, pages: u32, panels_per_page: u32) -> Self {
        Self {
            title: title.into(),
            pages,
            panels_per_page,
            failing_pages: HashSet::new(),
            imageless_pages: HashSet::new(),
        }
    }

    /// Image requests for `page` fail with an HTTP 500.
    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Image requests for `page` succeed but carry no image part.
    pub fn imageless_page(mut self, page: u32) -> Self {
        self.imageless_pages.insert(page);
        self
    }

    /// The driver.
    pub fn driver(self) -> ScriptedDriver {
        ScriptedDriver::new(move |request| self.respond(request))
    }

    fn respond(&self, request: &GenerateRequest) -> StoryboardResult<GenerateResponse> {
        match request.response_format() {
            ResponseFormat::Json { schema } => {
                let body = if is_concept_schema(schema) {
                    concept_value(self.pages * self.panels_per_page)
                } else {
                    storyboard_value(&self.title, self.pages, self.panels_per_page)
                };
                Ok(text_response(body.to_string()))
            }
            ResponseFormat::Image { .. } => {
                match page_number(&request.prompt_text()) {
                    Some(page) if self.failing_pages.contains(&page) => {
                        Err(server_error(format!("render failed for page {page}")).into())
                    }
                    Some(page) if self.imageless_pages.contains(&page) => {
                        Ok(text_response("I cannot draw that."))
                    }
                    _ => Ok(image_response()),
                }
            }
            ResponseFormat::Text => Ok(text_response("ok")),
        }
    }
}

fn is_concept_schema(schema: &Value) -> bool {
    schema["properties"].get("screenplay").is_some()
}

/// Page number from a page prompt's `Storyboard page N:` heading.
fn page_number(prompt: &str) -> Option<u32> {
    let rest = &prompt[prompt.find("Storyboard page ")? + "Storyboard page ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
