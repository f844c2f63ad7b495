//! Input types for generation requests.

use serde::{Deserialize, Serialize};

/// Content that can be sent to a generation service.
///
/// # Examples
///
/// ```
/// use storyboard_core::Input;
///
/// let text = Input::Text("A lighthouse keeper finds a message in a bottle".to_string());
/// assert_eq!(text.text(), "A lighthouse keeper finds a message in a bottle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),
}

impl Input {
    /// Text content.
    pub fn text(&self) -> &str {
        match self {
            Input::Text(text) => text,
        }
    }
}
