//! Message types for generation requests.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A single message in a generation request.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Input, Message, MessageBuilder, Role};
///
/// let message = MessageBuilder::default()
///     .role(Role::User)
///     .content(vec![Input::Text("Hello!".to_string())])
///     .build()
///     .unwrap();
///
/// assert_eq!(message.role, Role::User);
/// assert_eq!(Message::user("Hello!"), message);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message
    pub content: Vec<Input>,
}

impl Message {
    /// A system message containing a single text part.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![Input::Text(text.into())],
        }
    }

    /// A user message containing a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Input::Text(text.into())],
        }
    }

    /// All text parts joined with newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(Input::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
