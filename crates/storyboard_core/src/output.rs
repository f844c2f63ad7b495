//! Output types from generation responses.

use serde::{Deserialize, Serialize};

/// Content returned by a generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output. Schema-constrained JSON responses also arrive as
    /// text and are parsed by the caller.
    Text(String),

    /// Generated image output.
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },

    /// Structured JSON output already decoded by the driver.
    Json(serde_json::Value),
}
