//! Rendered images and per-entity illustration state.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// A rendered image returned by the illustration service.
///
/// Cloning is cheap: the bytes are shared. Serializes as a
/// `data:<mime>;base64,<payload>` URI so exported storyboards are
/// self-contained.
///
/// # Examples
///
/// ```
/// use storyboard_core::ImageHandle;
///
/// let handle = ImageHandle::new("image/png", vec![1, 2, 3]);
/// let uri = handle.to_data_uri();
/// assert_eq!(uri, "data:image/png;base64,AQID");
/// assert_eq!(ImageHandle::from_data_uri(&uri), Some(handle));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    mime: Arc<str>,
    data: Arc<[u8]>,
}

impl ImageHandle {
    /// Wraps decoded image bytes.
    pub fn new(mime: impl AsRef<str>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: Arc::from(mime.as_ref()),
            data: data.into(),
        }
    }

    /// Decodes a base64 payload.
    pub fn from_base64(mime: impl AsRef<str>, payload: &str) -> Result<Self, base64::DecodeError> {
        let data = STANDARD.decode(payload.trim())?;
        Ok(Self::new(mime, data))
    }

    /// Parses a `data:` URI produced by [`ImageHandle::to_data_uri`].
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime, payload) = rest.split_once(";base64,")?;
        Self::from_base64(mime, payload).ok()
    }

    /// MIME type of the image.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Renders the image as a displayable data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

impl Serialize for ImageHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImageHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Self::from_data_uri(&uri)
            .ok_or_else(|| serde::de::Error::custom("expected a base64 data URI"))
    }
}

/// Illustration progress of a page or a single panel.
///
/// Replaces the "optional image plus loading flag" pair: exactly one of
/// these holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Illustration {
    /// No illustration requested yet.
    #[default]
    Unillustrated,
    /// A request is queued or in flight.
    InProgress,
    /// Rendered successfully.
    Illustrated(ImageHandle),
    /// The last request failed; the message is user-facing.
    Failed(String),
}

impl Illustration {
    /// True while a request is outstanding.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Illustration::InProgress)
    }

    /// True once the last request finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Illustration::Illustrated(_) | Illustration::Failed(_))
    }

    /// The rendered image, if any.
    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            Illustration::Illustrated(image) => Some(image),
            _ => None,
        }
    }

    /// Short status label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Illustration::Unillustrated => "pending",
            Illustration::InProgress => "drawing",
            Illustration::Illustrated(_) => "done",
            Illustration::Failed(_) => "failed",
        }
    }
}
