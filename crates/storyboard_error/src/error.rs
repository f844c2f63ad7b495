//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, GeminiError, HttpError, JsonError, OrchestratorError,
    PipelineError, StorageError,
};

/// Every error condition the storyboard crates can raise.
///
/// # Examples
///
/// ```
/// use storyboard_error::{HttpError, StoryboardError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: StoryboardError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Generation service error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Generation pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Orchestrator state error
    #[from(OrchestratorError)]
    Orchestrator(OrchestratorError),
    /// File export or import error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ConfigError, StoryboardResult};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// Pipeline error kind, if this error came from the generation pipeline.
    pub fn pipeline_kind(&self) -> Option<&crate::PipelineErrorKind> {
        match self.kind() {
            StoryboardErrorKind::Pipeline(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Orchestrator error kind, if this error came from the orchestrator.
    pub fn orchestrator_kind(&self) -> Option<&crate::OrchestratorErrorKind> {
        match self.kind() {
            StoryboardErrorKind::Orchestrator(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Short human-readable message without the location suffix.
    ///
    /// Used when the error has to be shown to an end user rather than logged.
    pub fn user_message(&self) -> String {
        match self.kind() {
            StoryboardErrorKind::Http(e) => e.message.clone(),
            StoryboardErrorKind::Json(e) => e.message.clone(),
            StoryboardErrorKind::Config(e) => e.message.clone(),
            StoryboardErrorKind::Builder(e) => e.kind().to_string(),
            StoryboardErrorKind::Gemini(e) => e.kind.to_string(),
            StoryboardErrorKind::Pipeline(e) => e.kind.to_string(),
            StoryboardErrorKind::Orchestrator(e) => e.kind.to_string(),
            StoryboardErrorKind::Storage(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to StoryboardErrorKind
impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
