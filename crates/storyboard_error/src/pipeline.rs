//! Generation pipeline error types.

/// Specific error conditions raised by the concept, structure and
/// illustration stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Seed idea or screenplay is empty or whitespace
    #[display("{} must not be empty", _0)]
    EmptyInput(String),
    /// Requested panel count is zero
    #[display("Panel count must be at least 1, got {}", _0)]
    InvalidPanelCount(u32),
    /// Requested page grid is empty or too large
    #[display("Invalid page grid: {} pages x {} panels", pages, panels_per_page)]
    InvalidGrid {
        /// Requested page count
        pages: u32,
        /// Requested panels per page
        panels_per_page: u32,
    },
    /// Model produced no text to parse
    #[display("{} returned no text output", _0)]
    MissingTextOutput(String),
    /// Response did not match the requested schema
    #[display("Invalid response shape from {}: {}", operation, message)]
    InvalidResponseShape {
        /// Pipeline operation that received the response
        operation: String,
        /// What was wrong with it
        message: String,
    },
    /// Illustration response contained no inline image
    #[display("No image data in illustration response for {}", _0)]
    NoImageData(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use storyboard_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::NoImageData("page 1".into()));
/// assert!(format!("{}", err).contains("No image data"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`PipelineErrorKind::InvalidResponseShape`] error.
    #[track_caller]
    pub fn invalid_shape(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::InvalidResponseShape {
            operation: operation.into(),
            message: message.into(),
        })
    }
}
