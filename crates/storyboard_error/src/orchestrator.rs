//! Orchestrator error types.

/// Specific error conditions for orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OrchestratorErrorKind {
    /// Operation is not allowed in the current step
    #[display("Cannot {} while in the {} step", action, step)]
    InvalidTransition {
        /// Current step name
        step: String,
        /// Attempted operation
        action: String,
    },
    /// Production settings out of bounds
    #[display("Invalid production config: {}", _0)]
    InvalidConfig(String),
    /// No storyboard has been produced yet
    #[display("No storyboard is loaded")]
    NoStoryboard,
    /// No page with the given id
    #[display("Page '{}' not found", _0)]
    PageNotFound(String),
    /// No scene with the given id
    #[display("Scene '{}' not found", _0)]
    SceneNotFound(String),
    /// Illustration worker has stopped
    #[display("Illustration worker is not running")]
    WorkerStopped,
}

/// Error type for orchestrator operations.
///
/// # Examples
///
/// ```
/// use storyboard_error::{OrchestratorError, OrchestratorErrorKind};
///
/// let err = OrchestratorError::new(OrchestratorErrorKind::NoStoryboard);
/// assert!(format!("{}", err).contains("No storyboard"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Orchestrator Error: {} at line {} in {}", kind, line, file)]
pub struct OrchestratorError {
    /// The specific error condition
    pub kind: OrchestratorErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl OrchestratorError {
    /// Create a new OrchestratorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OrchestratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
