//! Configuration error types.

/// Configuration error with source location.
///
/// `path` names the configuration file that triggered the error when one is
/// known; layered loads that fail after merging leave it empty.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Offending configuration file, if any
    pub path: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing required field: gemini.text_model")
    ///     .with_path("storyboard.toml");
    /// assert!(err.message.contains("Missing required"));
    /// assert_eq!(err.path.as_deref(), Some("storyboard.toml"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Record which configuration file was being read.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
