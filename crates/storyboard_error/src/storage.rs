//! Export and import error types.

/// Kinds of file errors raised while saving or loading storyboards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the output directory
    #[display("Failed to create directory {}: {}", path, message)]
    DirectoryCreation {
        /// Directory path
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// Failed to write a file
    #[display("Failed to write {}: {}", path, message)]
    FileWrite {
        /// File path
        path: String,
        /// Underlying I/O message
        message: String,
    },
    /// File does not exist
    #[display("File not found: {}", _0)]
    NotFound(String),
    /// Failed to read a file
    #[display("Failed to read {}: {}", path, message)]
    FileRead {
        /// File path
        path: String,
        /// Underlying I/O message
        message: String,
    },
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead {
///     path: "board.json".into(),
///     message: "No such file".into(),
/// });
/// assert!(format!("{}", err).contains("board.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
