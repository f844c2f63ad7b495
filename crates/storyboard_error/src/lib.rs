//! Error types for the Storyboard workspace.
//!
//! This crate provides the foundation error types used by every other
//! storyboard crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{HttpError, StoryboardResult};
//!
//! fn fetch_data() -> StoryboardResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod gemini;
mod http;
mod json;
mod orchestrator;
mod pipeline;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use orchestrator::{OrchestratorError, OrchestratorErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
