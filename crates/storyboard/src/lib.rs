//! Storyboard - turn a story idea into an illustrated storyboard.
//!
//! A production run takes a one-line idea (or a finished screenplay),
//! develops it into a beat-by-beat screenplay, structures the screenplay into
//! a fixed grid of pages and panels, and renders each page as a single
//! monochrome sketch.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyboard::{GeminiClient, Mode, Orchestrator, ProductionConfig, StoryboardConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryboardConfig::load()?;
//!     let client = Arc::new(GeminiClient::new()?);
//!
//!     let mut studio = Orchestrator::new(
//!         client,
//!         config.pipeline_settings()?,
//!         config.studio_settings(),
//!         ProductionConfig::new(5, 4, Mode::Creative)?,
//!     );
//!     studio.submit_idea("A lighthouse keeper finds a message in a bottle").await?;
//!     studio.confirm_development().await?;
//!     studio.wait_idle().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` - Google Gemini backend (default)
//! - `api` - Gate tests that call the real service
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types
//! - `storyboard_core` - Request/response and storyboard data types
//! - `storyboard_interface` - `StoryboardDriver` trait
//! - `storyboard_models` - Gemini REST client
//! - `storyboard_pipeline` - Concept, structure and illustration stages
//! - `storyboard_orchestrator` - Production state machine and illustration worker
//!
//! This crate re-exports everything and adds configuration loading, file
//! export and the `storyboard` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod export;
mod logging;
mod studio;

pub use config::{GeminiSection, ProductionSection, StoryboardConfig, StudioSection};
pub use export::{
    STORYBOARD_FILE, page_file_name, panel_file_name, read_storyboard, read_text, write_storyboard,
};
pub use logging::init_tracing;
pub use studio::{RedrawTarget, Reply, STUDIO_HELP, StudioCommand, StudioSession, render_state};

pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_orchestrator::*;
pub use storyboard_pipeline::*;

#[cfg(feature = "gemini")]
pub use storyboard_models::*;
