//! Production state machine for Storyboard.
//!
//! A run moves `Input → Development → Storyboard` (creative mode) or
//! `Input → Storyboard` (quick mode). Once a storyboard exists, pages and
//! panels are illustrated one at a time by a background worker; the
//! [`Orchestrator`] applies its [`IllustrationEvent`]s to the [`AppState`]
//! in arrival order.
//!
//! # Example
//!
//! ```no_run
//! use storyboard_core::{Mode, ProductionConfig};
//! use storyboard_models::GeminiClient;
//! use storyboard_orchestrator::{Orchestrator, StudioSettings};
//! use storyboard_pipeline::PipelineSettings;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Arc::new(GeminiClient::new()?);
//! let mut studio = Orchestrator::new(
//!     driver,
//!     PipelineSettings::default(),
//!     StudioSettings::default(),
//!     ProductionConfig::new(5, 4, Mode::Creative)?,
//! );
//!
//! studio.submit_idea("A lighthouse keeper finds a message in a bottle").await?;
//! studio.confirm_development().await?;
//! studio.wait_idle().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod job;
mod orchestrator;
mod settings;
mod state;
mod worker;

pub use job::{IllustrationEvent, IllustrationTarget};
pub use orchestrator::Orchestrator;
pub use settings::{DEFAULT_ILLUSTRATION_PAUSE, StudioSettings};
pub use state::{AppState, Step};
