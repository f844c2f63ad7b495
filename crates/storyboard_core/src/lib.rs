//! Core data types for the Storyboard generation pipeline.
//!
//! This crate provides the types shared by every other storyboard crate:
//! the provider-neutral request/response model used to talk to a generation
//! service, and the storyboard domain model (characters, scenes, pages).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod illustration;
mod input;
mod layout;
mod message;
mod output;
mod production;
mod request;
mod role;
mod storyboard;

pub use illustration::{ImageHandle, Illustration};
pub use input::Input;
pub use layout::{GridCell, PanelGrid};
pub use message::{Message, MessageBuilder};
pub use output::Output;
pub use production::{
    MAX_PAGES, MAX_PANELS_PER_PAGE, MIN_PAGES, MIN_PANELS_PER_PAGE, Mode, ProductionConfig,
    ResponsePolicy,
};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, ResponseFormat};
pub use role::Role;
pub use storyboard::{
    Character, DevelopedStory, Page, PageBuilder, Scene, SceneBuilder, StoryboardData,
};
