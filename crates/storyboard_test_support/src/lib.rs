//! Shared test drivers and fixtures for the Storyboard crates.

mod driver;
mod fixtures;
mod studio;

pub use driver::{
    ScriptedDriver, image_response, server_error, text_response, tiny_png,
};
pub use fixtures::{LIGHTHOUSE_IDEA, concept_value, page, scene, storyboard, storyboard_value};
pub use studio::FakeStudio;
