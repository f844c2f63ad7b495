//! Trait definitions for Storyboard generation backends.
//!
//! The pipeline only ever talks to a [`StoryboardDriver`]; the Gemini client
//! and the test doubles both implement it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::StoryboardDriver;
