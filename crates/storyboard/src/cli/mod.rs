//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyboard binary.

mod commands;
mod generate;
mod studio;

pub use commands::{Cli, Commands};
pub use generate::{CreateSource, create, develop, illustrate, resolve_grid, structure};
pub use studio::run_studio;
