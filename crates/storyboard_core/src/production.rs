//! Production settings chosen before a run starts.

use serde::{Deserialize, Serialize};
use storyboard_error::{BuilderError, BuilderErrorKind};

/// Smallest allowed page count.
pub const MIN_PAGES: u32 = 1;
/// Largest allowed page count.
pub const MAX_PAGES: u32 = 15;
/// Smallest allowed panels-per-page count.
pub const MIN_PANELS_PER_PAGE: u32 = 4;
/// Largest allowed panels-per-page count.
pub const MAX_PANELS_PER_PAGE: u32 = 10;

/// How a run gets from the user's text to a storyboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Develop the idea into a screenplay first, then structure it.
    #[default]
    Creative,
    /// Treat the submitted text as the screenplay and structure it directly.
    Quick,
}

/// What to do with a model response that does not match the requested
/// schema.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResponsePolicy {
    /// Fail with an invalid-response-shape error.
    #[default]
    Strict,
    /// Degrade silently to empty values.
    Lenient,
}

/// Page grid and mode for one production run.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Mode, ProductionConfig};
///
/// let config = ProductionConfig::new(5, 4, Mode::Creative).unwrap();
/// assert_eq!(config.total_panels(), 20);
///
/// assert!(ProductionConfig::new(16, 4, Mode::Quick).is_err());
/// assert!(ProductionConfig::new(5, 3, Mode::Quick).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionConfig {
    pages: u32,
    panels_per_page: u32,
    mode: Mode,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            pages: 5,
            panels_per_page: 4,
            mode: Mode::Creative,
        }
    }
}

impl ProductionConfig {
    /// Creates a config, enforcing the page and panel bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `pages` is outside 1–15 or `panels_per_page` is
    /// outside 4–10.
    pub fn new(pages: u32, panels_per_page: u32, mode: Mode) -> Result<Self, BuilderError> {
        if !(MIN_PAGES..=MAX_PAGES).contains(&pages) {
            return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                field: "pages".to_string(),
                reason: format!("must be between {MIN_PAGES} and {MAX_PAGES}, got {pages}"),
            }));
        }
        if !(MIN_PANELS_PER_PAGE..=MAX_PANELS_PER_PAGE).contains(&panels_per_page) {
            return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                field: "panels_per_page".to_string(),
                reason: format!(
                    "must be between {MIN_PANELS_PER_PAGE} and {MAX_PANELS_PER_PAGE}, got {panels_per_page}"
                ),
            }));
        }
        Ok(Self {
            pages,
            panels_per_page,
            mode,
        })
    }

    /// Number of pages.
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Panels on each page.
    pub fn panels_per_page(&self) -> u32 {
        self.panels_per_page
    }

    /// Selected mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Same grid with a different mode.
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Total panel count across all pages.
    pub fn total_panels(&self) -> u32 {
        self.pages * self.panels_per_page
    }
}
