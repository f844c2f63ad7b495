//! Storyboard domain model.
//!
//! Everything here is created fresh for a production run and discarded on
//! restart. Characters are immutable once structured; scenes accept action
//! edits; pages and scenes carry their own [`Illustration`] state.

use crate::Illustration;
use serde::{Deserialize, Serialize};

/// The concept stage's output: a short summary and the beat-by-beat
/// screenplay it was expanded into.
///
/// # Examples
///
/// ```
/// use storyboard_core::DevelopedStory;
///
/// let story = DevelopedStory::new("A keeper's lonely vigil.", "1. Waves crash.\n2. A bottle washes up.");
/// assert_eq!(story.beats().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DevelopedStory {
    /// Narrative summary
    pub story: String,
    /// Full screenplay text
    pub screenplay: String,
}

impl DevelopedStory {
    /// Creates a developed story.
    pub fn new(story: impl Into<String>, screenplay: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            screenplay: screenplay.into(),
        }
    }

    /// Non-blank screenplay lines.
    pub fn beats(&self) -> impl Iterator<Item = &str> {
        self.screenplay
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// True when both fields are blank (the lenient policy's fallback).
    pub fn is_empty(&self) -> bool {
        self.story.trim().is_empty() && self.screenplay.trim().is_empty()
    }
}

/// A recurring character, reduced to a minimalist visual descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Character {
    /// Unique identifier
    id: String,
    /// Display name
    name: String,
    /// Silhouette/mannequin-style appearance description
    description: String,
}

impl Character {
    /// Creates a character.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One panel of a page.
///
/// # Examples
///
/// ```
/// use storyboard_core::SceneBuilder;
///
/// let scene = SceneBuilder::default()
///     .id("p1-s1")
///     .scene_number(1u32)
///     .location("Lighthouse gallery")
///     .time_of_day("Dusk")
///     .action("The keeper spots a glint in the surf.")
///     .visual_prompt("Wide shot, mannequin figure at railing, beam sweeping")
///     .build()
///     .unwrap();
///
/// assert_eq!(scene.dialogue(), &None);
/// assert!(!scene.illustration().is_in_progress());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Scene {
    /// Unique identifier across the whole storyboard
    id: String,
    /// 1-based position within the page
    scene_number: u32,
    /// Where the panel takes place
    location: String,
    /// Time of day
    time_of_day: String,
    /// Action beat; user-editable
    action: String,
    /// Spoken line, if any
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dialogue: Option<String>,
    /// Self-contained prompt for illustrating this panel alone
    visual_prompt: String,
    /// Single-panel illustration state
    #[builder(default)]
    #[serde(default)]
    illustration: Illustration,
}

impl Scene {
    /// Replaces the action beat.
    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = action.into();
    }

    /// Replaces the illustration state.
    pub fn set_illustration(&mut self, illustration: Illustration) {
        self.illustration = illustration;
    }
}

/// A page: a fixed-size ordered run of panels plus a page-wide image.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Page {
    /// Unique identifier
    id: String,
    /// 1-based page number
    page_number: u32,
    /// Free-text layout intent
    #[builder(default)]
    #[serde(default)]
    layout_description: String,
    /// Panels in reading order
    scenes: Vec<Scene>,
    /// Whole-page illustration state
    #[builder(default)]
    #[serde(default)]
    illustration: Illustration,
}

impl Page {
    /// Replaces the illustration state.
    pub fn set_illustration(&mut self, illustration: Illustration) {
        self.illustration = illustration;
    }

    /// Scene with the given id, mutably.
    pub fn scene_mut(&mut self, scene_id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.id == scene_id)
    }

    /// True when the scenes are numbered 1..=len in order.
    pub fn has_contiguous_numbering(&self) -> bool {
        self.scenes
            .iter()
            .enumerate()
            .all(|(i, scene)| scene.scene_number as usize == i + 1)
    }
}

/// The root artifact of a production run.
///
/// # Examples
///
/// ```
/// use storyboard_core::{Character, StoryboardData};
///
/// let board = StoryboardData::new(
///     "The Bottle",
///     vec![Character::new("c1", "Keeper", "Grey mannequin in a long coat")],
///     vec![],
/// );
/// assert_eq!(board.panel_count(), 0);
/// assert!(board.character("c1").is_some());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct StoryboardData {
    /// Storyboard title
    title: String,
    /// Character roster, unique by id
    characters: Vec<Character>,
    /// Pages in order
    pages: Vec<Page>,
}

impl StoryboardData {
    /// Creates a storyboard.
    pub fn new(title: impl Into<String>, characters: Vec<Character>, pages: Vec<Page>) -> Self {
        Self {
            title: title.into(),
            characters,
            pages,
        }
    }

    /// Total panels across all pages.
    pub fn panel_count(&self) -> usize {
        self.pages.iter().map(|page| page.scenes.len()).sum()
    }

    /// Character with the given id.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Page with the given id.
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.id == page_id)
    }

    /// Page with the given id, mutably.
    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| page.id == page_id)
    }

    /// Page by its 1-based number.
    pub fn page_by_number(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|page| page.page_number == page_number)
    }

    /// Scene with the given id, with the page that holds it.
    pub fn scene(&self, scene_id: &str) -> Option<(&Page, &Scene)> {
        self.pages.iter().find_map(|page| {
            page.scenes
                .iter()
                .find(|scene| scene.id == scene_id)
                .map(|scene| (page, scene))
        })
    }

    /// Scene with the given id, mutably.
    pub fn scene_mut(&mut self, scene_id: &str) -> Option<&mut Scene> {
        self.pages
            .iter_mut()
            .find_map(|page| page.scene_mut(scene_id))
    }
}
