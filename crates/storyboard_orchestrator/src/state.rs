//! Application state owned by the orchestrator.

use serde::{Deserialize, Serialize};
use storyboard_core::{DevelopedStory, Mode, ProductionConfig, StoryboardData};
use uuid::Uuid;

/// Where a production run is.
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
#[strum(serialize_all = "lowercase")]
pub enum Step {
    /// Collecting settings and the seed text
    #[default]
    Input,
    /// Reviewing the developed screenplay (creative mode only)
    Development,
    /// Storyboard structured; illustration and edits happen here
    Storyboard,
}

/// Everything the user sees, as one value.
///
/// A fresh `run_id` is drawn on every restart; illustration results tagged
/// with an older id are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    run_id: Uuid,
    step: Step,
    config: ProductionConfig,
    idea: String,
    developed: Option<DevelopedStory>,
    storyboard: Option<StoryboardData>,
    last_error: Option<String>,
}

impl AppState {
    /// A new run in the input step.
    pub fn new(config: ProductionConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            step: Step::Input,
            config,
            idea: String::new(),
            developed: None,
            storyboard: None,
            last_error: None,
        }
    }

    /// Selected mode.
    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    /// Count of pages and scenes currently being illustrated.
    pub fn in_progress_count(&self) -> usize {
        self.storyboard.as_ref().map_or(0, |board| {
            board
                .pages()
                .iter()
                .map(|page| {
                    usize::from(page.illustration().is_in_progress())
                        + page
                            .scenes()
                            .iter()
                            .filter(|scene| scene.illustration().is_in_progress())
                            .count()
                })
                .sum()
        })
    }

    /// Discards the run and starts a fresh one with the same settings.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub(crate) fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    pub(crate) fn set_config(&mut self, config: ProductionConfig) {
        self.config = config;
    }

    pub(crate) fn set_idea(&mut self, idea: String) {
        self.idea = idea;
    }

    pub(crate) fn set_developed(&mut self, developed: Option<DevelopedStory>) {
        self.developed = developed;
    }

    pub(crate) fn developed_mut(&mut self) -> Option<&mut DevelopedStory> {
        self.developed.as_mut()
    }

    pub(crate) fn set_storyboard(&mut self, storyboard: Option<StoryboardData>) {
        self.storyboard = storyboard;
    }

    pub(crate) fn storyboard_mut(&mut self) -> Option<&mut StoryboardData> {
        self.storyboard.as_mut()
    }

    pub(crate) fn set_last_error(&mut self, message: Option<String>) {
        self.last_error = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_settings_and_draws_new_run() {
        let config = ProductionConfig::new(3, 6, Mode::Quick).unwrap();
        let mut state = AppState::new(config);
        let first_run = *state.run_id();
        state.set_idea("idea".into());
        state.set_step(Step::Storyboard);
        state.set_last_error(Some("boom".into()));

        state.reset();

        assert_ne!(*state.run_id(), first_run);
        assert_eq!(*state.step(), Step::Input);
        assert_eq!(state.idea(), "");
        assert_eq!(state.last_error(), &None);
        assert_eq!(*state.config(), config);
    }

    #[test]
    fn step_names() {
        assert_eq!(Step::Development.to_string(), "development");
    }
}
