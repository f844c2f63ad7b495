//! Orchestrator behavior settings.

use std::time::Duration;

/// Pause the worker takes before each illustration request.
pub const DEFAULT_ILLUSTRATION_PAUSE: Duration = Duration::from_millis(1000);

/// How the orchestrator drives illustration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyboard_orchestrator::StudioSettings;
///
/// let settings = StudioSettings::default()
///     .with_illustration_pause(Duration::ZERO)
///     .with_auto_illustrate(false);
///
/// assert!(!settings.auto_illustrate);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct StudioSettings {
    /// Delay between marking a job in progress and sending its request
    pub illustration_pause: Duration,
    /// Enqueue every page as soon as a storyboard is structured
    pub auto_illustrate: bool,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            illustration_pause: DEFAULT_ILLUSTRATION_PAUSE,
            auto_illustrate: true,
        }
    }
}
