//! Messages exchanged with the illustration worker.

use storyboard_core::{Character, ImageHandle, Page, Scene};
use uuid::Uuid;

/// What a job renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IllustrationTarget {
    /// A whole page, by id
    Page(String),
    /// A single panel, by id
    Scene(String),
}

impl std::fmt::Display for IllustrationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(id) => write!(f, "page {id}"),
            Self::Scene(id) => write!(f, "scene {id}"),
        }
    }
}

/// The content to render, captured when the job is queued.
#[derive(Debug, Clone)]
pub(crate) enum Subject {
    Page(Page),
    Scene(Scene),
}

/// One queued illustration request.
#[derive(Debug, Clone)]
pub(crate) struct IllustrationJob {
    pub(crate) run_id: Uuid,
    pub(crate) subject: Subject,
    pub(crate) characters: Vec<Character>,
}

impl IllustrationJob {
    pub(crate) fn target(&self) -> IllustrationTarget {
        match &self.subject {
            Subject::Page(page) => IllustrationTarget::Page(page.id().clone()),
            Subject::Scene(scene) => IllustrationTarget::Scene(scene.id().clone()),
        }
    }
}

/// Worker inbox.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Job(Box<IllustrationJob>),
    Shutdown,
}

/// Progress reported by the worker, applied to state by the orchestrator.
#[derive(Debug, Clone)]
pub enum IllustrationEvent {
    /// The worker picked up a job.
    Started {
        /// Run the job belongs to
        run_id: Uuid,
        /// What is being rendered
        target: IllustrationTarget,
    },
    /// The job completed, successfully or not.
    Finished {
        /// Run the job belongs to
        run_id: Uuid,
        /// What was rendered
        target: IllustrationTarget,
        /// The image, or a user-facing failure message
        result: Result<ImageHandle, String>,
    },
}

impl IllustrationEvent {
    /// Run the event belongs to.
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Started { run_id, .. } | Self::Finished { run_id, .. } => *run_id,
        }
    }

    /// Target of the event.
    pub fn target(&self) -> &IllustrationTarget {
        match self {
            Self::Started { target, .. } | Self::Finished { target, .. } => target,
        }
    }
}
