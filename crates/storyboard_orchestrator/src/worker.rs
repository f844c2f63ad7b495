//! The single illustration worker.

use crate::job::{IllustrationEvent, IllustrationJob, Subject, WorkerMessage};
use std::time::Duration;
use storyboard_interface::StoryboardDriver;
use storyboard_pipeline::PageIllustrator;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Consumes jobs one at a time, so at most one image request is ever in
/// flight.
pub(crate) struct IllustrationWorker<D> {
    illustrator: PageIllustrator<D>,
    pause: Duration,
    events: mpsc::UnboundedSender<IllustrationEvent>,
}

impl<D: StoryboardDriver> IllustrationWorker<D> {
    pub(crate) fn new(
        illustrator: PageIllustrator<D>,
        pause: Duration,
        events: mpsc::UnboundedSender<IllustrationEvent>,
    ) -> Self {
        Self {
            illustrator,
            pause,
            events,
        }
    }

    #[instrument(skip_all)]
    pub(crate) async fn run(self, mut rx: mpsc::UnboundedReceiver<WorkerMessage>) {
        info!("Illustration worker started");

        while let Some(message) = rx.recv().await {
            match message {
                WorkerMessage::Job(job) => {
                    if !self.process(*job).await {
                        warn!("Event receiver dropped, stopping worker");
                        break;
                    }
                }
                WorkerMessage::Shutdown => {
                    info!("Illustration worker shutting down");
                    break;
                }
            }
        }
    }

    /// Runs one job. Returns false once nobody is listening for events.
    async fn process(&self, job: IllustrationJob) -> bool {
        let target = job.target();
        let run_id = job.run_id;

        if self
            .events
            .send(IllustrationEvent::Started {
                run_id,
                target: target.clone(),
            })
            .is_err()
        {
            return false;
        }

        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }

        debug!(target = %target, "Rendering");
        let outcome = match &job.subject {
            Subject::Page(page) => {
                self.illustrator
                    .illustrate_page(page, &job.characters)
                    .await
            }
            Subject::Scene(scene) => {
                self.illustrator
                    .illustrate_scene(scene, &job.characters)
                    .await
            }
        };

        let result = outcome.map_err(|e| {
            error!(target = %target, error = %e, "Illustration failed");
            e.user_message()
        });

        self.events
            .send(IllustrationEvent::Finished {
                run_id,
                target,
                result,
            })
            .is_ok()
    }
}
