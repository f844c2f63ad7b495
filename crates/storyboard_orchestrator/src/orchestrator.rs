//! The production state machine.

use crate::job::{IllustrationEvent, IllustrationJob, IllustrationTarget, Subject, WorkerMessage};
use crate::state::{AppState, Step};
use crate::worker::IllustrationWorker;
use crate::StudioSettings;
use storyboard_core::{
    Character, DevelopedStory, Illustration, Mode, ProductionConfig, StoryboardData,
};
use storyboard_error::{
    OrchestratorError, OrchestratorErrorKind, PipelineError, PipelineErrorKind,
    StoryboardError, StoryboardResult,
};
use storyboard_interface::StoryboardDriver;
use storyboard_pipeline::{Pipeline, PipelineSettings};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Owns the [`AppState`] and sequences the concept, structure and
/// illustration stages.
///
/// Text stages run inline on the caller's task. Illustration jobs go to a
/// single background worker whose progress comes back as
/// [`IllustrationEvent`]s; nothing changes state until the caller applies
/// them with [`Orchestrator::next_event`], [`Orchestrator::drain_events`] or
/// [`Orchestrator::wait_idle`].
///
/// Must be created inside a tokio runtime.
pub struct Orchestrator<D> {
    pipeline: Pipeline<D>,
    settings: StudioSettings,
    state: AppState,
    jobs: mpsc::UnboundedSender<WorkerMessage>,
    events: mpsc::UnboundedReceiver<IllustrationEvent>,
    outstanding: usize,
    snapshots: watch::Sender<AppState>,
    worker: Option<JoinHandle<()>>,
}

impl<D> std::fmt::Debug for Orchestrator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("outstanding", &self.outstanding)
            .finish_non_exhaustive()
    }
}

impl<D> Orchestrator<D>
where
    D: StoryboardDriver + Clone + 'static,
{
    /// Creates an orchestrator in the input step and starts its worker.
    pub fn new(
        driver: D,
        pipeline_settings: PipelineSettings,
        settings: StudioSettings,
        config: ProductionConfig,
    ) -> Self {
        let pipeline = Pipeline::new(driver, pipeline_settings);
        let (jobs, job_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let worker = IllustrationWorker::new(
            pipeline.illustrator.clone(),
            settings.illustration_pause,
            event_tx,
        );
        let handle = tokio::spawn(worker.run(job_rx));

        let state = AppState::new(config);
        let (snapshots, _) = watch::channel(state.clone());

        info!(
            run_id = %state.run_id(),
            pages = config.pages(),
            panels_per_page = config.panels_per_page(),
            "Orchestrator started"
        );

        Self {
            pipeline,
            settings,
            state,
            jobs,
            events,
            outstanding: 0,
            snapshots,
            worker: Some(handle),
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Orchestrator settings.
    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    /// A receiver that sees a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.snapshots.subscribe()
    }

    /// Number of queued or running illustration jobs, including any left
    /// over from a discarded run.
    pub fn outstanding_jobs(&self) -> usize {
        self.outstanding
    }

    /// Switches between creative and quick mode.
    ///
    /// # Errors
    ///
    /// Only allowed in the input step.
    pub fn select_mode(&mut self, mode: Mode) -> StoryboardResult<()> {
        self.require_step(Step::Input, "change mode")?;
        let config = self.state.config().with_mode(mode);
        self.state.set_config(config);
        debug!(%mode, "Mode selected");
        self.publish();
        Ok(())
    }

    /// Replaces the page grid and mode.
    ///
    /// # Errors
    ///
    /// Only allowed in the input step.
    pub fn configure(&mut self, config: ProductionConfig) -> StoryboardResult<()> {
        self.require_step(Step::Input, "configure")?;
        self.state.set_config(config);
        self.publish();
        Ok(())
    }

    /// Validates and applies a page grid, keeping the current mode.
    ///
    /// # Errors
    ///
    /// Fails outside the input step or when the grid is out of bounds.
    pub fn set_grid(&mut self, pages: u32, panels_per_page: u32) -> StoryboardResult<()> {
        let config = ProductionConfig::new(pages, panels_per_page, self.state.mode()).map_err(
            |e| OrchestratorError::new(OrchestratorErrorKind::InvalidConfig(e.kind().to_string())),
        )?;
        self.configure(config)
    }

    /// Submits the seed text.
    ///
    /// In creative mode the text is developed into a screenplay and the run
    /// moves to the development step. In quick mode the text is the
    /// screenplay; it is structured immediately and the run moves to the
    /// storyboard step.
    ///
    /// # Errors
    ///
    /// Only allowed in the input step. Blank text and stage failures leave
    /// the run in the input step with `last_error` set.
    #[instrument(skip(self, text), fields(run_id = %self.state.run_id()))]
    pub async fn submit_idea(&mut self, text: &str) -> StoryboardResult<()> {
        self.require_step(Step::Input, "submit an idea")?;
        if text.trim().is_empty() {
            let err: StoryboardError =
                PipelineError::new(PipelineErrorKind::EmptyInput("Idea".into())).into();
            return Err(self.record_error(err));
        }

        self.state.set_idea(text.to_string());
        self.state.set_last_error(None);
        let config = *self.state.config();

        match config.mode() {
            Mode::Creative => {
                let result = self
                    .pipeline
                    .concept
                    .develop(text, config.total_panels())
                    .await;
                let developed = result.map_err(|e| self.record_error(e))?;
                self.state.set_developed(Some(developed));
                self.state.set_step(Step::Development);
                info!("Entered development step");
                self.publish();
            }
            Mode::Quick => {
                let result = self
                    .pipeline
                    .structurer
                    .structure(text, config.pages(), config.panels_per_page())
                    .await;
                let board = result.map_err(|e| self.record_error(e))?;
                self.state
                    .set_developed(Some(DevelopedStory::new(String::new(), text)));
                self.enter_storyboard(board)?;
            }
        }
        Ok(())
    }

    /// Replaces the developed screenplay before confirmation.
    ///
    /// # Errors
    ///
    /// Only allowed in the development step.
    pub fn edit_screenplay(&mut self, screenplay: &str) -> StoryboardResult<()> {
        self.require_step(Step::Development, "edit the screenplay")?;
        if let Some(developed) = self.state.developed_mut() {
            developed.screenplay = screenplay.to_string();
        }
        self.publish();
        Ok(())
    }

    /// Structures the developed screenplay and moves to the storyboard step.
    ///
    /// # Errors
    ///
    /// Only allowed in the development step. A structure failure leaves the
    /// run in the development step with `last_error` set.
    #[instrument(skip(self), fields(run_id = %self.state.run_id()))]
    pub async fn confirm_development(&mut self) -> StoryboardResult<()> {
        self.require_step(Step::Development, "confirm development")?;
        let screenplay = self
            .state
            .developed()
            .as_ref()
            .map(|developed| developed.screenplay.clone())
            .unwrap_or_default();
        let config = *self.state.config();
        self.state.set_last_error(None);

        let result = self
            .pipeline
            .structurer
            .structure(&screenplay, config.pages(), config.panels_per_page())
            .await;
        let board = result.map_err(|e| self.record_error(e))?;
        self.enter_storyboard(board)
    }

    /// Queues every page for illustration, in page order.
    ///
    /// # Errors
    ///
    /// Only allowed in the storyboard step.
    pub fn illustrate_all_pages(&mut self) -> StoryboardResult<()> {
        self.require_step(Step::Storyboard, "illustrate pages")?;
        let ids = self
            .board()?
            .pages()
            .iter()
            .map(|page| page.id().clone())
            .collect::<Vec<_>>();
        for id in ids {
            self.illustrate_page(&id)?;
        }
        Ok(())
    }

    /// Queues one page for (re-)illustration.
    ///
    /// The page is captured as it is now; later edits need another call.
    ///
    /// # Errors
    ///
    /// Only allowed in the storyboard step, for an existing page.
    pub fn illustrate_page(&mut self, page_id: &str) -> StoryboardResult<()> {
        self.require_step(Step::Storyboard, "illustrate a page")?;
        let board = self.board()?;
        let page = board.page(page_id).cloned().ok_or_else(|| {
            OrchestratorError::new(OrchestratorErrorKind::PageNotFound(page_id.to_string()))
        })?;
        let characters = board.characters().clone();
        self.enqueue(Subject::Page(page), characters)
    }

    /// Queues one panel for illustration on its own.
    ///
    /// # Errors
    ///
    /// Only allowed in the storyboard step, for an existing scene.
    pub fn illustrate_scene(&mut self, scene_id: &str) -> StoryboardResult<()> {
        self.require_step(Step::Storyboard, "illustrate a scene")?;
        let board = self.board()?;
        let (_, scene) = board.scene(scene_id).ok_or_else(|| {
            OrchestratorError::new(OrchestratorErrorKind::SceneNotFound(scene_id.to_string()))
        })?;
        let scene = scene.clone();
        let characters = board.characters().clone();
        self.enqueue(Subject::Scene(scene), characters)
    }

    /// Replaces one scene's action text. No other scene, page or image is
    /// touched.
    ///
    /// # Errors
    ///
    /// Only allowed in the storyboard step, for an existing scene.
    pub fn edit_scene_action(&mut self, scene_id: &str, action: &str) -> StoryboardResult<()> {
        self.require_step(Step::Storyboard, "edit a scene")?;
        let scene = self
            .state
            .storyboard_mut()
            .ok_or_else(|| OrchestratorError::new(OrchestratorErrorKind::NoStoryboard))?
            .scene_mut(scene_id)
            .ok_or_else(|| {
                OrchestratorError::new(OrchestratorErrorKind::SceneNotFound(scene_id.to_string()))
            })?;
        scene.set_action(action);
        debug!(scene_id, "Scene action edited");
        self.publish();
        Ok(())
    }

    /// Discards the run and returns to the input step with the same grid
    /// and mode. Jobs already queued still run; their results are dropped.
    pub fn restart(&mut self) {
        let old = *self.state.run_id();
        self.state.reset();
        info!(old_run = %old, new_run = %self.state.run_id(), "Run restarted");
        self.publish();
    }

    /// Waits for the next worker event and applies it.
    ///
    /// Returns `None` once the worker has stopped.
    pub async fn next_event(&mut self) -> Option<IllustrationEvent> {
        let event = self.events.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Applies every event that is already waiting, without blocking.
    /// Returns the applied events in arrival order.
    pub fn drain_events(&mut self) -> Vec<IllustrationEvent> {
        let mut applied = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            self.apply(&event);
            applied.push(event);
        }
        applied
    }

    /// Applies events until no job is queued or running.
    ///
    /// # Errors
    ///
    /// Fails if the worker stops with jobs still outstanding.
    pub async fn wait_idle(&mut self) -> StoryboardResult<()> {
        while self.outstanding > 0 {
            if self.next_event().await.is_none() {
                return Err(OrchestratorError::new(OrchestratorErrorKind::WorkerStopped).into());
            }
        }
        Ok(())
    }

    /// Stops the worker after the jobs already queued and waits for it.
    pub async fn shutdown(mut self) {
        let _ = self.jobs.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.worker.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Illustration worker ended abnormally");
        }
    }

    fn enter_storyboard(&mut self, board: StoryboardData) -> StoryboardResult<()> {
        info!(
            pages = board.pages().len(),
            panels = board.panel_count(),
            "Entered storyboard step"
        );
        self.state.set_storyboard(Some(board));
        self.state.set_step(Step::Storyboard);
        self.publish();
        if self.settings.auto_illustrate {
            self.illustrate_all_pages()?;
        }
        Ok(())
    }

    fn enqueue(
        &mut self,
        subject: Subject,
        characters: Vec<Character>,
    ) -> StoryboardResult<()> {
        let job = IllustrationJob {
            run_id: *self.state.run_id(),
            subject,
            characters,
        };
        debug!(target = %job.target(), "Queueing illustration");
        self.jobs
            .send(WorkerMessage::Job(Box::new(job)))
            .map_err(|_| OrchestratorError::new(OrchestratorErrorKind::WorkerStopped))?;
        self.outstanding += 1;
        Ok(())
    }

    /// One event, one transition.
    fn apply(&mut self, event: &IllustrationEvent) {
        if matches!(event, IllustrationEvent::Finished { .. }) {
            self.outstanding = self.outstanding.saturating_sub(1);
        }

        if event.run_id() != *self.state.run_id() {
            debug!(run_id = %event.run_id(), "Dropping event from a discarded run");
            return;
        }

        let (illustration, failure) = match event {
            IllustrationEvent::Started { .. } => (Illustration::InProgress, None),
            IllustrationEvent::Finished {
                result: Ok(image), ..
            } => (Illustration::Illustrated(image.clone()), None),
            IllustrationEvent::Finished {
                result: Err(message),
                ..
            } => (
                Illustration::Failed(message.clone()),
                Some(message.clone()),
            ),
        };

        let Some(board) = self.state.storyboard_mut() else {
            return;
        };

        let label = match event.target() {
            IllustrationTarget::Page(id) => match board.page_mut(id) {
                Some(page) => {
                    page.set_illustration(illustration);
                    format!("Page {}", page.page_number())
                }
                None => return,
            },
            IllustrationTarget::Scene(id) => match board.scene_mut(id) {
                Some(scene) => {
                    scene.set_illustration(illustration);
                    format!("Scene {id}")
                }
                None => return,
            },
        };

        if let Some(message) = failure {
            warn!(target = %event.target(), error = %message, "Illustration failed");
            self.state
                .set_last_error(Some(format!("{label} could not be illustrated: {message}")));
        }
        self.publish();
    }

    fn board(&self) -> StoryboardResult<&StoryboardData> {
        self.state
            .storyboard()
            .as_ref()
            .ok_or_else(|| OrchestratorError::new(OrchestratorErrorKind::NoStoryboard).into())
    }

    fn require_step(&self, step: Step, action: &str) -> StoryboardResult<()> {
        if *self.state.step() == step {
            Ok(())
        } else {
            Err(OrchestratorError::new(OrchestratorErrorKind::InvalidTransition {
                step: self.state.step().to_string(),
                action: action.to_string(),
            })
            .into())
        }
    }

    fn record_error(&mut self, err: StoryboardError) -> StoryboardError {
        warn!(error = %err, "Stage failed");
        self.state.set_last_error(Some(err.user_message()));
        self.publish();
        err
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }
}
