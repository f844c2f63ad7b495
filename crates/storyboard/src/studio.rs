//! Line-oriented interactive session over an [`Orchestrator`].
//!
//! Each input line parses into a [`StudioCommand`]; [`StudioSession::execute`]
//! maps it onto one orchestrator operation and returns the text to show.
//! Illustration progress arrives separately through
//! [`StudioSession::next_event`].

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use storyboard_core::{Illustration, Mode};
use storyboard_error::{OrchestratorError, OrchestratorErrorKind, StoryboardResult};
use storyboard_interface::StoryboardDriver;
use storyboard_orchestrator::{AppState, IllustrationEvent, IllustrationTarget, Orchestrator, Step};
use tracing::debug;

use crate::export::{read_text, write_storyboard};

/// Help text listing every session command.
pub const STUDIO_HELP: &str = "\
Commands:
  mode <creative|quick>      choose how the idea is handled
  pages <n>                  page count (1-15)
  panels <n>                 panels per page (4-10)
  idea <text>                submit the idea (or screenplay, in quick mode)
  script <file>              submit a screenplay file (quick mode); in development, replace the screenplay
  confirm                    structure the developed screenplay into pages
  show                       print the current state
  edit <scene-id> <action>   rewrite one panel's action
  redraw <page-number|all>   illustrate a page again
  panel <scene-id>           illustrate one panel on its own
  save <dir>                 write storyboard.json and images
  restart                    discard this run and start over
  help                       show this list
  quit                       leave the studio";

/// Which pages `redraw` targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawTarget {
    /// Every page, in order
    All,
    /// One page by number
    Page(u32),
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioCommand {
    /// Select creative or quick mode
    Mode(Mode),
    /// Set the page count
    Pages(u32),
    /// Set the panels per page
    Panels(u32),
    /// Submit seed text
    Idea(String),
    /// Submit or replace a screenplay from a file
    Script(PathBuf),
    /// Confirm the developed screenplay
    Confirm,
    /// Print state
    Show,
    /// Rewrite one scene's action
    Edit {
        /// Scene to edit
        scene_id: String,
        /// New action text
        action: String,
    },
    /// Re-illustrate pages
    Redraw(RedrawTarget),
    /// Illustrate one panel
    Panel(String),
    /// Export to a directory
    Save(PathBuf),
    /// Start a new run
    Restart,
    /// Show the command list
    Help,
    /// End the session
    Quit,
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn number(rest: &str, usage: &str) -> Result<u32, String> {
    required(rest, usage)?
        .parse()
        .map_err(|_| format!("Expected a number. Usage: {usage}"))
}

impl FromStr for StudioCommand {
    type Err = String;

    /// Parses one input line. The error is a message for the user.
    ///
    /// ```
    /// use storyboard::{RedrawTarget, StudioCommand};
    ///
    /// let command: StudioCommand = "redraw 3".parse().unwrap();
    /// assert_eq!(command, StudioCommand::Redraw(RedrawTarget::Page(3)));
    /// assert!("pages many".parse::<StudioCommand>().is_err());
    /// ```
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "mode" => {
                let mode = required(rest, "mode <creative|quick>")?;
                Mode::from_str(mode)
                    .map(Self::Mode)
                    .map_err(|_| format!("Unknown mode '{mode}'. Use creative or quick."))
            }
            "pages" => number(rest, "pages <n>").map(Self::Pages),
            "panels" => number(rest, "panels <n>").map(Self::Panels),
            "idea" => required(rest, "idea <text>").map(|text| Self::Idea(text.to_string())),
            "script" => required(rest, "script <file>").map(|path| Self::Script(path.into())),
            "confirm" => Ok(Self::Confirm),
            "show" => Ok(Self::Show),
            "edit" => {
                let usage = "edit <scene-id> <action>";
                let (scene_id, action) = required(rest, usage)?
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("Usage: {usage}"))?;
                Ok(Self::Edit {
                    scene_id: scene_id.to_string(),
                    action: action.trim().to_string(),
                })
            }
            "redraw" => {
                if rest.eq_ignore_ascii_case("all") {
                    Ok(Self::Redraw(RedrawTarget::All))
                } else {
                    number(rest, "redraw <page-number|all>")
                        .map(|page| Self::Redraw(RedrawTarget::Page(page)))
                }
            }
            "panel" => required(rest, "panel <scene-id>").map(|id| Self::Panel(id.to_string())),
            "save" => required(rest, "save <dir>").map(|dir| Self::Save(dir.into())),
            "restart" => Ok(Self::Restart),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err("Type a command, or 'help' for the list.".to_string()),
            other => Err(format!("Unknown command '{other}'. Type 'help' for the list.")),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show this text and keep going
    Text(String),
    /// End the session
    Quit,
}

/// An interactive production session.
#[derive(Debug)]
pub struct StudioSession<D: StoryboardDriver + Clone + 'static> {
    studio: Orchestrator<D>,
    /// Event descriptions applied between commands and not yet shown.
    unreported: Vec<String>,
}

impl<D: StoryboardDriver + Clone + 'static> StudioSession<D> {
    /// Wraps an orchestrator.
    pub fn new(studio: Orchestrator<D>) -> Self {
        Self {
            studio,
            unreported: Vec::new(),
        }
    }

    /// The wrapped orchestrator.
    pub fn orchestrator(&self) -> &Orchestrator<D> {
        &self.studio
    }

    /// Runs one command.
    ///
    /// Illustration events that arrived since the last reply are applied
    /// first and their descriptions lead the reply text.
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns; the session stays usable
    /// and pending event descriptions carry over to the next reply.
    pub async fn execute(&mut self, command: StudioCommand) -> StoryboardResult<Reply> {
        debug!(?command, "Studio command");
        for event in self.studio.drain_events() {
            let line = self.describe_event(&event);
            self.unreported.push(line);
        }

        match self.run(command).await? {
            Reply::Text(text) => {
                let mut lines = std::mem::take(&mut self.unreported);
                lines.push(text);
                Ok(Reply::Text(lines.join("\n")))
            }
            Reply::Quit => Ok(Reply::Quit),
        }
    }

    async fn run(&mut self, command: StudioCommand) -> StoryboardResult<Reply> {
        let text = match command {
            StudioCommand::Mode(mode) => {
                self.studio.select_mode(mode)?;
                format!("Mode: {mode}")
            }
            StudioCommand::Pages(pages) => {
                let panels = self.studio.state().config().panels_per_page();
                self.studio.set_grid(pages, panels)?;
                self.grid_line()
            }
            StudioCommand::Panels(panels) => {
                let pages = self.studio.state().config().pages();
                self.studio.set_grid(pages, panels)?;
                self.grid_line()
            }
            StudioCommand::Idea(text) => {
                self.studio.submit_idea(&text).await?;
                self.after_text_stage()
            }
            StudioCommand::Script(path) => {
                let text = read_text(&path).await?;
                let state = self.studio.state();
                if *state.step() == Step::Development {
                    self.studio.edit_screenplay(&text)?;
                    "Screenplay replaced. Type 'confirm' to structure it.".to_string()
                } else if *state.step() == Step::Input && state.mode() == Mode::Creative {
                    "Screenplay files are structured in quick mode. Type 'mode quick' first, \
                     or 'idea <text>' to develop an idea."
                        .to_string()
                } else {
                    self.studio.submit_idea(&text).await?;
                    self.after_text_stage()
                }
            }
            StudioCommand::Confirm => {
                self.studio.confirm_development().await?;
                self.after_text_stage()
            }
            StudioCommand::Show => render_state(self.studio.state()),
            StudioCommand::Edit { scene_id, action } => {
                self.studio.edit_scene_action(&scene_id, &action)?;
                format!("Updated {scene_id}. Type 'redraw <page>' to illustrate the change.")
            }
            StudioCommand::Redraw(RedrawTarget::All) => {
                self.studio.illustrate_all_pages()?;
                "Queued every page.".to_string()
            }
            StudioCommand::Redraw(RedrawTarget::Page(number)) => {
                let page_id = self
                    .studio
                    .state()
                    .storyboard()
                    .as_ref()
                    .and_then(|board| board.page_by_number(number))
                    .map(|page| page.id().clone())
                    .ok_or_else(|| {
                        OrchestratorError::new(OrchestratorErrorKind::PageNotFound(format!(
                            "page {number}"
                        )))
                    })?;
                self.studio.illustrate_page(&page_id)?;
                format!("Queued page {number}.")
            }
            StudioCommand::Panel(scene_id) => {
                self.studio.illustrate_scene(&scene_id)?;
                format!("Queued panel {scene_id}.")
            }
            StudioCommand::Save(dir) => {
                let board = self
                    .studio
                    .state()
                    .storyboard()
                    .as_ref()
                    .ok_or_else(|| OrchestratorError::new(OrchestratorErrorKind::NoStoryboard))?;
                let written = write_storyboard(board, &dir).await?;
                format!("Saved {} files to {}", written.len(), dir.display())
            }
            StudioCommand::Restart => {
                self.studio.restart();
                "Started a new run.".to_string()
            }
            StudioCommand::Help => STUDIO_HELP.to_string(),
            StudioCommand::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(text))
    }

    /// Waits for the next illustration event, applies it, and describes it.
    ///
    /// Returns `None` once the worker has stopped.
    pub async fn next_event(&mut self) -> Option<String> {
        let event = self.studio.next_event().await?;
        Some(self.describe_event(&event))
    }

    /// Applies events until nothing is queued.
    pub async fn wait_idle(&mut self) -> StoryboardResult<()> {
        self.studio.wait_idle().await
    }

    /// Stops the illustration worker.
    pub async fn shutdown(self) {
        self.studio.shutdown().await;
    }

    fn grid_line(&self) -> String {
        let config = self.studio.state().config();
        format!(
            "Grid: {} pages x {} panels ({} panels)",
            config.pages(),
            config.panels_per_page(),
            config.total_panels()
        )
    }

    fn after_text_stage(&self) -> String {
        let state = self.studio.state();
        match state.step() {
            Step::Development => {
                let mut text = String::from("Screenplay developed:\n");
                if let Some(developed) = state.developed() {
                    let _ = writeln!(text, "{}", developed.screenplay.trim_end());
                }
                text.push_str("Type 'confirm' to structure it, or 'script <file>' to replace it.");
                text
            }
            Step::Storyboard => {
                let (title, pages) = state
                    .storyboard()
                    .as_ref()
                    .map(|board| (board.title().clone(), board.pages().len()))
                    .unwrap_or_default();
                let queued = self.studio.outstanding_jobs();
                if queued > 0 {
                    format!("Storyboard \"{title}\" has {pages} pages. Illustrating {queued}...")
                } else {
                    format!(
                        "Storyboard \"{title}\" has {pages} pages. Type 'redraw all' to illustrate."
                    )
                }
            }
            Step::Input => "Ready for an idea.".to_string(),
        }
    }

    fn target_label(&self, target: &IllustrationTarget) -> String {
        let board = self.studio.state().storyboard().as_ref();
        match target {
            IllustrationTarget::Page(id) => board
                .and_then(|board| board.page(id))
                .map(|page| format!("Page {}", page.page_number()))
                .unwrap_or_else(|| target.to_string()),
            IllustrationTarget::Scene(id) => format!("Panel {id}"),
        }
    }

    fn describe_event(&self, event: &IllustrationEvent) -> String {
        let label = self.target_label(event.target());
        match event {
            IllustrationEvent::Started { .. } => format!("{label}: drawing..."),
            IllustrationEvent::Finished { result: Ok(_), .. } => format!("{label}: done"),
            IllustrationEvent::Finished {
                result: Err(message),
                ..
            } => format!("{label}: failed ({message})"),
        }
    }
}

fn status(illustration: &Illustration) -> String {
    match illustration {
        Illustration::Failed(message) => format!("failed: {message}"),
        other => other.label().to_string(),
    }
}

/// Multi-line summary of the state for `show`.
pub fn render_state(state: &AppState) -> String {
    let config = state.config();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Step: {} | mode: {} | grid: {} pages x {} panels",
        state.step(),
        config.mode(),
        config.pages(),
        config.panels_per_page()
    );

    if !state.idea().is_empty() {
        let _ = writeln!(out, "Idea: {}", state.idea());
    }

    if *state.step() == Step::Development
        && let Some(developed) = state.developed()
    {
        if !developed.story.is_empty() {
            let _ = writeln!(out, "Story: {}", developed.story);
        }
        let _ = writeln!(out, "Screenplay:\n{}", developed.screenplay.trim_end());
    }

    if let Some(board) = state.storyboard() {
        let _ = writeln!(out, "Title: {}", board.title());
        for character in board.characters() {
            let _ = writeln!(
                out,
                "  {} ({}): {}",
                character.name(),
                character.id(),
                character.description()
            );
        }
        for page in board.pages() {
            let _ = writeln!(
                out,
                "Page {} [{}]",
                page.page_number(),
                status(page.illustration())
            );
            for scene in page.scenes() {
                let _ = writeln!(
                    out,
                    "  {} [{}] {}",
                    scene.id(),
                    status(scene.illustration()),
                    scene.action()
                );
            }
        }
    }

    if let Some(error) = state.last_error() {
        let _ = writeln!(out, "Last error: {error}");
    }

    out.trim_end().to_string()
}
