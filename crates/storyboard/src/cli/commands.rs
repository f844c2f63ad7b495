//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyboard::Mode;

/// Storyboard - turn a story idea into an illustrated storyboard
#[derive(Parser, Debug)]
#[command(name = "storyboard")]
#[command(about = "Turn a story idea into an illustrated, page-by-page storyboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Develop an idea into a story and screenplay (printed as JSON)
    Develop {
        /// Seed idea
        #[arg(long)]
        idea: String,

        /// Number of beats to write (defaults to pages x panels from config)
        #[arg(long)]
        panels: Option<u32>,
    },

    /// Structure a screenplay into pages of panels (printed as JSON)
    Structure {
        /// Screenplay text file
        #[arg(long)]
        screenplay: PathBuf,

        /// Page count
        #[arg(long)]
        pages: Option<u32>,

        /// Panels per page
        #[arg(long)]
        panels: Option<u32>,
    },

    /// Run a full production and save the result
    Create {
        /// Seed idea
        #[arg(long, conflicts_with = "script", required_unless_present = "script")]
        idea: Option<String>,

        /// Finished screenplay file (implies quick mode)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Page count
        #[arg(long)]
        pages: Option<u32>,

        /// Panels per page
        #[arg(long)]
        panels: Option<u32>,

        /// creative or quick
        #[arg(long)]
        mode: Option<Mode>,

        /// Output directory
        #[arg(long, default_value = "storyboard-out")]
        out: PathBuf,
    },

    /// Re-render one page of a saved storyboard
    Illustrate {
        /// Saved storyboard (JSON file or export directory)
        #[arg(long)]
        storyboard: PathBuf,

        /// Page number to render
        #[arg(long)]
        page: u32,

        /// Output directory (defaults to the storyboard's directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Interactive production session
    Studio,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_requires_idea_or_script() {
        assert!(Cli::try_parse_from(["storyboard", "create"]).is_err());
        assert!(
            Cli::try_parse_from(["storyboard", "create", "--idea", "x", "--script", "s.txt"])
                .is_err()
        );

        let cli = Cli::try_parse_from([
            "storyboard",
            "create",
            "--idea",
            "A lighthouse keeper finds a bottle",
            "--mode",
            "quick",
            "--pages",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                idea, mode, pages, ..
            } => {
                assert_eq!(idea.as_deref(), Some("A lighthouse keeper finds a bottle"));
                assert_eq!(mode, Some(Mode::Quick));
                assert_eq!(pages, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["storyboard", "studio", "--verbose", "--config", "my.toml"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }
}
