//! Storyboard CLI binary.
//!
//! This binary provides command-line access to the storyboard pipeline:
//! - Develop an idea or structure a screenplay and print the result as JSON
//! - Run a whole production and save the pages as images
//! - Re-render a page of a saved storyboard
//! - Drive a production interactively in the studio

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, CreateSource, create, develop, illustrate, resolve_grid, run_studio,
        structure,
    };
    use storyboard::{StoryboardConfig, init_tracing};

    // Load GEMINI_API_KEY and friends from .env if present
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = StoryboardConfig::load_with(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Develop { idea, panels } => {
            develop(&config, &idea, panels).await?;
        }

        Commands::Structure {
            screenplay,
            pages,
            panels,
        } => {
            structure(&config, &screenplay, pages, panels).await?;
        }

        Commands::Create {
            idea,
            script,
            pages,
            panels,
            mode,
            out,
        } => {
            let grid = resolve_grid(&config, pages, panels, mode)?;
            let source = match (idea, script) {
                (_, Some(path)) => CreateSource::Script(path),
                (Some(idea), None) => CreateSource::Idea(idea),
                (None, None) => return Err("either --idea or --script is required".into()),
            };
            create(&config, source, grid, &out).await?;
        }

        Commands::Illustrate {
            storyboard,
            page,
            out,
        } => {
            illustrate(&config, &storyboard, page, out.as_deref()).await?;
        }

        Commands::Studio => {
            run_studio(&config).await?;
        }
    }

    Ok(())
}
