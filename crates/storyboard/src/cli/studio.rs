//! Interactive studio command handler.

use std::io::Write;
use storyboard::{
    Orchestrator, Reply, StoryboardConfig, StoryboardResult, StudioCommand, StudioSession,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::generate::build_client;

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Run an interactive session on stdin/stdout until `quit` or end of input.
///
/// Illustration progress is printed as it arrives, between commands.
pub async fn run_studio(config: &StoryboardConfig) -> StoryboardResult<()> {
    let studio = Orchestrator::new(
        build_client(config)?,
        config.pipeline_settings()?,
        config.studio_settings(),
        config.production_config()?,
    );
    let mut session = StudioSession::new(studio);
    info!("Studio session started");

    println!("Storyboard studio. Type 'help' for commands.");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        break;
                    }
                };

                if !line.trim().is_empty() {
                    match line.parse::<StudioCommand>() {
                        Ok(command) => match session.execute(command).await {
                            Ok(Reply::Text(text)) => println!("{text}"),
                            Ok(Reply::Quit) => break,
                            Err(e) => println!("Error: {}", e.user_message()),
                        },
                        Err(message) => println!("{message}"),
                    }
                }
                prompt();
            }
            Some(update) = session.next_event() => {
                println!("\n{update}");
                prompt();
            }
        }
    }

    info!("Studio session ended");
    session.shutdown().await;
    Ok(())
}
