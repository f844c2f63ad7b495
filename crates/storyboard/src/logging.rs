//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging.
///
/// `RUST_LOG` takes precedence. Without it, `verbose` selects
/// `debug` for the storyboard crates and `info` otherwise. Log lines go to
/// stderr so JSON written to stdout stays clean.
///
/// # Arguments
///
/// * `verbose` - Lower the default level to debug
/// * `json` - Emit one JSON object per event instead of human-readable lines
pub fn init_tracing(verbose: bool, json: bool) {
    let default_directives = if verbose {
        "info,storyboard=debug,storyboard_pipeline=debug,storyboard_orchestrator=debug,storyboard_models=debug"
    } else {
        "info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
