//! pangolin-pilot: A terminal setup wizard for a self-hosted media stack

use clap::Parser;
use color_eyre::Result;
use pangolin_api::SetupClient;
use pangolin_pilot_tui::App;
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// pangolin-pilot: Terminal setup wizard for the Pangolin media stack
#[derive(Parser, Debug)]
#[command(name = "pangolin-pilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the setup daemon
    #[arg(short, long, default_value = "http://127.0.0.1:8484")]
    backend_url: String,

    /// Directory for the locally saved configuration copy
    /// (default: <config_dir>/pangolin-pilot)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log file path (default: <temp_dir>/pangolin-pilot.log)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging to file (not stdout, which would corrupt TUI)
    let log_path = resolve_log_path(cli.log_file);
    let log_file = File::create(&log_path)?;

    // Build filter: set base level, but quiet down noisy HTTP libraries
    let filter = if cli.debug {
        EnvFilter::from_default_env()
            .add_directive(Level::DEBUG.into())
            .add_directive("hyper=info".parse().unwrap())
            .add_directive("hyper_util=info".parse().unwrap())
            .add_directive("reqwest=info".parse().unwrap())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(true)
                .with_target(false),
        )
        .with(filter)
        .init();

    tracing::info!("Starting pangolin-pilot");
    tracing::info!("Setup daemon: {}", cli.backend_url);

    let client = SetupClient::new(cli.backend_url)?;

    // Run the TUI
    let mut app = App::new(client, cli.config_dir);
    app.run().await?;

    tracing::info!("Goodbye!");
    Ok(())
}

/// Resolve the log file path, falling back to the platform temp directory.
fn resolve_log_path(log_file: Option<String>) -> PathBuf {
    match log_file {
        Some(path) => PathBuf::from(path),
        None => std::env::temp_dir().join("pangolin-pilot.log"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_path_uses_temp_dir() {
        let path = resolve_log_path(None);
        let expected = std::env::temp_dir().join("pangolin-pilot.log");
        assert_eq!(path, expected);
    }

    #[test]
    fn default_log_path_parent_exists() {
        let path = resolve_log_path(None);
        assert!(
            path.parent().unwrap().exists(),
            "default log path parent directory does not exist: {}",
            path.display()
        );
    }

    #[test]
    fn explicit_log_path_is_used() {
        let custom = "/some/custom/path.log".to_string();
        let path = resolve_log_path(Some(custom.clone()));
        assert_eq!(path, PathBuf::from(custom));
    }
}
