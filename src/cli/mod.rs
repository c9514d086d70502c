//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod notify;
pub mod places;
pub mod serve;
pub mod track;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Visited-place tracking and distress notifications
#[derive(Parser)]
#[command(name = "footprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Record a location report for a user
    Track(track::TrackArgs),

    /// List a user's visited places
    Places(places::PlacesArgs),

    /// Send a distress notification
    Notify(notify::NotifyArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Track(args) => track::run(args).await,
        Commands::Places(args) => places::run(args).await,
        Commands::Notify(args) => notify::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging; `RUST_LOG` overrides `default_level`
pub(crate) fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
