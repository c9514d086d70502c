//! footprint CLI entry point
//!
//! Visited-place tracking and distress notifications - CLI + web service

use footprint::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
