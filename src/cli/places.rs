//! Places command handler
//!
//! Lists a user's visited places, most visited first.

use crate::cli::track::check_persistent;
use crate::config::Config;
use crate::error::Result;
use crate::store::{PlaceStore, StoreBackend};
use clap::Args;

/// Places command arguments
#[derive(Args)]
pub struct PlacesArgs {
    /// User ID
    #[arg(long, short = 'u')]
    pub user: String,

    /// Print the raw JSON document instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run the places command
pub async fn run(args: PlacesArgs) -> Result<()> {
    let config = Config::load()?;
    let store = StoreBackend::from_config(&config.store)?;
    check_persistent(&store)?;
    let places = store.read(&args.user).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&places)?);
        return Ok(());
    }

    if places.is_empty() {
        println!("No visited places for {}.", args.user);
        return Ok(());
    }

    let mut entries: Vec<(&str, u64)> = places.raw_entries().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("Visited places for {} ({}):\n", args.user, entries.len());
    for (key, count) in entries {
        println!("  {:>6}  {}", count, key);
    }

    Ok(())
}
