//! Track command handler
//!
//! Applies one location report to a user's visited places, the same way the
//! server does for `PUT /api/users/:user_id/location`.

use crate::cli::init_logging;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::VisitOutcome;
use crate::store::{PlaceStore, StoreBackend};
use crate::tracker::LocationTracker;
use clap::Args;

/// Track command arguments
#[derive(Args)]
pub struct TrackArgs {
    /// User ID
    #[arg(long, short = 'u')]
    pub user: String,

    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

/// Run the track command
pub async fn run(args: TrackArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let store = StoreBackend::from_config(&config.store)?;
    check_persistent(&store)?;
    let tracker = LocationTracker::new(store, config.visit_index()?);

    let observed = Coordinates::new(args.lat, args.lng);
    let outcome = tracker.handle_location_update(&args.user, Some(observed)).await?;

    for line in outcome.iter().flat_map(describe) {
        println!("{}", line);
    }

    Ok(())
}

/// A one-shot command against the memory store would lose its update on exit
pub(crate) fn check_persistent(store: &StoreBackend) -> Result<()> {
    match store {
        StoreBackend::Memory(_) => Err(Error::Config(format!(
            "store.backend = \"{}\" does not persist between runs; use \"file\" or the server",
            store.name()
        ))),
        _ => Ok(()),
    }
}

fn describe(outcome: &VisitOutcome) -> Vec<String> {
    match outcome {
        VisitOutcome::Inserted { place } => vec![format!("New place: {}", place.key)],
        VisitOutcome::Matched { places } => places
            .iter()
            .map(|place| format!("Visited {} ({} visits)", place.key, place.visits))
            .collect(),
    }
}
