//! Server shared state
//!
//! Holds configuration and the two handlers, built once at start-up and
//! passed to every request.

use crate::config::Config;
use crate::error::Result;
use crate::notify::{DistressDispatcher, Messenger};
use crate::store::StoreBackend;
use crate::tracker::LocationTracker;
use std::time::Instant;

/// Shared state for the HTTP server
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Location update handler
    pub tracker: LocationTracker<StoreBackend>,

    /// Distress notification handler
    pub dispatcher: DistressDispatcher<Messenger>,

    started: Instant,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Result<Self> {
        let store = StoreBackend::from_config(&config.store)?;
        let messenger = Messenger::from_config(&config.notifications)?;
        Self::with_parts(config, store, messenger)
    }

    /// Create application state with explicit collaborators
    pub fn with_parts(config: Config, store: StoreBackend, messenger: Messenger) -> Result<Self> {
        let tracker = LocationTracker::new(store, config.visit_index()?);
        let dispatcher = DistressDispatcher::new(messenger, config.notifications.topic.clone());
        Ok(Self {
            config,
            tracker,
            dispatcher,
            started: Instant::now(),
        })
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
