//! footprint: visited-place tracking and distress notifications
//!
//! A library, CLI and HTTP service backing a personal-safety app.
//!
//! ## Features
//!
//! - Geofenced visit counting: each location report either counts as another
//!   visit to a known place (within 100 m) or registers a new place
//! - Pluggable per-user place storage (file, memory)
//! - Distress alerts pushed to an FCM topic or a single device
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use footprint::coord::Coordinates;
//! use footprint::places::{ProximityVisitIndex, VisitedPlaceStore};
//!
//! let index = ProximityVisitIndex::default();
//!
//! let first = index.evaluate(VisitedPlaceStore::new(), Coordinates::new(37.0, -122.0));
//! assert_eq!(first.store.count_raw("37,-122"), Some(1));
//!
//! // ~70 m away: same place
//! let second = index.evaluate(first.store, Coordinates::new(37.0005, -122.0005));
//! assert_eq!(second.store.count_raw("37,-122"), Some(2));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod notify;
pub mod places;
pub mod server;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use places::{PlaceKey, ProximityVisitIndex, VisitOutcome, VisitedPlaceStore};
pub use tracker::LocationTracker;
