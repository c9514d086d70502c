//! Location update handling
//!
//! Runs one read-modify-write cycle over a user's visited places for every
//! location report. The store is injected; the tracker holds no global handle.

use crate::coord::Coordinates;
use crate::error::Result;
use crate::places::{ProximityVisitIndex, VisitOutcome, VisitedPlaceStore};
use crate::store::PlaceStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Applies location reports to a place store
#[derive(Debug)]
pub struct LocationTracker<S> {
    store: S,
    index: ProximityVisitIndex,
    // One lock per user; cycles for the same user run one at a time
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: PlaceStore> LocationTracker<S> {
    /// Create a tracker over `store` using `index` for matching
    pub fn new(store: S, index: ProximityVisitIndex) -> Self {
        Self {
            store,
            index,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the update lock of one user
    ///
    /// Locks nobody else holds or waits on are dropped from the table, so it
    /// only grows with the number of users updating concurrently.
    async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The matching index
    pub fn index(&self) -> &ProximityVisitIndex {
        &self.index
    }

    /// Handle a change of a user's location record
    ///
    /// An absent location (the record was cleared) is a no-op and returns
    /// `Ok(None)` without touching the store. Out-of-range coordinates are
    /// rejected before the store is read.
    pub async fn handle_location_update(
        &self,
        user_id: &str,
        location: Option<Coordinates>,
    ) -> Result<Option<VisitOutcome>> {
        let Some(observed) = location else {
            debug!(user_id, "Location cleared, nothing to do");
            return Ok(None);
        };

        observed.validate()?;

        let _guard = self.lock_user(user_id).await;

        let places = self.store.read(user_id).await?;
        let evaluation = self.index.evaluate(places, observed);
        self.store.write(user_id, &evaluation.store).await?;

        match &evaluation.outcome {
            VisitOutcome::Matched { places } => info!(
                user_id,
                matched = places.len(),
                "Visit recorded at ({}, {})",
                observed.lat,
                observed.lng
            ),
            VisitOutcome::Inserted { place } => {
                info!(user_id, place = %place.key, "New place registered")
            }
        }

        Ok(Some(evaluation.outcome))
    }

    /// All visited places of a user
    pub async fn visited_places(&self, user_id: &str) -> Result<VisitedPlaceStore> {
        self.store.read(user_id).await
    }
}
