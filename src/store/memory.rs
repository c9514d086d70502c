//! In-memory store
//!
//! Keeps every user's places in a map for the lifetime of the process.
//! Useful for tests and single-process deployments that can lose state.

use crate::error::Result;
use crate::places::VisitedPlaceStore;
use crate::store::{check_user_id, PlaceStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory place store
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, VisitedPlaceStore>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaceStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, user_id: &str) -> Result<VisitedPlaceStore> {
        check_user_id(user_id)?;
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned().unwrap_or_default())
    }

    async fn write(&self, user_id: &str, places: &VisitedPlaceStore) -> Result<()> {
        check_user_id(user_id)?;
        let mut users = self.users.write().await;
        users.insert(user_id.to_string(), places.clone());
        Ok(())
    }
}
