//! Visited-place storage backends
//!
//! This module defines the `PlaceStore` trait: a per-user document store that
//! is read and written in full once per location event. Each backend is a
//! single file implementing the trait.

pub mod file;
pub mod memory;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::places::VisitedPlaceStore;
use std::future::Future;

/// Trait for visited-place storage backends
///
/// Implementations must be thread-safe (Send + Sync) to work with async server.
pub trait PlaceStore: Send + Sync {
    /// Returns the backend name (e.g., "memory", "file")
    fn name(&self) -> &'static str;

    /// Read all visited places of a user
    ///
    /// A user with no stored places yields an empty store.
    fn read(&self, user_id: &str) -> impl Future<Output = Result<VisitedPlaceStore>> + Send;

    /// Replace all visited places of a user
    fn write(
        &self,
        user_id: &str,
        places: &VisitedPlaceStore,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Store backend selected by configuration
#[derive(Debug)]
pub enum StoreBackend {
    Memory(memory::MemoryStore),
    File(file::FileStore),
}

impl StoreBackend {
    /// Build the backend named in the `[store]` config section
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.backend.as_str() {
            "memory" => Ok(Self::Memory(memory::MemoryStore::new())),
            "file" => {
                let store = match &config.data_dir {
                    Some(dir) => file::FileStore::new(dir.clone()),
                    None => file::FileStore::in_data_dir()?,
                };
                Ok(Self::File(store))
            }
            other => Err(Error::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

impl PlaceStore for StoreBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Memory(s) => s.name(),
            Self::File(s) => s.name(),
        }
    }

    async fn read(&self, user_id: &str) -> Result<VisitedPlaceStore> {
        match self {
            Self::Memory(s) => s.read(user_id).await,
            Self::File(s) => s.read(user_id).await,
        }
    }

    async fn write(&self, user_id: &str, places: &VisitedPlaceStore) -> Result<()> {
        match self {
            Self::Memory(s) => s.write(user_id, places).await,
            Self::File(s) => s.write(user_id, places).await,
        }
    }
}

/// List all available backends
pub fn available_backends() -> Vec<&'static str> {
    vec!["memory", "file"]
}

/// Reject user IDs that cannot address a document
pub(crate) fn check_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::Store("User ID must not be empty".to_string()));
    }
    Ok(())
}
