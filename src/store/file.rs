//! File-backed store
//!
//! One JSON document per user, stored in the XDG data directory
//! (~/.local/share/footprint/users/).

use crate::config::defaults::{APP_DIR_NAME, USERS_DIR_NAME};
use crate::error::{Error, Result};
use crate::places::VisitedPlaceStore;
use crate::store::{check_user_id, PlaceStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// A user's document on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(default)]
    visited_places: VisitedPlaceStore,
    updated_at: DateTime<Utc>,
}

/// File-backed place store
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a specific directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create a store in the default data directory
    pub fn in_data_dir() -> Result<Self> {
        let dir = dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME).join(USERS_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
        Ok(Self::new(dir))
    }

    /// Directory holding the user documents
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path of a user's document
    ///
    /// The user ID is percent-encoded so it cannot escape the store directory.
    pub fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(user_id)))
    }
}

impl PlaceStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, user_id: &str) -> Result<VisitedPlaceStore> {
        check_user_id(user_id)?;
        let path = self.user_path(user_id);

        if !fs::try_exists(&path).await? {
            return Ok(VisitedPlaceStore::new());
        }

        let content = fs::read_to_string(&path).await.map_err(|e| {
            Error::Store(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let document: UserDocument = serde_json::from_str(&content).map_err(|e| {
            Error::Store(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(document.visited_places)
    }

    async fn write(&self, user_id: &str, places: &VisitedPlaceStore) -> Result<()> {
        check_user_id(user_id)?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Store(format!("Failed to create store directory: {}", e))
        })?;

        let document = UserDocument {
            visited_places: places.clone(),
            updated_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        // Write beside the target and rename over it, so readers never see a
        // partially written document
        let path = self.user_path(user_id);
        let tmp_path = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp_path, content).await.map_err(|e| {
            Error::Store(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(Error::Store(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("users"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_user_is_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.read("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (store, _temp) = create_test_store();
        let places: VisitedPlaceStore =
            [("37,-122".to_string(), 2), ("38,-122".to_string(), 1)].into_iter().collect();

        store.write("alice", &places).await.unwrap();

        assert_eq!(store.read("alice").await.unwrap(), places);
    }

    #[tokio::test]
    async fn test_document_layout() {
        let (store, _temp) = create_test_store();
        let places: VisitedPlaceStore = [("37,-122".to_string(), 2)].into_iter().collect();

        store.write("alice", &places).await.unwrap();

        let content = std::fs::read_to_string(store.user_path("alice")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["visitedPlaces"], serde_json::json!({ "37,-122": 2 }));
        assert!(json["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let (store, _temp) = create_test_store();
        let first: VisitedPlaceStore = [("37,-122".to_string(), 1)].into_iter().collect();
        let second: VisitedPlaceStore =
            [("37,-122".to_string(), 2), ("38,-122".to_string(), 1)].into_iter().collect();

        store.write("alice", &first).await.unwrap();
        store.write("alice", &second).await.unwrap();

        assert_eq!(store.read("alice").await.unwrap(), second);

        let names: Vec<String> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alice.json".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_document() {
        let (store, _temp) = create_test_store();
        let places: VisitedPlaceStore = [("37,-122".to_string(), 3)].into_iter().collect();
        store.write("alice", &places).await.unwrap();

        // A directory in the target's place makes the final rename fail
        std::fs::create_dir_all(store.user_path("bob")).unwrap();
        let result = store.write("bob", &places).await;
        assert!(matches!(result, Err(Error::Store(_))));

        assert_eq!(store.read("alice").await.unwrap(), places);
        let leftovers = std::fs::read_dir(store.dir())
            .unwrap()
            .filter(|entry| {
                entry.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp")
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let (store, _temp) = create_test_store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.user_path("alice"), "{not json").unwrap();

        let result = store.read("alice").await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_user_path_is_encoded() {
        let store = FileStore::new(PathBuf::from("/data"));
        let path = store.user_path("../etc/passwd");

        assert_eq!(path.parent(), Some(std::path::Path::new("/data")));
        assert_eq!(path.file_name().unwrap(), "..%2Fetc%2Fpasswd.json");
    }
}
