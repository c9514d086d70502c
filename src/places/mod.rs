//! Visited places and the proximity index that deduplicates them
//!
//! This module handles:
//! - Place identity (`PlaceKey`) and its `"lat,lng"` string form
//! - The per-user visited-place store, in the database's JSON layout
//! - Classifying a new sighting against known places

pub mod index;
pub mod key;

pub use index::{Evaluation, MatchPolicy, PlaceVisit, ProximityVisitIndex, VisitOutcome};
pub use key::PlaceKey;

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A place with its visit count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisitedPlace {
    pub key: PlaceKey,
    pub count: u64,
}

/// All visited places of one user
///
/// Serializes as a flat JSON object of `"lat,lng": count`, the same shape the
/// database stores under `visitedPlaces`. Keys are kept as raw strings so a
/// malformed entry written by another client survives a read-modify-write
/// cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitedPlaceStore {
    places: BTreeMap<String, u64>,
}

impl VisitedPlaceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored places (including malformed entries)
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Visit count for a place, if known
    pub fn count(&self, key: &PlaceKey) -> Option<u64> {
        self.places.get(&key.to_key_string()).copied()
    }

    /// Visit count by raw stored key
    pub fn count_raw(&self, key: &str) -> Option<u64> {
        self.places.get(key).copied()
    }

    /// Register a newly seen place with a count of 1
    ///
    /// An existing entry under the same key is left untouched. Returns
    /// whether the place was added.
    pub fn insert_new(&mut self, key: PlaceKey) -> bool {
        match self.places.entry(key.to_key_string()) {
            Entry::Vacant(slot) => {
                slot.insert(1);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Increment the visit count of a stored place
    ///
    /// Returns the new count, or `None` if the place is unknown.
    pub fn increment(&mut self, raw_key: &str) -> Option<u64> {
        let count = self.places.get_mut(raw_key)?;
        *count = count.saturating_add(1);
        Some(*count)
    }

    /// Iterate raw `(key, count)` entries in key order
    pub fn raw_entries(&self) -> impl Iterator<Item = (&str, u64)> {
        self.places.iter().map(|(k, &c)| (k.as_str(), c))
    }

    /// Iterate well-formed places, skipping keys that do not parse
    pub fn places(&self) -> impl Iterator<Item = VisitedPlace> + '_ {
        self.places.iter().filter_map(|(raw, &count)| {
            raw.parse::<PlaceKey>()
                .ok()
                .map(|key| VisitedPlace { key, count })
        })
    }
}

impl FromIterator<(String, u64)> for VisitedPlaceStore {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            places: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let mut store = VisitedPlaceStore::new();
        store.insert_new(PlaceKey::new(37.0, -122.0));
        assert_eq!(store.increment("37,-122"), Some(2));

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json, serde_json::json!({ "37,-122": 2 }));
    }

    #[test]
    fn test_deserialize_from_database_shape() {
        let store: VisitedPlaceStore =
            serde_json::from_str(r#"{"37,-122": 3, "38.5,-121.25": 1}"#).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.count(&PlaceKey::new(37.0, -122.0)), Some(3));
        assert_eq!(store.count(&PlaceKey::new(38.5, -121.25)), Some(1));
    }

    #[test]
    fn test_increment_unknown() {
        let mut store = VisitedPlaceStore::new();
        assert_eq!(store.increment("1,2"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_new_keeps_existing_count() {
        let mut store: VisitedPlaceStore = [("37,-122".to_string(), 9)].into_iter().collect();

        assert!(!store.insert_new(PlaceKey::new(37.0, -122.0)));
        assert_eq!(store.count_raw("37,-122"), Some(9));

        assert!(store.insert_new(PlaceKey::new(1.0, 2.0)));
        assert_eq!(store.count_raw("1,2"), Some(1));
    }

    #[test]
    fn test_places_skips_malformed() {
        let store: VisitedPlaceStore = [
            ("37,-122".to_string(), 2),
            ("garbage".to_string(), 5),
        ]
        .into_iter()
        .collect();

        let places: Vec<_> = store.places().collect();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].key, PlaceKey::new(37.0, -122.0));
        assert_eq!(places[0].count, 2);
        assert_eq!(store.len(), 2);
    }
}
