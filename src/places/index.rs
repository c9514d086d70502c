//! Proximity-based visit deduplication
//!
//! Classifies a new sighting against the places a user has already visited.
//! A sighting within the geofence radius of a known place counts as another
//! visit to it; anything else becomes a new place.

use crate::constants::geo::GEO_RADIUS_KM;
use crate::coord::distance::haversine_km;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::places::{PlaceKey, VisitedPlaceStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which places in range get their count incremented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every place within the radius (overlapping geofences all count)
    #[default]
    All,
    /// Only the closest place within the radius
    Nearest,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Nearest => write!(f, "nearest"),
        }
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "match_all" | "match-all" => Ok(Self::All),
            "nearest" => Ok(Self::Nearest),
            _ => Err(format!("Unknown match policy: {}", s)),
        }
    }
}

/// A place touched by an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceVisit {
    /// Key exactly as stored
    pub key: String,
    /// Visit count after the evaluation
    pub visits: u64,
}

impl PlaceVisit {
    fn new(key: impl Into<String>, visits: u64) -> Self {
        Self {
            key: key.into(),
            visits,
        }
    }
}

/// What a single evaluation did to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisitOutcome {
    /// Existing places whose counts were incremented
    Matched { places: Vec<PlaceVisit> },
    /// No place in range; a new one was registered with count 1
    Inserted { place: PlaceVisit },
}

/// Result of [`ProximityVisitIndex::evaluate`]
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub store: VisitedPlaceStore,
    pub outcome: VisitOutcome,
}

/// Geofence matcher over a user's visited places
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityVisitIndex {
    radius_km: f64,
    policy: MatchPolicy,
}

impl Default for ProximityVisitIndex {
    fn default() -> Self {
        Self {
            radius_km: GEO_RADIUS_KM,
            policy: MatchPolicy::All,
        }
    }
}

impl ProximityVisitIndex {
    /// Create an index with a custom radius and match policy
    ///
    /// The radius must be a positive, finite number of kilometers.
    pub fn new(radius_km: f64, policy: MatchPolicy) -> Result<Self> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(Error::Config(format!(
                "Geofence radius must be positive, got {}",
                radius_km
            )));
        }
        Ok(Self { radius_km, policy })
    }

    /// Geofence radius in kilometers
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Active match policy
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Classify `observed` against `store` and produce the next store state
    ///
    /// # Algorithm
    /// - Scan every stored place and measure its haversine distance to
    ///   `observed`. The scan never stops early.
    /// - With `MatchPolicy::All`, every place within the radius gets +1;
    ///   with `MatchPolicy::Nearest` only the closest one does (ties go to
    ///   the lowest key).
    /// - If nothing is in range, `observed` becomes a new place with count 1.
    ///   A stored entry already under `observed`'s exact key is incremented
    ///   instead of being reset (coordinates that never compare within range,
    ///   such as NaN, end up here).
    ///
    /// Keys that do not parse as coordinates are logged and left as-is.
    /// The output has the input's key set plus at most one new key, and no
    /// count changes by more than one.
    pub fn evaluate(&self, mut store: VisitedPlaceStore, observed: Coordinates) -> Evaluation {
        let mut in_range: Vec<(String, f64)> = Vec::new();

        for (raw, _) in store.raw_entries() {
            let key = match raw.parse::<PlaceKey>() {
                Ok(key) => key,
                Err(e) => {
                    warn!(key = raw, "Skipping malformed visited place: {}", e);
                    continue;
                }
            };

            let distance = haversine_km(observed, key.coords());
            if distance <= self.radius_km {
                debug!(key = raw, distance_km = distance, "Sighting within geofence");
                in_range.push((raw.to_string(), distance));
            }
        }

        if self.policy == MatchPolicy::Nearest {
            in_range = in_range
                .into_iter()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .into_iter()
                .collect();
        }

        let outcome = if in_range.is_empty() {
            let place = PlaceKey::from(observed);
            let key = place.to_key_string();
            match store.increment(&key) {
                Some(visits) => VisitOutcome::Matched {
                    places: vec![PlaceVisit::new(key, visits)],
                },
                None => {
                    store.insert_new(place);
                    VisitOutcome::Inserted {
                        place: PlaceVisit::new(key, 1),
                    }
                }
            }
        } else {
            let places = in_range
                .into_iter()
                .filter_map(|(raw, _)| {
                    let visits = store.increment(&raw)?;
                    Some(PlaceVisit::new(raw, visits))
                })
                .collect();
            VisitOutcome::Matched { places }
        };

        Evaluation { store, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(entries: &[(&str, u64)]) -> VisitedPlaceStore {
        entries.iter().map(|(k, c)| (k.to_string(), *c)).collect()
    }

    #[test]
    fn test_empty_store_inserts() {
        let index = ProximityVisitIndex::default();
        let result = index.evaluate(VisitedPlaceStore::new(), Coordinates::new(37.0, -122.0));

        assert_eq!(result.store, store_of(&[("37,-122", 1)]));
        assert_eq!(
            result.outcome,
            VisitOutcome::Inserted { place: PlaceVisit::new("37,-122", 1) }
        );
    }

    #[test]
    fn test_nearby_sighting_increments() {
        let index = ProximityVisitIndex::default();
        let result = index.evaluate(store_of(&[("37,-122", 1)]), Coordinates::new(37.0005, -122.0005));

        assert_eq!(result.store, store_of(&[("37,-122", 2)]));
        assert_eq!(
            result.outcome,
            VisitOutcome::Matched { places: vec![PlaceVisit::new("37,-122", 2)] }
        );
    }

    #[test]
    fn test_distant_sighting_adds_place() {
        let index = ProximityVisitIndex::default();
        let result = index.evaluate(store_of(&[("37,-122", 1)]), Coordinates::new(38.0, -122.0));

        assert_eq!(result.store, store_of(&[("37,-122", 1), ("38,-122", 1)]));
    }

    #[test]
    fn test_repeat_sighting_counts_twice() {
        let index = ProximityVisitIndex::default();
        let here = Coordinates::new(51.5074, -0.1278);

        let first = index.evaluate(VisitedPlaceStore::new(), here);
        assert_eq!(first.store.count(&here.into()), Some(1));

        let second = index.evaluate(first.store, here);
        assert_eq!(second.store.count(&here.into()), Some(2));
        assert_eq!(second.store.len(), 1);
    }

    #[test]
    fn test_overlapping_places_all_incremented() {
        // Two places ~89 m apart; the midpoint is within 100 m of both
        let store = store_of(&[("37,-122", 4), ("37.0008,-122", 1)]);
        let index = ProximityVisitIndex::default();

        let result = index.evaluate(store, Coordinates::new(37.0004, -122.0));

        assert_eq!(result.store, store_of(&[("37,-122", 5), ("37.0008,-122", 2)]));
        match result.outcome {
            VisitOutcome::Matched { places } => assert_eq!(places.len(), 2),
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_nearest_policy_increments_one() {
        let store = store_of(&[("37,-122", 4), ("37.0008,-122", 1)]);
        let index = ProximityVisitIndex::new(0.1, MatchPolicy::Nearest).unwrap();

        let result = index.evaluate(store, Coordinates::new(37.0005, -122.0));

        assert_eq!(result.store, store_of(&[("37,-122", 4), ("37.0008,-122", 2)]));
        assert_eq!(
            result.outcome,
            VisitOutcome::Matched { places: vec![PlaceVisit::new("37.0008,-122", 2)] }
        );
    }

    #[test]
    fn test_non_finite_sighting_keeps_existing_count() {
        let index = ProximityVisitIndex::default();
        let observed = Coordinates::new(f64::NAN, 0.0);

        let result = index.evaluate(store_of(&[("NaN,0", 5)]), observed);

        assert_eq!(result.store, store_of(&[("NaN,0", 6)]));
        assert_eq!(
            result.outcome,
            VisitOutcome::Matched { places: vec![PlaceVisit::new("NaN,0", 6)] }
        );
    }

    #[test]
    fn test_non_finite_sighting_inserted_once() {
        let index = ProximityVisitIndex::default();
        let observed = Coordinates::new(f64::INFINITY, 0.0);

        let first = index.evaluate(VisitedPlaceStore::new(), observed);
        let second = index.evaluate(first.store, observed);

        assert_eq!(second.store, store_of(&[("inf,0", 2)]));
    }

    #[test]
    fn test_outcome_reports_raw_keys() {
        // "37.0,-122.0" is not the canonical form of its coordinates
        let store = store_of(&[("37.0,-122.0", 3)]);
        let index = ProximityVisitIndex::default();

        let result = index.evaluate(store, Coordinates::new(37.0, -122.0));

        assert_eq!(result.store, store_of(&[("37.0,-122.0", 4)]));
        assert_eq!(
            result.outcome,
            VisitOutcome::Matched { places: vec![PlaceVisit::new("37.0,-122.0", 4)] }
        );
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let place = Coordinates::new(10.0, 10.0);
        let observed = Coordinates::new(10.0009, 10.0);
        let exact = haversine_km(observed, place);

        let index = ProximityVisitIndex::new(exact, MatchPolicy::All).unwrap();
        let result = index.evaluate(store_of(&[("10,10", 1)]), observed);

        assert_eq!(result.store, store_of(&[("10,10", 2)]));
    }

    #[test]
    fn test_malformed_key_preserved_and_skipped() {
        let store = store_of(&[("not-a-place", 7), ("37,-122", 1)]);
        let index = ProximityVisitIndex::default();

        let result = index.evaluate(store, Coordinates::new(37.0, -122.0));

        assert_eq!(result.store, store_of(&[("not-a-place", 7), ("37,-122", 2)]));
    }

    #[test]
    fn test_only_malformed_keys_inserts() {
        let index = ProximityVisitIndex::default();
        let result = index.evaluate(store_of(&[("bad", 3)]), Coordinates::new(0.0, 0.0));

        assert_eq!(result.store, store_of(&[("bad", 3), ("0,0", 1)]));
    }

    #[test]
    fn test_key_set_grows_by_at_most_one() {
        let store = store_of(&[("0,0", 1), ("1,1", 2), ("2,2", 3)]);
        let index = ProximityVisitIndex::default();

        for observed in [
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.00001, 1.0),
            Coordinates::new(45.0, 45.0),
        ] {
            let result = index.evaluate(store.clone(), observed);
            assert!(result.store.len() <= store.len() + 1);

            for (key, before) in store.raw_entries() {
                let after = result.store.count_raw(key).unwrap();
                assert!(after == before || after == before + 1);
            }
        }
    }

    #[test]
    fn test_invalid_radius() {
        assert!(ProximityVisitIndex::new(0.0, MatchPolicy::All).is_err());
        assert!(ProximityVisitIndex::new(-1.0, MatchPolicy::All).is_err());
        assert!(ProximityVisitIndex::new(f64::NAN, MatchPolicy::All).is_err());
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(MatchPolicy::default(), MatchPolicy::All);
        assert_eq!(ProximityVisitIndex::default().policy(), MatchPolicy::All);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("all".parse::<MatchPolicy>().unwrap(), MatchPolicy::All);
        assert_eq!("Nearest".parse::<MatchPolicy>().unwrap(), MatchPolicy::Nearest);
        assert!("closest".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = VisitOutcome::Inserted { place: PlaceVisit::new("37,-122", 1) };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "inserted", "place": { "key": "37,-122", "visits": 1 } })
        );
    }
}
