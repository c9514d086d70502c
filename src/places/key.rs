//! Place identity
//!
//! A place is identified by the coordinate at which it was first seen. The
//! database stores it as a `"lat,lng"` string; `PlaceKey` is the typed form.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Composite key of a visited place (its originating coordinate)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PlaceKey {
    pub lat: f64,
    pub lng: f64,
}

impl PlaceKey {
    /// Create a key from raw latitude/longitude
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Originating coordinate of the place
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Serialize to the stored string form
    ///
    /// Uses shortest round-trip float formatting, so `37.0` becomes `"37"`
    /// and parsing the result yields the same bits back.
    pub fn to_key_string(&self) -> String {
        self.to_string()
    }
}

impl From<Coordinates> for PlaceKey {
    fn from(coords: Coordinates) -> Self {
        Self::new(coords.lat, coords.lng)
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<PlaceKey> for String {
    fn from(key: PlaceKey) -> Self {
        key.to_key_string()
    }
}

impl TryFrom<String> for PlaceKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for PlaceKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| Error::MalformedPlaceKey(format!("missing ',' in {:?}", s)))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::MalformedPlaceKey(format!("invalid latitude in {:?}", s)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::MalformedPlaceKey(format!("invalid longitude in {:?}", s)))?;

        if !lat.is_finite() || !lng.is_finite() {
            return Err(Error::MalformedPlaceKey(format!(
                "non-finite coordinate in {:?}",
                s
            )));
        }

        Ok(Self { lat, lng })
    }
}
