//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, geo, notify};

/// Default geofence radius in kilometers
pub const DEFAULT_RADIUS_KM: f64 = geo::GEO_RADIUS_KM;

/// Default match policy
pub const DEFAULT_MATCH_POLICY: &str = "all";

/// Default store backend
pub const DEFAULT_STORE_BACKEND: &str = "file";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default notification topic
pub const DEFAULT_TOPIC: &str = notify::EMERGENCY_TOPIC;

/// Default notification backend
pub const DEFAULT_NOTIFY_BACKEND: &str = "fcm";

/// Default FCM API root
pub const DEFAULT_FCM_URL: &str = api::FCM_API_URL;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "footprint";

/// Subdirectory of the data dir holding per-user documents
pub const USERS_DIR_NAME: &str = "users";
