//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/footprint/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::places::{MatchPolicy, ProximityVisitIndex};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Place matching settings
    #[serde(default)]
    pub geofence: GeofenceConfig,

    /// Visited-place storage
    #[serde(default)]
    pub store: StoreConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Push notification settings
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Place matching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    /// Radius in kilometers within which two sightings are the same place
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Which places in range get counted: "all" or "nearest"
    #[serde(default = "default_match_policy")]
    pub match_policy: String,
}

/// Visited-place storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend name: "file" or "memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Directory for the file backend (defaults to the XDG data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Push notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Backend name: "fcm", or "log" for a dry run that sends nothing
    #[serde(default = "default_notify_backend")]
    pub backend: String,

    /// Topic distress alerts are broadcast to
    #[serde(default = "default_topic")]
    pub topic: String,

    /// FCM HTTP v1 API root
    #[serde(default = "default_fcm_url")]
    pub fcm_url: String,

    /// Firebase project ID
    #[serde(default)]
    pub project_id: String,

    /// OAuth2 access token with the `firebase.messaging` scope
    #[serde(default)]
    pub access_token: String,
}

// Default value functions for serde
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_match_policy() -> String {
    DEFAULT_MATCH_POLICY.to_string()
}
fn default_store_backend() -> String {
    DEFAULT_STORE_BACKEND.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_notify_backend() -> String {
    DEFAULT_NOTIFY_BACKEND.to_string()
}
fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}
fn default_fcm_url() -> String {
    DEFAULT_FCM_URL.to_string()
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            radius_km: default_radius_km(),
            match_policy: default_match_policy(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            data_dir: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            backend: default_notify_backend(),
            topic: default_topic(),
            fcm_url: default_fcm_url(),
            project_id: String::new(),
            access_token: String::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geofence", "radius_km"] => Some(self.geofence.radius_km.to_string()),
            ["geofence", "match_policy"] => Some(self.geofence.match_policy.clone()),

            ["store", "backend"] => Some(self.store.backend.clone()),
            ["store", "data_dir"] => Some(
                self.store
                    .data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["notifications", "backend"] => Some(self.notifications.backend.clone()),
            ["notifications", "topic"] => Some(self.notifications.topic.clone()),
            ["notifications", "fcm_url"] => Some(self.notifications.fcm_url.clone()),
            ["notifications", "project_id"] => Some(self.notifications.project_id.clone()),
            ["notifications", "access_token"] => Some(self.notifications.access_token.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geofence", "radius_km"] => {
                let radius: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid radius value: {}", value))
                })?;
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(Error::Config(format!("Radius must be positive: {}", value)));
                }
                self.geofence.radius_km = radius;
            }
            ["geofence", "match_policy"] => {
                let policy: MatchPolicy = value.parse().map_err(Error::Config)?;
                self.geofence.match_policy = policy.to_string();
            }

            ["store", "backend"] => {
                if !crate::store::available_backends().contains(&value) {
                    return Err(Error::Config(format!("Unknown store backend: {}", value)));
                }
                self.store.backend = value.to_string();
            }
            ["store", "data_dir"] => {
                self.store.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["notifications", "backend"] => {
                if !crate::notify::available_messengers().contains(&value) {
                    return Err(Error::Config(format!("Unknown notification backend: {}", value)));
                }
                self.notifications.backend = value.to_string();
            }
            ["notifications", "topic"] => {
                self.notifications.topic = value.to_string();
            }
            ["notifications", "fcm_url"] => {
                self.notifications.fcm_url = value.to_string();
            }
            ["notifications", "project_id"] => {
                self.notifications.project_id = value.to_string();
            }
            ["notifications", "access_token"] => {
                self.notifications.access_token = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geofence.radius_km",
            "geofence.match_policy",
            "store.backend",
            "store.data_dir",
            "server.host",
            "server.port",
            "notifications.backend",
            "notifications.topic",
            "notifications.fcm_url",
            "notifications.project_id",
            "notifications.access_token",
        ]
    }

    /// Build the place matcher described by the `[geofence]` section
    pub fn visit_index(&self) -> Result<ProximityVisitIndex> {
        let policy: MatchPolicy = self.geofence.match_policy.parse().map_err(Error::Config)?;
        ProximityVisitIndex::new(self.geofence.radius_km, policy)
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.geofence.radius_km, 0.1);
        assert_eq!(config.geofence.match_policy, "all");
        assert_eq!(config.store.backend, "file");
        assert_eq!(config.notifications.backend, "fcm");
        assert_eq!(config.notifications.topic, "emergency_alerts");
        assert_eq!(config.notifications.fcm_url, "https://fcm.googleapis.com/v1");
        assert!(config.notifications.access_token.is_empty());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("store.backend"), Some("file".to_string()));

        config.set("store.backend", "memory").unwrap();
        assert_eq!(config.get("store.backend"), Some("memory".to_string()));

        config.set("geofence.radius_km", "0.25").unwrap();
        assert_eq!(config.geofence.radius_km, 0.25);

        config.set("geofence.match_policy", "Nearest").unwrap();
        assert_eq!(config.get("geofence.match_policy"), Some("nearest".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("geofence.radius_km", "not_a_number").is_err());
        assert!(config.set("geofence.radius_km", "-1").is_err());
        assert!(config.set("geofence.match_policy", "closest").is_err());
        assert!(config.set("store.backend", "postgres").is_err());
        assert!(config.set("server.port", "70000").is_err());
        assert!(config.set("notifications.backend", "apns").is_err());
    }

    #[test]
    fn test_notification_keys() {
        let mut config = Config::default();

        config.set("notifications.backend", "log").unwrap();
        config.set("notifications.project_id", "safety-app").unwrap();
        config.set("notifications.access_token", "ya29.token").unwrap();

        assert_eq!(config.get("notifications.backend"), Some("log".to_string()));
        assert_eq!(config.notifications.project_id, "safety-app");
        assert_eq!(config.notifications.access_token, "ya29.token");
    }

    #[test]
    fn test_data_dir() {
        let mut config = Config::default();
        assert_eq!(config.get("store.data_dir"), Some(String::new()));

        config.set("store.data_dir", "/tmp/places").unwrap();
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/tmp/places")));

        config.set("store.data_dir", "").unwrap();
        assert_eq!(config.store.data_dir, None);
    }

    #[test]
    fn test_visit_index() {
        let mut config = Config::default();
        let index = config.visit_index().unwrap();
        assert_eq!(index.radius_km(), 0.1);
        assert_eq!(index.policy(), MatchPolicy::All);

        config.geofence.match_policy = "bogus".to_string();
        assert!(config.visit_index().is_err());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.store.backend = "memory".to_string();
            config.geofence.radius_km = 0.5;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.store.backend, "memory");
            assert_eq!(loaded.geofence.radius_km, 0.5);
        });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.geofence.radius_km, 0.1);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[geofence]"));
        assert!(toml.contains("[store]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[notifications]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        for key in &keys {
            assert!(Config::default().get(key).is_some(), "{} should be readable", key);
        }
    }
}
