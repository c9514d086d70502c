//! Centralized constants for the footprint crate
//!
//! Values shared by several modules live here so they stay consistent.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Geofence radius in kilometers: two sightings closer than this are the same place
    pub const GEO_RADIUS_KM: f64 = 0.1;
}

/// External API endpoints
pub mod api {
    /// Firebase Cloud Messaging HTTP v1 API root
    pub const FCM_API_URL: &str = "https://fcm.googleapis.com/v1";
}

/// Notification settings
pub mod notify {
    /// Topic that relatives subscribe to for distress alerts
    pub const EMERGENCY_TOPIC: &str = "emergency_alerts";

    /// Title used when a message is pushed straight to one device
    pub const DEVICE_ALERT_TITLE: &str = "Emergency Alert";
}
