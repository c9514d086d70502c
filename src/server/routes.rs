//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::Coordinates;
use crate::error::Error;
use crate::notify::{NotificationRequest, NotificationResponse, PushMessenger};
use crate::places::{VisitOutcome, VisitedPlaceStore};
use crate::server::state::AppState;
use crate::store::PlaceStore;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/users/:user_id/location", put(location_handler))
        .route("/api/users/:user_id/places", get(places_handler))
        .route("/api/notifications/distress", post(distress_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_COORDINATES" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            // Callers see a generic failure with the push service's text as detail
            Error::Notification(text) => ApiError {
                error: "Failed to send notification".to_string(),
                code: "UNKNOWN".to_string(),
                detail: Some(text),
            },
            other => {
                let code = match &other {
                    Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
                    Error::Store(_) => "STORE_ERROR",
                    Error::Config(_) => "CONFIG_ERROR",
                    _ => "INTERNAL_ERROR",
                };
                ApiError {
                    error: other.to_string(),
                    code: code.to_string(),
                    detail: None,
                }
            }
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Store backend in use
    pub store: String,
    /// Push messenger in use
    pub messenger: String,
    /// Geofence radius in kilometers
    pub radius_km: f64,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.tracker.store().name().to_string(),
        messenger: state.dispatcher.messenger().name().to_string(),
        radius_km: state.tracker.index().radius_km(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Location record as written by the app
#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
}

/// Location update response
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    /// What the update did; null when the location was cleared
    pub outcome: Option<VisitOutcome>,
}

/// Apply a user's new location
///
/// PUT /api/users/:user_id/location
///
/// A `null` body means the location record was cleared and is a no-op.
async fn location_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<Option<LocationPayload>>,
) -> Result<Json<LocationResponse>, ApiError> {
    let location = payload.map(|p| Coordinates::new(p.latitude, p.longitude));

    let outcome = state
        .tracker
        .handle_location_update(&user_id, location)
        .await?;

    Ok(Json(LocationResponse { outcome }))
}

/// Visited places response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: VisitedPlaceStore,
    pub count: usize,
}

/// List a user's visited places
///
/// GET /api/users/:user_id/places
async fn places_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let places = state.tracker.visited_places(&user_id).await?;
    let count = places.len();

    Ok(Json(PlacesResponse { places, count }))
}

/// Send a distress notification to the emergency topic
///
/// POST /api/notifications/distress
async fn distress_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NotificationRequest>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let response = state.dispatcher.dispatch(req).await?;
    Ok(Json(response))
}
