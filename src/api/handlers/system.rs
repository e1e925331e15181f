//! System endpoints: health check, supported cities.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::City;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` when the process answers.
    pub status: String,
    /// Server time, RFC 3339.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Supported city info.
#[derive(Debug, Serialize, ToSchema)]
pub struct CityInfo {
    /// Value accepted by the `city` filter.
    pub city: City,
    /// Human-readable name.
    pub name: &'static str,
    /// Whether the feed reports live occupancy.
    pub live_occupancy: bool,
}

/// `GET /config/cities` — List supported cities.
#[utoipa::path(
    get,
    path = "/config/cities",
    tag = "System",
    summary = "List supported cities",
    description = "Returns every city whose open-data feed the gateway normalizes.",
    responses(
        (status = 200, description = "City catalog", body = Vec<CityInfo>),
    )
)]
pub async fn cities_handler() -> impl IntoResponse {
    let cities: Vec<CityInfo> = City::ALL
        .into_iter()
        .map(|city| CityInfo {
            city,
            name: city.display_name(),
            live_occupancy: !matches!(city, City::Paris),
        })
        .collect();
    (StatusCode::OK, Json(cities))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/cities", get(cities_handler))
}
