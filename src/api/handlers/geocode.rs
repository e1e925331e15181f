//! Geocoding handlers: address lookup and autocompletion.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{GeocodeQuery, GeocodeResponse, SuggestQuery, SuggestResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /geocode` — Resolve an address to a position.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] when the geocoder is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/geocode",
    tag = "Geocoding",
    summary = "Geocode an address",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Best match, if any", body = GeocodeResponse),
        (status = 502, description = "Geocoder unavailable", body = ErrorResponse),
    )
)]
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, GatewayError> {
    let position = state.parking_service.coordinates(&query.address).await?;
    Ok(Json(GeocodeResponse {
        address: query.address,
        position,
    }))
}

/// `GET /geocode/suggest` — Autocomplete an address.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] when the geocoder is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/geocode/suggest",
    tag = "Geocoding",
    summary = "Suggest addresses",
    description = "Returns up to five French addresses. Queries under three characters return an empty list.",
    params(SuggestQuery),
    responses(
        (status = 200, description = "Candidates", body = SuggestResponse),
        (status = 502, description = "Geocoder unavailable", body = ErrorResponse),
    )
)]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, GatewayError> {
    let suggestions = state.parking_service.suggest_addresses(&query.q).await?;
    Ok(Json(SuggestResponse { suggestions }))
}

/// Geocoding routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(geocode))
        .route("/geocode/suggest", get(suggest))
}
