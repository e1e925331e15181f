//! Parking search handlers: list with city filter, local stock.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ParkingListQuery, ParkingListResponse};
use crate::app_state::AppState;
use crate::domain::ParkingStock;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /parkings` — List parkings of one or every city.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidCity`] for an unsupported filter.
#[utoipa::path(
    get,
    path = "/api/v1/parkings",
    tag = "Parkings",
    summary = "List parkings",
    description = "Fetches the open-data feeds, normalizes every record into the common parking shape and overlays locally tracked availability. A feed that cannot be reached contributes no records.",
    params(ParkingListQuery),
    responses(
        (status = 200, description = "Normalized parkings", body = ParkingListResponse),
        (status = 400, description = "Unknown city", body = ErrorResponse),
    )
)]
pub async fn list_parkings(
    State(state): State<AppState>,
    Query(query): Query<ParkingListQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let city = query.city_filter()?;
    let data = state.parking_service.list_parkings(city).await?;
    Ok(Json(ParkingListResponse {
        city: city.map_or_else(|| "all".to_string(), |c| c.to_string()),
        count: data.len(),
        data,
    }))
}

/// `GET /parkings/{id}/stock` — Locally tracked availability.
///
/// # Errors
///
/// Returns [`GatewayError::StockNotFound`] when the parking was never
/// booked through the gateway.
#[utoipa::path(
    get,
    path = "/api/v1/parkings/{id}/stock",
    tag = "Parkings",
    summary = "Get local stock",
    params(
        ("id" = String, Path, description = "Parking id as returned by the feed"),
    ),
    responses(
        (status = 200, description = "Stock record", body = ParkingStock),
        (status = 404, description = "No local stock record", body = ErrorResponse),
    )
)]
pub async fn parking_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParkingStock>, GatewayError> {
    state.parking_service.stock(&id).await.map(Json)
}

/// Parking search routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parkings", get(list_parkings))
        .route("/parkings/{id}/stock", get(parking_stock))
}
