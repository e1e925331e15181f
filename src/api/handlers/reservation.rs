//! Reservation handlers: book, list, get, cancel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CancelReservationResponse, CreateReservationRequest, PaginationParams,
    ReservationListResponse,
};
use crate::api::extract::CurrentUser;
use crate::app_state::AppState;
use crate::domain::{Reservation, ReservationId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /reservations` — Book a parking.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for a rejected form and
/// [`GatewayError::Conflict`] when the plate is already booked over an
/// overlapping period.
#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    summary = "Book a parking",
    description = "Validates the booking form, rejects overlapping bookings for the same plate, stores the reservation and decrements the parking's local stock, all in one transaction.",
    request_body = CreateReservationRequest,
    params(
        ("x-user-id" = String, Header, description = "Caller id"),
    ),
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid booking form", body = ErrorResponse),
        (status = 401, description = "Missing user id", body = ErrorResponse),
        (status = 409, description = "Overlapping booking for this plate", body = ErrorResponse),
        (status = 502, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let reservation = state
        .reservation_service
        .create_reservation(&user, &req.parking, &req.form)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// `GET /reservations` — List the caller's reservations.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] when the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    summary = "List reservations",
    description = "Returns the caller's reservations, active and cancelled, newest first.",
    params(
        PaginationParams,
        ("x-user-id" = String, Header, description = "Caller id"),
    ),
    responses(
        (status = 200, description = "Paginated reservation list", body = ReservationListResponse),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let all = state.reservation_service.list_reservations(&user).await?;
    let (data, pagination) = params.paginate(all);
    Ok(Json(ReservationListResponse { data, pagination }))
}

/// `GET /reservations/{id}` — Get one of the caller's reservations.
///
/// # Errors
///
/// Returns [`GatewayError::ReservationNotFound`] or
/// [`GatewayError::Forbidden`].
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    summary = "Get a reservation",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
        ("x-user-id" = String, Header, description = "Caller id"),
    ),
    responses(
        (status = 200, description = "Reservation", body = Reservation),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<Reservation>, GatewayError> {
    state
        .reservation_service
        .get_reservation(&user, ReservationId::from_uuid(id))
        .await
        .map(Json)
}

/// `DELETE /reservations/{id}` — Cancel a reservation.
///
/// # Errors
///
/// Returns [`GatewayError::ReservationNotFound`],
/// [`GatewayError::Forbidden`] or [`GatewayError::AlreadyCancelled`].
#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    summary = "Cancel a reservation",
    description = "Marks the reservation as cancelled. The record is kept; the stock counter is restored only when the gateway runs with CANCEL_RESTORES_STOCK enabled.",
    params(
        ("id" = uuid::Uuid, Path, description = "Reservation UUID"),
        ("x-user-id" = String, Header, description = "Caller id"),
    ),
    responses(
        (status = 200, description = "Reservation cancelled", body = CancelReservationResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "Reservation not found", body = ErrorResponse),
        (status = 409, description = "Already cancelled", body = ErrorResponse),
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<CancelReservationResponse>, GatewayError> {
    let cancellation = state
        .reservation_service
        .cancel_reservation(&user, ReservationId::from_uuid(id))
        .await?;
    Ok(Json(CancelReservationResponse {
        reservation: cancellation.reservation,
        stock_restored: cancellation.restored_stock.is_some(),
        available_places: cancellation.restored_stock,
    }))
}

/// Reservation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            post(create_reservation).get(list_reservations),
        )
        .route(
            "/reservations/{id}",
            get(get_reservation).delete(cancel_reservation),
        )
}
