//! Favorites and history handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{
    FavoriteListResponse, FavoriteToggleResponse, HistoryListResponse, ParkingRequest,
};
use crate::api::extract::CurrentUser;
use crate::app_state::AppState;
use crate::domain::{Favorite, HistoryEntry};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /favorites` — List the caller's favorites.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] when the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    tag = "Library",
    summary = "List favorites",
    params(("x-user-id" = String, Header, description = "Caller id")),
    responses(
        (status = 200, description = "Favorites, newest first", body = FavoriteListResponse),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<FavoriteListResponse>, GatewayError> {
    let data = state.library_service.list_favorites(&user).await?;
    Ok(Json(FavoriteListResponse {
        count: data.len(),
        data,
    }))
}

/// `POST /favorites` — Bookmark a parking.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteWrite`] when the store is unavailable.
#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    tag = "Library",
    summary = "Add a favorite",
    description = "Bookmarks the parking. Adding a parking that is already a favorite returns the existing bookmark.",
    request_body = ParkingRequest,
    params(("x-user-id" = String, Header, description = "Caller id")),
    responses(
        (status = 201, description = "Favorite stored", body = Favorite),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ParkingRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let favorite = state.library_service.add_favorite(&user, &req.parking).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// `POST /favorites/toggle` — Add or remove a bookmark.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] or [`GatewayError::RemoteWrite`]
/// when the store is unavailable.
#[utoipa::path(
    post,
    path = "/api/v1/favorites/toggle",
    tag = "Library",
    summary = "Toggle a favorite",
    request_body = ParkingRequest,
    params(("x-user-id" = String, Header, description = "Caller id")),
    responses(
        (status = 200, description = "New favorite state", body = FavoriteToggleResponse),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ParkingRequest>,
) -> Result<Json<FavoriteToggleResponse>, GatewayError> {
    let toggle = state
        .library_service
        .toggle_favorite(&user, &req.parking)
        .await?;
    Ok(Json(toggle.into()))
}

/// `DELETE /favorites/{id}` — Remove a bookmark.
///
/// # Errors
///
/// Returns [`GatewayError::FavoriteNotFound`] or [`GatewayError::Forbidden`].
#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{id}",
    tag = "Library",
    summary = "Remove a favorite",
    params(
        ("id" = uuid::Uuid, Path, description = "Favorite UUID"),
        ("x-user-id" = String, Header, description = "Caller id"),
    ),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "Favorite not found", body = ErrorResponse),
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, GatewayError> {
    state.library_service.remove_favorite(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /history` — List the caller's consulted parkings.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteRead`] when the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "Library",
    summary = "List history",
    params(("x-user-id" = String, Header, description = "Caller id")),
    responses(
        (status = 200, description = "History, most recent first", body = HistoryListResponse),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<HistoryListResponse>, GatewayError> {
    let data = state.library_service.list_history(&user).await?;
    Ok(Json(HistoryListResponse {
        count: data.len(),
        data,
    }))
}

/// `POST /history` — Record a parking visit.
///
/// # Errors
///
/// Returns [`GatewayError::RemoteWrite`] when the store is unavailable.
#[utoipa::path(
    post,
    path = "/api/v1/history",
    tag = "Library",
    summary = "Record a visit",
    description = "Adds the parking to the caller's history, or bumps its last-visit time when already present.",
    request_body = ParkingRequest,
    params(("x-user-id" = String, Header, description = "Caller id")),
    responses(
        (status = 200, description = "History entry", body = HistoryEntry),
        (status = 401, description = "Missing user id", body = ErrorResponse),
    )
)]
pub async fn record_visit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ParkingRequest>,
) -> Result<Json<HistoryEntry>, GatewayError> {
    state
        .library_service
        .record_visit(&user, &req.parking)
        .await
        .map(Json)
}

/// Favorites and history routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/toggle", post(toggle_favorite))
        .route("/favorites/{id}", delete(remove_favorite))
        .route("/history", get(list_history).post(record_visit))
}
