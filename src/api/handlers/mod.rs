//! REST endpoint handlers organized by resource.

pub mod geocode;
pub mod library;
pub mod parking;
pub mod reservation;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(parking::routes())
        .merge(reservation::routes())
        .merge(library::routes())
        .merge(geocode::routes())
}
