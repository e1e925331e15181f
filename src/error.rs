//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ReservationId, ValidationError};
use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2003,
///     "message": "plate AB-123-CD already booked over an overlapping period",
///     "details": "f1c4..."
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                   |
/// |-----------|--------------------|-------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request               |
/// | 2000–2999 | Not Found/Conflict | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Remote / Server    | 502 Bad Gateway / 500         |
/// | 401, 403  | Identity           | 401 / 403                     |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Booking form failed validation.
    #[error("invalid reservation: {0}")]
    Validation(#[from] ValidationError),

    /// Request body or query failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unsupported city identifier.
    #[error("unknown city: {0}")]
    InvalidCity(String),

    /// Reservation with the given ID was not found.
    #[error("reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// Favorite with the given ID was not found.
    #[error("favorite not found: {0}")]
    FavoriteNotFound(uuid::Uuid),

    /// No local stock record exists for the parking.
    #[error("no stock record for parking {0}")]
    StockNotFound(String),

    /// The same plate already holds an active booking over an
    /// overlapping period.
    #[error("plate {plate} already booked over an overlapping period")]
    Conflict {
        /// Normalized plate.
        plate: String,
        /// Active reservation that clashes.
        existing: ReservationId,
    },

    /// Reservation was already cancelled.
    #[error("reservation already cancelled: {0}")]
    AlreadyCancelled(ReservationId),

    /// The store kept aborting the transaction on concurrent updates.
    #[error("store contention, transaction aborted")]
    Contention,

    /// A write against the document store failed.
    #[error("remote write failed: {0}")]
    RemoteWrite(String),

    /// A read against the document store, a feed, or the geocoder failed.
    #[error("remote read failed: {0}")]
    RemoteRead(String),

    /// No user id was supplied.
    #[error("missing user identity")]
    Unauthorized,

    /// The caller does not own the resource.
    #[error("resource belongs to another user")]
    Forbidden,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Maps a store failure on a read path.
    #[must_use]
    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::Contention => Self::Contention,
            StoreError::Backend(msg) => Self::RemoteRead(msg),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::InvalidCity(_) => 1003,
            Self::ReservationNotFound(_) => 2001,
            Self::FavoriteNotFound(_) => 2002,
            Self::StockNotFound(_) => 2004,
            Self::Conflict { .. } => 2003,
            Self::AlreadyCancelled(_) => 2005,
            Self::Contention => 2006,
            Self::RemoteWrite(_) => 3001,
            Self::RemoteRead(_) => 3002,
            Self::Internal(_) => 3000,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidRequest(_) | Self::InvalidCity(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ReservationNotFound(_) | Self::FavoriteNotFound(_) | Self::StockNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Conflict { .. } | Self::AlreadyCancelled(_) | Self::Contention => {
                StatusCode::CONFLICT
            }
            Self::RemoteWrite(_) | Self::RemoteRead(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Conflict { existing, .. } => Some(existing.to_string()),
            _ => None,
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Contention => Self::Contention,
            StoreError::Backend(msg) => Self::RemoteWrite(msg),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_distinct_from_validation() {
        let conflict = GatewayError::Conflict {
            plate: "AB-123-CD".to_string(),
            existing: ReservationId::new(),
        };
        let invalid = GatewayError::from(ValidationError::InvalidPlate("x".to_string()));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_ne!(conflict.error_code(), invalid.error_code());
    }

    #[test]
    fn store_errors_map_by_direction() {
        let write = GatewayError::from(StoreError::Backend("down".to_string()));
        let read = GatewayError::from_read(StoreError::Backend("down".to_string()));
        assert_eq!(write.error_code(), 3001);
        assert_eq!(read.error_code(), 3002);
        assert_eq!(write.status_code(), StatusCode::BAD_GATEWAY);
    }
}
