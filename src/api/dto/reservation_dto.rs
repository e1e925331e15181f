//! Reservation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Parking, Reservation, ReservationForm};

/// Request body for `POST /reservations`.
///
/// The booking form fields sit at the top level next to the parking
/// being booked.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    /// Parking as returned by `GET /parkings`.
    pub parking: Parking,
    /// Booking form.
    #[serde(flatten)]
    pub form: ReservationForm,
}

/// Paginated list response for `GET /reservations`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationListResponse {
    /// Page of reservations, newest first.
    pub data: Vec<Reservation>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `DELETE /reservations/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelReservationResponse {
    /// Reservation after cancellation.
    pub reservation: Reservation,
    /// Whether the parking's stock counter got the place back.
    pub stock_restored: bool,
    /// Counter value after restoring, when it was restored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_places: Option<i64>,
}
