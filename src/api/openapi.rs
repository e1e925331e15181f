//! OpenAPI document for every REST endpoint.

use utoipa::OpenApi;

use super::dto;
use super::handlers::{geocode, library, parking, reservation, system};
use crate::domain;
use crate::error::{ErrorBody, ErrorResponse};
use crate::feed::AddressSuggestion;

/// Generated OpenAPI description of the gateway.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "parkfinder-gateway",
        description = "Parking search over the Paris, Strasbourg and Toulouse open-data feeds, with bookings, favorites and history."
    ),
    paths(
        system::health_handler,
        system::cities_handler,
        parking::list_parkings,
        parking::parking_stock,
        reservation::create_reservation,
        reservation::list_reservations,
        reservation::get_reservation,
        reservation::cancel_reservation,
        library::list_favorites,
        library::add_favorite,
        library::toggle_favorite,
        library::remove_favorite,
        library::list_history,
        library::record_visit,
        geocode::geocode,
        geocode::suggest,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        AddressSuggestion,
        domain::City,
        domain::Position,
        domain::ParkingStatus,
        domain::Parking,
        domain::ParkingSnapshot,
        domain::ParkingStock,
        domain::StockSource,
        domain::Reservation,
        domain::ReservationStatus,
        domain::ReservationForm,
        domain::ReservationId,
        domain::UserId,
        domain::LicensePlate,
        domain::Favorite,
        domain::HistoryEntry,
        dto::ParkingRequest,
        dto::PaginationMeta,
        dto::ParkingListResponse,
        dto::CreateReservationRequest,
        dto::ReservationListResponse,
        dto::CancelReservationResponse,
        dto::FavoriteListResponse,
        dto::FavoriteToggleResponse,
        dto::HistoryListResponse,
        dto::GeocodeResponse,
        dto::SuggestResponse,
        system::HealthResponse,
        system::CityInfo,
    )),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Parkings", description = "Normalized parking search"),
        (name = "Reservations", description = "Bookings and cancellations"),
        (name = "Library", description = "Favorites and consultation history"),
        (name = "Geocoding", description = "Address lookup"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, serving the document at
/// `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/reservations"));
        assert!(doc.paths.paths.contains_key("/api/v1/reservations/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/parkings"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
