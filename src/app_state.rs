//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::domain::{Clock, EventBus};
use crate::error::GatewayError;
use crate::feed::{FeedClient, GeocodingClient};
use crate::persistence::DocumentStore;
use crate::service::{LibraryService, ParkingService, ReservationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Parking search and geocoding.
    pub parking_service: Arc<ParkingService>,
    /// Booking and cancellation.
    pub reservation_service: Arc<ReservationService>,
    /// Favorites and history.
    pub library_service: Arc<LibraryService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires every service on top of `store` and `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] when the outbound HTTP client
    /// cannot be built.
    pub fn build(
        config: &GatewayConfig,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("parkfinder-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Internal(format!("http client: {e}")))?;

        let event_bus = EventBus::new(config.event_bus_capacity);

        let feeds = FeedClient::new(http.clone(), config.feeds.clone(), config.feed_limit);
        let geocoder = GeocodingClient::new(
            http,
            config.geocoding_url.clone(),
            config.mapbox_token.clone(),
        );

        let parking_service = Arc::new(ParkingService::new(
            feeds,
            geocoder,
            Arc::clone(&store),
        ));
        let reservation_service = Arc::new(ReservationService::new(
            Arc::clone(&store),
            event_bus.clone(),
            Arc::clone(&clock),
            config.booking_timezone,
            config.cancel_policy,
            config.reservation_max_attempts,
        ));
        let library_service = Arc::new(LibraryService::new(store, event_bus.clone(), clock));

        Ok(Self {
            parking_service,
            reservation_service,
            library_service,
            event_bus,
        })
    }
}
