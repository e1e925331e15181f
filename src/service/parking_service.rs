//! Parking search: feeds, local stock overlay and geocoding.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{City, Parking, ParkingStock, Position};
use crate::error::GatewayError;
use crate::feed::{AddressSuggestion, FeedClient, GeocodingClient, apply_stock_overrides};
use crate::persistence::DocumentStore;

/// Read side of the gateway: what the map shows.
#[derive(Debug, Clone)]
pub struct ParkingService {
    feeds: FeedClient,
    geocoder: GeocodingClient,
    store: Arc<dyn DocumentStore>,
}

impl ParkingService {
    /// Creates a new `ParkingService`.
    #[must_use]
    pub fn new(feeds: FeedClient, geocoder: GeocodingClient, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            feeds,
            geocoder,
            store,
        }
    }

    /// Returns the parkings of one city, or of every city when `city` is
    /// `None`, with locally tracked availability applied.
    ///
    /// Unreachable feeds contribute no parkings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the stock records cannot
    /// be loaded.
    pub async fn list_parkings(&self, city: Option<City>) -> Result<Vec<Parking>, GatewayError> {
        let parkings = match city {
            Some(city) => self.feeds.fetch(city).await,
            None => self.feeds.fetch_all().await,
        };
        if parkings.is_empty() {
            return Ok(parkings);
        }

        let ids: Vec<String> = parkings.iter().map(|p| p.id.clone()).collect();
        let stocks: HashMap<String, ParkingStock> = self
            .store
            .stocks(&ids)
            .await
            .map_err(GatewayError::from_read)?
            .into_iter()
            .map(|s| (s.parking_id.clone(), s))
            .collect();

        tracing::debug!(
            city = city.map_or("all", |c| c.as_str()),
            parkings = parkings.len(),
            overrides = stocks.len(),
            "parkings listed"
        );
        Ok(apply_stock_overrides(parkings, &stocks))
    }

    /// Looks a parking up by id among the current feed data.
    ///
    /// # Errors
    ///
    /// Propagates [`ParkingService::list_parkings`] failures.
    pub async fn find_parking(
        &self,
        city: Option<City>,
        parking_id: &str,
    ) -> Result<Option<Parking>, GatewayError> {
        Ok(self
            .list_parkings(city)
            .await?
            .into_iter()
            .find(|p| p.id == parking_id))
    }

    /// Returns the local stock record of a parking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StockNotFound`] when the parking was never
    /// booked through the gateway.
    pub async fn stock(&self, parking_id: &str) -> Result<ParkingStock, GatewayError> {
        self.store
            .stock(parking_id)
            .await
            .map_err(GatewayError::from_read)?
            .ok_or_else(|| GatewayError::StockNotFound(parking_id.to_string()))
    }

    /// Resolves a free-text address.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when geocoding fails.
    pub async fn coordinates(&self, address: &str) -> Result<Option<Position>, GatewayError> {
        self.geocoder.coordinates(address).await
    }

    /// Returns address autocompletion candidates.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when geocoding fails.
    pub async fn suggest_addresses(
        &self,
        query: &str,
    ) -> Result<Vec<AddressSuggestion>, GatewayError> {
        self.geocoder.suggest(query).await
    }
}
