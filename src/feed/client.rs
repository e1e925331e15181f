//! HTTP client for the three city open-data feeds.
//!
//! Feeds are read-only, unauthenticated, and queried with a `limit`
//! parameter. A feed that cannot be reached or decoded degrades to an
//! empty list so one broken city never takes the whole search down.

use futures_util::future::join_all;
use serde_json::Value;

use super::normalize::normalize;
use crate::domain::{City, Parking};

/// Endpoint URL per city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoints {
    /// Paris on-street parking dataset.
    pub paris: String,
    /// Strasbourg real-time occupancy dataset.
    pub strasbourg: String,
    /// Toulouse car parks dataset.
    pub toulouse: String,
}

impl FeedEndpoints {
    /// Returns the endpoint for `city`.
    #[must_use]
    pub fn url(&self, city: City) -> &str {
        match city {
            City::Paris => &self.paris,
            City::Strasbourg => &self.strasbourg,
            City::Toulouse => &self.toulouse,
        }
    }
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            paris: "https://opendata.paris.fr/api/explore/v2.1/catalog/datasets/stationnement-voie-publique-emplacements/records".to_string(),
            strasbourg: "https://data.strasbourg.eu/api/explore/v2.1/catalog/datasets/occupation-parkings-temps-reel/records".to_string(),
            toulouse: "https://data.toulouse-metropole.fr/api/explore/v2.1/catalog/datasets/parcs-de-stationnement/records".to_string(),
        }
    }
}

/// Fetches and normalizes city feeds.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    endpoints: FeedEndpoints,
    limit: u32,
}

impl FeedClient {
    /// Creates a client querying at most `limit` records per feed.
    #[must_use]
    pub fn new(http: reqwest::Client, endpoints: FeedEndpoints, limit: u32) -> Self {
        Self {
            http,
            endpoints,
            limit,
        }
    }

    /// Returns the normalized parkings of one city.
    ///
    /// Transport, status and decoding failures are logged and produce an
    /// empty list.
    pub async fn fetch(&self, city: City) -> Vec<Parking> {
        match self.fetch_raw(city).await {
            Ok(payload) => {
                let parkings = normalize(city, &payload);
                tracing::debug!(%city, count = parkings.len(), "feed fetched");
                parkings
            }
            Err(err) => {
                tracing::warn!(%city, error = %err, "feed unavailable, returning no parkings");
                Vec::new()
            }
        }
    }

    /// Returns the normalized parkings of every city, in [`City::ALL`]
    /// order.
    pub async fn fetch_all(&self) -> Vec<Parking> {
        join_all(City::ALL.into_iter().map(|city| self.fetch(city)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn fetch_raw(&self, city: City) -> Result<Value, reqwest::Error> {
        self.http
            .get(self.endpoints.url(city))
            .query(&[("limit", self.limit)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}
