//! Forward geocoding against a Mapbox-compatible places API.
//!
//! Two lookups are exposed: resolving a free-text address to a single
//! position, and address autocompletion restricted to France.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Position;
use crate::error::GatewayError;

/// Shortest query worth sending to the autocompletion endpoint.
const MIN_SUGGEST_LEN: usize = 3;

/// Maximum number of autocompletion candidates.
const SUGGEST_LIMIT: &str = "5";

/// One autocompletion candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressSuggestion {
    /// Full formatted place name.
    pub place_name: String,
    /// Feature center.
    pub position: Position,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    place_name: String,
    /// `[lon, lat]`.
    #[serde(default)]
    center: Vec<f64>,
}

impl Feature {
    fn position(&self) -> Option<Position> {
        match self.center.as_slice() {
            [lon, lat, ..] => Some(Position::new(*lat, *lon)),
            _ => None,
        }
    }
}

/// Client for the geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GeocodingClient {
    /// Creates a client. Without a token every lookup fails with
    /// [`GatewayError::RemoteRead`].
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token,
        }
    }

    /// Resolves `address` to the best matching position.
    ///
    /// Returns `Ok(None)` for a blank address or when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the token is missing or
    /// the API call fails.
    pub async fn coordinates(&self, address: &str) -> Result<Option<Position>, GatewayError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        let features = self.lookup(address, &[("limit", "1")]).await?;
        Ok(features.first().and_then(Feature::position))
    }

    /// Returns up to five French address candidates for `query`.
    ///
    /// Queries shorter than three characters return nothing without
    /// calling the API.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the token is missing or
    /// the API call fails.
    pub async fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>, GatewayError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_LEN {
            return Ok(Vec::new());
        }
        let features = self
            .lookup(
                query,
                &[
                    ("country", "fr"),
                    ("language", "fr"),
                    ("limit", SUGGEST_LIMIT),
                    ("types", "address,place,postcode"),
                ],
            )
            .await?;
        Ok(features
            .into_iter()
            .filter_map(|f| {
                let position = f.position()?;
                Some(AddressSuggestion {
                    place_name: f.place_name,
                    position,
                })
            })
            .collect())
    }

    async fn lookup(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Feature>, GatewayError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| GatewayError::RemoteRead("geocoding token not configured".to_string()))?;

        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| GatewayError::Internal(format!("invalid geocoding url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::Internal("geocoding url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&format!("{query}.json"));

        let collection = self
            .http
            .get(url)
            .query(&[("access_token", token)])
            .query(params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GatewayError::RemoteRead(format!("geocoding request failed: {e}")))?
            .json::<FeatureCollection>()
            .await
            .map_err(|e| GatewayError::RemoteRead(format!("geocoding response invalid: {e}")))?;

        Ok(collection.features)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn client(token: Option<&str>) -> GeocodingClient {
        GeocodingClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/geocoding/v5/mapbox.places",
            token.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn short_queries_skip_the_api() {
        let Ok(list) = client(None).suggest(" ab ").await else {
            panic!("short query should not fail");
        };
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn blank_address_resolves_to_none() {
        let result = client(None).coordinates("   ").await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn missing_token_is_a_remote_read_error() {
        let result = client(None).coordinates("10 rue de Rivoli").await;
        assert!(matches!(result, Err(GatewayError::RemoteRead(_))));
    }

    #[test]
    fn feature_center_is_lon_lat() {
        let feature = Feature {
            place_name: "Paris".to_string(),
            center: vec![2.35, 48.85],
        };
        assert_eq!(feature.position(), Some(Position::new(48.85, 2.35)));
        let empty = Feature {
            place_name: String::new(),
            center: vec![],
        };
        assert!(empty.position().is_none());
    }
}
