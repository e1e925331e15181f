//! Geocoding DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Position;
use crate::feed::AddressSuggestion;

/// Query string of `GET /geocode`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeQuery {
    /// Free-text address.
    #[serde(default)]
    pub address: String,
}

/// Response body of `GET /geocode`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeocodeResponse {
    /// Address as queried.
    pub address: String,
    /// Best match, absent when nothing matched.
    pub position: Option<Position>,
}

/// Query string of `GET /geocode/suggest`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestQuery {
    /// Partial address, at least three characters.
    #[serde(default)]
    pub q: String,
}

/// Response body of `GET /geocode/suggest`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestResponse {
    /// Candidates, best first.
    pub suggestions: Vec<AddressSuggestion>,
}
