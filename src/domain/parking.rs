//! Canonical parking record shared by every city feed.
//!
//! Upstream feeds disagree on field names, units and even on whether a
//! parking reports its operating state. [`Parking`] is the single
//! source-agnostic shape the rest of the gateway consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// City whose open-data feed a parking record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum City {
    /// Paris on-street parking locations.
    Paris,
    /// Strasbourg real-time parking occupancy.
    Strasbourg,
    /// Toulouse metropolitan car parks.
    Toulouse,
}

impl City {
    /// Every supported city, in display order.
    pub const ALL: [Self; 3] = [Self::Paris, Self::Strasbourg, Self::Toulouse];

    /// Returns the lowercase identifier used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paris => "paris",
            Self::Strasbourg => "strasbourg",
            Self::Toulouse => "toulouse",
        }
    }

    /// Returns the human-readable city name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Paris => "Paris",
            Self::Strasbourg => "Strasbourg",
            Self::Toulouse => "Toulouse",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paris" => Ok(Self::Paris),
            "strasbourg" => Ok(Self::Strasbourg),
            "toulouse" => Ok(Self::Toulouse),
            other => Err(GatewayError::InvalidCity(other.to_string())),
        }
    }
}

/// Geographic position of a parking.
///
/// Both coordinates are optional because some upstream records omit
/// them. Such records are still returned; deciding whether they can be
/// placed on a map is left to the consumer via [`Position::coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lon: Option<f64>,
}

impl Position {
    /// Creates a position with both coordinates set.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Returns `(lat, lon)` when both coordinates are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Operating state of a parking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkingStatus {
    /// The source reports the parking as open.
    Open,
    /// The source reports the parking as closed.
    Closed,
    /// The source does not report an operating state.
    Unknown,
    /// Locally tracked stock reached zero.
    Full,
}

impl ParkingStatus {
    /// Returns the upper-case wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
            Self::Full => "FULL",
        }
    }
}

/// Source-agnostic parking record.
///
/// `available_places` and `total_capacity` are passed through from the
/// feed untouched. Feeds do not guarantee `available <= capacity` and the
/// gateway does not repair it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Parking {
    /// Stable identifier within its source feed.
    pub id: String,
    /// Human label.
    pub name: String,
    /// Originating city.
    pub city: City,
    /// Map position (possibly incomplete).
    pub position: Position,
    /// Best-effort postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free places as reported or derived from the feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_places: Option<i64>,
    /// Total number of places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<i64>,
    /// Operating state.
    pub status: ParkingStatus,
}
