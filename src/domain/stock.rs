//! Per-parking available-spot counter.
//!
//! A [`ParkingStock`] is the only piece of state shared between users: every
//! booking against the same parking id adjusts the same record. It is
//! created lazily on the first booking and never deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParkingSnapshot;

/// Where a stock record's initial value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockSource {
    /// Seeded from an upstream feed's reported availability.
    ApiImport,
    /// Created natively by another writer sharing the store. The gateway
    /// never seeds this itself but must still read such records back.
    Native,
}

impl StockSource {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApiImport => "api_import",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for StockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "api_import" => Ok(Self::ApiImport),
            "native" => Ok(Self::Native),
            other => Err(format!("unknown stock source: {other}")),
        }
    }
}

/// Mutable available-spot counter keyed by parking id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParkingStock {
    /// Parking identifier (same key space as the feeds).
    pub parking_id: String,
    /// Remaining places as tracked locally.
    pub available_places: i64,
    /// Origin of the initial value.
    pub source: StockSource,
    /// Last mutation time.
    pub last_updated: DateTime<Utc>,
}

impl ParkingStock {
    /// Builds the record for the first booking against `snapshot`.
    ///
    /// The feed's availability is clamped to zero when absent or
    /// non-positive, then one place is taken for the booking. A parking
    /// reported full therefore starts at `-1`.
    #[must_use]
    pub fn seed_from(snapshot: &ParkingSnapshot, now: DateTime<Utc>) -> Self {
        let reported = snapshot.available_places.unwrap_or(0).max(0);
        Self {
            parking_id: snapshot.id.clone(),
            available_places: reported.saturating_sub(1),
            source: StockSource::ApiImport,
            last_updated: now,
        }
    }
}
