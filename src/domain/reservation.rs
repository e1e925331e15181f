//! Reservation entity and its value types.
//!
//! A [`Reservation`] embeds a [`ParkingSnapshot`], a point-in-time copy
//! of the parking as the user saw it when booking. Later changes to the
//! feed or to the shared stock counter never rewrite an existing booking.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::ValidationError;
use super::{City, Parking, ParkingStatus, Position, ReservationId, UserId};

// Compile-time literal; it cannot fail to build.
#[allow(clippy::expect_used)]
static PLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}-\d{3}-[A-Z]{2}$").expect("plate pattern is a valid literal")
});

/// French registration plate in `AB-123-CD` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Trims and upper-cases `raw`, then checks the dashed
    /// two-letters / three-digits / two-letters format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPlate`] when the normalized value
    /// does not match.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();
        if PLATE_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(ValidationError::InvalidPlate(raw.to_string()))
        }
    }

    /// Returns the normalized plate.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable copy of a [`Parking`] taken at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParkingSnapshot {
    /// Parking identifier within its feed.
    pub id: String,
    /// Parking label.
    pub name: String,
    /// Originating city.
    pub city: City,
    /// Address at booking time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free places shown to the user at booking time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_places: Option<i64>,
    /// Capacity at booking time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<i64>,
    /// Operating state at booking time.
    pub status: ParkingStatus,
    /// Map position.
    pub position: Position,
}

impl From<&Parking> for ParkingSnapshot {
    fn from(parking: &Parking) -> Self {
        Self {
            id: parking.id.clone(),
            name: parking.name.clone(),
            city: parking.city,
            address: parking.address.clone(),
            available_places: parking.available_places,
            total_capacity: parking.total_capacity,
            status: parking.status,
            position: parking.position,
        }
    }
}

/// Half-open interval `[start, end)` of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Arrival.
    pub start: NaiveDateTime,
    /// Departure.
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Returns `true` when the two intervals share any instant.
    ///
    /// Ranges that merely touch (`self.end == other.start`) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booking is live and takes part in conflict checks.
    Active,
    /// Booking was cancelled by its owner; kept for auditing.
    Cancelled,
}

impl ReservationStatus {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// A booking of one parking for one vehicle over one time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Owner.
    pub user_id: UserId,
    /// Parking as it was when booked.
    pub parking: ParkingSnapshot,
    /// Normalized plate of the booked vehicle.
    pub license_plate: LicensePlate,
    /// Arrival day.
    pub arrival_date: NaiveDate,
    /// Arrival time of day.
    pub arrival: NaiveTime,
    /// Departure day.
    pub departure_date: NaiveDate,
    /// Departure time of day.
    pub departure: NaiveTime,
    /// `arrival_date` + `arrival`.
    pub full_start_time: NaiveDateTime,
    /// `departure_date` + `departure`; always after `full_start_time`.
    pub full_end_time: NaiveDateTime,
    /// Lifecycle state.
    pub status: ReservationStatus,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the owner cancels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Returns the booked interval.
    #[must_use]
    pub const fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.full_start_time,
            end: self.full_end_time,
        }
    }

    /// Returns `true` while the booking has not been cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") else {
            panic!("bad test timestamp {s}");
        };
        dt
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange {
            start: at(start),
            end: at(end),
        }
    }

    #[test]
    fn plate_accepts_canonical_form() {
        let Ok(plate) = LicensePlate::parse("AB-123-CD") else {
            panic!("expected valid plate");
        };
        assert_eq!(plate.as_str(), "AB-123-CD");
    }

    #[test]
    fn plate_is_uppercased_before_matching() {
        let Ok(plate) = LicensePlate::parse(" ab-123-cd ") else {
            panic!("expected lower-case plate to normalize");
        };
        assert_eq!(plate.as_str(), "AB-123-CD");
    }

    #[test]
    fn plate_rejects_malformed_values() {
        for raw in ["AB123CD", "A-123-CD", "AB-12-CD", "AB-1234-CD", "12-ABC-34", ""] {
            assert!(LicensePlate::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn overlapping_ranges_are_detected() {
        let existing = range("2024-01-20T10:00", "2024-01-20T12:00");
        assert!(existing.overlaps(&range("2024-01-20T11:00", "2024-01-20T13:00")));
        assert!(existing.overlaps(&range("2024-01-20T09:00", "2024-01-20T10:30")));
        assert!(existing.overlaps(&range("2024-01-20T10:15", "2024-01-20T10:45")));
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let existing = range("2024-01-20T10:00", "2024-01-20T12:00");
        assert!(!existing.overlaps(&range("2024-01-20T12:00", "2024-01-20T13:00")));
        assert!(!existing.overlaps(&range("2024-01-20T08:00", "2024-01-20T10:00")));
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!("cancelled".parse::<ReservationStatus>(), Ok(ReservationStatus::Cancelled));
        assert_eq!(ReservationStatus::Active.as_str(), "active");
        assert!("deleted".parse::<ReservationStatus>().is_err());
    }
}
