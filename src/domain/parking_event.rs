//! Domain events reflecting bookings and stock changes.
//!
//! Every committed mutation emits a [`ParkingEvent`] through the
//! [`super::EventBus`]. WebSocket clients subscribe per parking id so a
//! map view can refresh availability without polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ReservationId, UserId};

/// Domain event emitted after every committed mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ParkingEvent {
    /// A booking was committed.
    ReservationCreated {
        /// Booked parking.
        parking_id: String,
        /// New reservation.
        reservation_id: ReservationId,
        /// Owner.
        user_id: UserId,
        /// Arrival.
        starts_at: chrono::NaiveDateTime,
        /// Departure.
        ends_at: chrono::NaiveDateTime,
        /// Commit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking was cancelled by its owner.
    ReservationCancelled {
        /// Booked parking.
        parking_id: String,
        /// Cancelled reservation.
        reservation_id: ReservationId,
        /// Whether the stock counter was given the place back.
        stock_restored: bool,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The local stock counter of a parking changed.
    StockChanged {
        /// Parking whose counter moved.
        parking_id: String,
        /// Counter value after the change.
        available_places: i64,
        /// Change timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user bookmarked a parking.
    FavoriteAdded {
        /// Bookmarked parking.
        parking_id: String,
        /// Owner.
        user_id: UserId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user removed a bookmark.
    FavoriteRemoved {
        /// Previously bookmarked parking.
        parking_id: String,
        /// Owner.
        user_id: UserId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user's consultation history was updated.
    HistoryRecorded {
        /// Visited parking.
        parking_id: String,
        /// Owner.
        user_id: UserId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ParkingEvent {
    /// Returns the parking id associated with this event.
    #[must_use]
    pub fn parking_id(&self) -> &str {
        match self {
            Self::ReservationCreated { parking_id, .. }
            | Self::ReservationCancelled { parking_id, .. }
            | Self::StockChanged { parking_id, .. }
            | Self::FavoriteAdded { parking_id, .. }
            | Self::FavoriteRemoved { parking_id, .. }
            | Self::HistoryRecorded { parking_id, .. } => parking_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ReservationCreated { .. } => "reservation_created",
            Self::ReservationCancelled { .. } => "reservation_cancelled",
            Self::StockChanged { .. } => "stock_changed",
            Self::FavoriteAdded { .. } => "favorite_added",
            Self::FavoriteRemoved { .. } => "favorite_removed",
            Self::HistoryRecorded { .. } => "history_recorded",
        }
    }
}
