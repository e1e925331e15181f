//! Database row models and their conversion into domain types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::Json;

use super::StoreError;
use crate::domain::{
    Favorite, HistoryEntry, LicensePlate, ParkingSnapshot, ParkingStock, Reservation,
    ReservationId, UserId,
};

/// A row of the `reservations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReservationRow {
    /// Primary key.
    pub id: uuid::Uuid,
    /// Owner.
    pub user_id: String,
    /// Embedded parking snapshot as JSONB.
    pub parking: Json<ParkingSnapshot>,
    /// Normalized plate.
    pub license_plate: String,
    /// Arrival day.
    pub arrival_date: NaiveDate,
    /// Arrival time of day.
    pub arrival: NaiveTime,
    /// Departure day.
    pub departure_date: NaiveDate,
    /// Departure time of day.
    pub departure: NaiveTime,
    /// Combined arrival.
    pub full_start_time: NaiveDateTime,
    /// Combined departure.
    pub full_end_time: NaiveDateTime,
    /// `active` or `cancelled`.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let license_plate = LicensePlate::parse(&row.license_plate)
            .map_err(|e| StoreError::Backend(format!("corrupt reservation {}: {e}", row.id)))?;
        let status = row.status.parse().map_err(StoreError::Backend)?;
        Ok(Self {
            id: ReservationId::from_uuid(row.id),
            user_id: UserId::new(row.user_id),
            parking: row.parking.0,
            license_plate,
            arrival_date: row.arrival_date,
            arrival: row.arrival,
            departure_date: row.departure_date,
            departure: row.departure,
            full_start_time: row.full_start_time,
            full_end_time: row.full_end_time,
            status,
            created_at: row.created_at,
            cancelled_at: row.cancelled_at,
        })
    }
}

/// A row of the `parking_stock` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockRow {
    /// Parking identifier (primary key).
    pub parking_id: String,
    /// Counter value.
    pub available_places: i64,
    /// `api_import` or `native`.
    pub source: String,
    /// Last mutation.
    pub last_updated: DateTime<Utc>,
}

impl TryFrom<StockRow> for ParkingStock {
    type Error = StoreError;

    fn try_from(row: StockRow) -> Result<Self, Self::Error> {
        Ok(Self {
            parking_id: row.parking_id,
            available_places: row.available_places,
            source: row.source.parse().map_err(StoreError::Backend)?,
            last_updated: row.last_updated,
        })
    }
}

/// A row of the `favorites` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    /// Primary key.
    pub id: uuid::Uuid,
    /// Owner.
    pub user_id: String,
    /// Embedded parking snapshot.
    pub parking: Json<ParkingSnapshot>,
    /// Bookmark time.
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::new(row.user_id),
            parking: row.parking.0,
            created_at: row.created_at,
        }
    }
}

/// A row of the `history` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    /// Primary key.
    pub id: uuid::Uuid,
    /// Owner.
    pub user_id: String,
    /// Embedded parking snapshot.
    pub parking: Json<ParkingSnapshot>,
    /// Most recent visit.
    pub searched_at: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::new(row.user_id),
            parking: row.parking.0,
            searched_at: row.searched_at,
        }
    }
}
