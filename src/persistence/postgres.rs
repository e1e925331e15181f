//! PostgreSQL implementation of the document store.
//!
//! Booking transactions run at `SERIALIZABLE` isolation: the read of a
//! user's active reservations and the stock upsert form one unit, and a
//! concurrent booking that would break either invariant aborts with a
//! serialization failure that is surfaced as [`StoreError::Contention`].

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{FavoriteRow, HistoryRow, ReservationRow, StockRow};
use super::{DocumentStore, StoreError, StoreTransaction};
use crate::domain::{Favorite, HistoryEntry, ParkingStock, Reservation, ReservationId, UserId};

const RESERVATION_COLUMNS: &str = "id, user_id, parking, license_plate, arrival_date, arrival, \
     departure_date, departure, full_start_time, full_end_time, status, created_at, cancelled_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Maps serialization failures, deadlocks and unique violations to
/// [`StoreError::Contention`]; everything else is a backend failure.
fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err
        && let Some(code) = db_err.code()
        && matches!(code.as_ref(), "40001" | "40P01" | "23505")
    {
        return StoreError::Contention;
    }
    StoreError::Backend(err.to_string())
}

fn into_reservations(rows: Vec<ReservationRow>) -> Result<Vec<Reservation>, StoreError> {
    rows.into_iter().map(Reservation::try_from).collect()
}

struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

impl fmt::Debug for PgTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgTransaction").finish_non_exhaustive()
    }
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn active_reservations(
        &mut self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE user_id = $1 AND status = 'active'"
        ))
        .bind(user_id.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        into_reservations(rows)
    }

    async fn reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        row.map(Reservation::try_from).transpose()
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO reservations ({RESERVATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(*reservation.id.as_uuid())
        .bind(reservation.user_id.as_str())
        .bind(Json(&reservation.parking))
        .bind(reservation.license_plate.as_str())
        .bind(reservation.arrival_date)
        .bind(reservation.arrival)
        .bind(reservation.departure_date)
        .bind(reservation.departure)
        .bind(reservation.full_start_time)
        .bind(reservation.full_end_time)
        .bind(reservation.status.as_str())
        .bind(reservation.created_at)
        .bind(reservation.cancelled_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn mark_cancelled(
        &mut self,
        id: ReservationId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'cancelled', cancelled_at = $2 WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .bind(at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!("reservation {id} not found")));
        }
        Ok(())
    }

    async fn adjust_stock(
        &mut self,
        parking_id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE parking_stock \
             SET available_places = available_places + $2, last_updated = $3 \
             WHERE parking_id = $1 RETURNING available_places",
        )
        .bind(parking_id)
        .bind(delta)
        .bind(at)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_stock(&mut self, stock: &ParkingStock) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO parking_stock (parking_id, available_places, source, last_updated) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&stock.parking_id)
        .bind(stock.available_places)
        .bind(stock.source.as_str())
        .bind(stock.last_updated)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(map_sqlx)
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(Reservation::try_from).transpose()
    }

    async fn reservations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        into_reservations(rows)
    }

    async fn stock(&self, parking_id: &str) -> Result<Option<ParkingStock>, StoreError> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT parking_id, available_places, source, last_updated \
             FROM parking_stock WHERE parking_id = $1",
        )
        .bind(parking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.map(ParkingStock::try_from).transpose()
    }

    async fn stocks(&self, parking_ids: &[String]) -> Result<Vec<ParkingStock>, StoreError> {
        if parking_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT parking_id, available_places, source, last_updated \
             FROM parking_stock WHERE parking_id = ANY($1)",
        )
        .bind(parking_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter().map(ParkingStock::try_from).collect()
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO favorites (id, user_id, parking, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(favorite.id)
        .bind(favorite.user_id.as_str())
        .bind(Json(&favorite.parking))
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn favorite(&self, id: uuid::Uuid) -> Result<Option<Favorite>, StoreError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            "SELECT id, user_id, parking, created_at FROM favorites WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row.map(Favorite::from))
    }

    async fn favorites_for_user(&self, user_id: &UserId) -> Result<Vec<Favorite>, StoreError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            "SELECT id, user_id, parking, created_at FROM favorites \
             WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    async fn delete_favorite(&self, id: uuid::Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO history (id, user_id, parking, searched_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.id)
        .bind(entry.user_id.as_str())
        .bind(Json(&entry.parking))
        .bind(entry.searched_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, user_id, parking, searched_at FROM history \
             WHERE user_id = $1 ORDER BY searched_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn touch_history(&self, id: uuid::Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE history SET searched_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
