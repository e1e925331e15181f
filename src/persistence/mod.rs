//! Persistence layer: the document store boundary.
//!
//! [`DocumentStore`] covers the point reads, per-user queries and simple
//! writes the gateway needs. Booking and cancellation go through a
//! [`StoreTransaction`] so the conflict check, the reservation write and
//! the stock adjustment commit together or not at all.
//!
//! Two backends exist: [`MemoryStore`] for tests and single-node runs, and
//! [`PostgresStore`] on top of `sqlx::PgPool`.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Favorite, HistoryEntry, ParkingStock, Reservation, ReservationId, UserId};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Failure reported by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The transaction lost a race with a concurrent one and was rolled
    /// back. Safe to retry.
    #[error("transaction aborted by a concurrent update")]
    Contention,

    /// Any other backend failure.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Unit of work over reservations and stock.
///
/// Writes become visible only after [`StoreTransaction::commit`]; dropping
/// the transaction discards them.
#[async_trait]
pub trait StoreTransaction: fmt::Debug + Send {
    /// Returns the user's reservations in `active` status.
    async fn active_reservations(
        &mut self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Loads a reservation by id.
    async fn reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError>;

    /// Inserts a new reservation.
    async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError>;

    /// Flags a reservation as cancelled at `at`.
    async fn mark_cancelled(
        &mut self,
        id: ReservationId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Adds `delta` to the stock counter of `parking_id` in place.
    ///
    /// Returns the new counter value, or `None` when no record exists.
    async fn adjust_stock(
        &mut self,
        parking_id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError>;

    /// Inserts a new stock record.
    async fn insert_stock(&mut self, stock: &ParkingStock) -> Result<(), StoreError>;

    /// Makes every write of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// External document store.
#[async_trait]
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// Opens a transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;

    /// Loads a reservation by id.
    async fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;

    /// Returns every reservation of `user_id`, newest first.
    async fn reservations_for_user(&self, user_id: &UserId)
    -> Result<Vec<Reservation>, StoreError>;

    /// Loads the stock record of one parking.
    async fn stock(&self, parking_id: &str) -> Result<Option<ParkingStock>, StoreError>;

    /// Loads the stock records of the given parkings; unknown ids are
    /// skipped.
    async fn stocks(&self, parking_ids: &[String]) -> Result<Vec<ParkingStock>, StoreError>;

    /// Inserts a favorite.
    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), StoreError>;

    /// Loads a favorite by id.
    async fn favorite(&self, id: uuid::Uuid) -> Result<Option<Favorite>, StoreError>;

    /// Returns the user's favorites, newest first.
    async fn favorites_for_user(&self, user_id: &UserId) -> Result<Vec<Favorite>, StoreError>;

    /// Deletes a favorite; returns `false` when it did not exist.
    async fn delete_favorite(&self, id: uuid::Uuid) -> Result<bool, StoreError>;

    /// Inserts a history entry.
    async fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError>;

    /// Returns the user's history, most recent visit first.
    async fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Sets `searched_at` on an existing entry; returns `false` when it
    /// did not exist.
    async fn touch_history(&self, id: uuid::Uuid, at: DateTime<Utc>) -> Result<bool, StoreError>;
}
