//! In-memory document store.
//!
//! All collections live behind one [`tokio::sync::Mutex`]. A transaction
//! holds the lock for its whole lifetime and works on a private copy that
//! replaces the shared state on commit, so transactions are serialised and
//! a dropped transaction leaves no trace.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{DocumentStore, StoreError, StoreTransaction};
use crate::domain::{
    Favorite, HistoryEntry, ParkingStock, Reservation, ReservationId, ReservationStatus, UserId,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    reservations: HashMap<ReservationId, Reservation>,
    stocks: HashMap<String, ParkingStock>,
    favorites: HashMap<uuid::Uuid, Favorite>,
    history: HashMap<uuid::Uuid, HistoryEntry>,
}

/// Process-local [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored reservations, whatever their status.
    pub async fn reservation_count(&self) -> usize {
        self.state.lock().await.reservations.len()
    }
}

#[derive(Debug)]
struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn active_reservations(
        &mut self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .working
            .reservations
            .values()
            .filter(|r| &r.user_id == user_id && r.status == ReservationStatus::Active)
            .cloned()
            .collect())
    }

    async fn reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        Ok(self.working.reservations.get(&id).cloned())
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        if self.working.reservations.contains_key(&reservation.id) {
            return Err(StoreError::Backend(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }
        self.working
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn mark_cancelled(
        &mut self,
        id: ReservationId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let reservation = self
            .working
            .reservations
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("reservation {id} not found")))?;
        reservation.status = ReservationStatus::Cancelled;
        reservation.cancelled_at = Some(at);
        Ok(())
    }

    async fn adjust_stock(
        &mut self,
        parking_id: &str,
        delta: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        Ok(self.working.stocks.get_mut(parking_id).map(|stock| {
            stock.available_places = stock.available_places.saturating_add(delta);
            stock.last_updated = at;
            stock.available_places
        }))
    }

    async fn insert_stock(&mut self, stock: &ParkingStock) -> Result<(), StoreError> {
        if self.working.stocks.contains_key(&stock.parking_id) {
            return Err(StoreError::Contention);
        }
        self.working
            .stocks
            .insert(stock.parking_id.clone(), stock.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }

    async fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        Ok(self.state.lock().await.reservations.get(&id).cloned())
    }

    async fn reservations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, StoreError> {
        let state = self.state.lock().await;
        let mut list: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn stock(&self, parking_id: &str) -> Result<Option<ParkingStock>, StoreError> {
        Ok(self.state.lock().await.stocks.get(parking_id).cloned())
    }

    async fn stocks(&self, parking_ids: &[String]) -> Result<Vec<ParkingStock>, StoreError> {
        let state = self.state.lock().await;
        Ok(parking_ids
            .iter()
            .filter_map(|id| state.stocks.get(id).cloned())
            .collect())
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .favorites
            .insert(favorite.id, favorite.clone());
        Ok(())
    }

    async fn favorite(&self, id: uuid::Uuid) -> Result<Option<Favorite>, StoreError> {
        Ok(self.state.lock().await.favorites.get(&id).cloned())
    }

    async fn favorites_for_user(&self, user_id: &UserId) -> Result<Vec<Favorite>, StoreError> {
        let state = self.state.lock().await;
        let mut list: Vec<Favorite> = state
            .favorites
            .values()
            .filter(|f| &f.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn delete_favorite(&self, id: uuid::Uuid) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.favorites.remove(&id).is_some())
    }

    async fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .history
            .insert(entry.id, entry.clone());
        Ok(())
    }

    async fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, StoreError> {
        let state = self.state.lock().await;
        let mut list: Vec<HistoryEntry> = state
            .history
            .values()
            .filter(|h| &h.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.searched_at.cmp(&a.searched_at));
        Ok(list)
    }

    async fn touch_history(&self, id: uuid::Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state
            .history
            .get_mut(&id)
            .map(|entry| entry.searched_at = at)
            .is_some())
    }
}
