//! Per-user library: favorite parkings and consultation history.

use std::sync::Arc;

use crate::domain::{
    Clock, EventBus, Favorite, HistoryEntry, Parking, ParkingEvent, ParkingSnapshot, UserId,
};
use crate::error::GatewayError;
use crate::persistence::DocumentStore;

/// Result of [`LibraryService::toggle_favorite`].
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteToggle {
    /// The parking was bookmarked.
    Added(Favorite),
    /// The existing bookmark was removed.
    Removed(uuid::Uuid),
}

impl FavoriteToggle {
    /// Returns `true` when the parking is a favorite after the toggle.
    #[must_use]
    pub const fn is_favorite(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Favorites and history orchestration.
#[derive(Debug, Clone)]
pub struct LibraryService {
    store: Arc<dyn DocumentStore>,
    event_bus: EventBus,
    clock: Arc<dyn Clock>,
}

impl LibraryService {
    /// Creates a new `LibraryService`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, event_bus: EventBus, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            event_bus,
            clock,
        }
    }

    /// Bookmarks `parking`. Adding a parking that is already a favorite
    /// returns the existing bookmark.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] or
    /// [`GatewayError::RemoteWrite`] on store failures.
    pub async fn add_favorite(
        &self,
        user_id: &UserId,
        parking: &Parking,
    ) -> Result<Favorite, GatewayError> {
        if let Some(existing) = self.find_favorite(user_id, &parking.id).await? {
            return Ok(existing);
        }

        let now = self.clock.now();
        let favorite = Favorite {
            id: uuid::Uuid::new_v4(),
            user_id: user_id.clone(),
            parking: ParkingSnapshot::from(parking),
            created_at: now,
        };
        self.store.insert_favorite(&favorite).await?;

        let _ = self.event_bus.publish(ParkingEvent::FavoriteAdded {
            parking_id: parking.id.clone(),
            user_id: user_id.clone(),
            timestamp: now,
        });
        tracing::info!(favorite_id = %favorite.id, parking_id = %parking.id, "favorite added");
        Ok(favorite)
    }

    /// Returns the user's favorites, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the store is unreachable.
    pub async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<Favorite>, GatewayError> {
        self.store
            .favorites_for_user(user_id)
            .await
            .map_err(GatewayError::from_read)
    }

    /// Deletes one of the caller's favorites.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::FavoriteNotFound`] for an unknown id and
    /// [`GatewayError::Forbidden`] when another user owns it.
    pub async fn remove_favorite(
        &self,
        user_id: &UserId,
        id: uuid::Uuid,
    ) -> Result<(), GatewayError> {
        let favorite = self
            .store
            .favorite(id)
            .await
            .map_err(GatewayError::from_read)?
            .ok_or(GatewayError::FavoriteNotFound(id))?;
        if favorite.user_id != *user_id {
            return Err(GatewayError::Forbidden);
        }
        self.delete(favorite).await
    }

    /// Removes `parking` from the favorites when present, adds it
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] or
    /// [`GatewayError::RemoteWrite`] on store failures.
    pub async fn toggle_favorite(
        &self,
        user_id: &UserId,
        parking: &Parking,
    ) -> Result<FavoriteToggle, GatewayError> {
        match self.find_favorite(user_id, &parking.id).await? {
            Some(existing) => {
                let id = existing.id;
                self.delete(existing).await?;
                Ok(FavoriteToggle::Removed(id))
            }
            None => self.add_favorite(user_id, parking).await.map(FavoriteToggle::Added),
        }
    }

    async fn find_favorite(
        &self,
        user_id: &UserId,
        parking_id: &str,
    ) -> Result<Option<Favorite>, GatewayError> {
        Ok(self
            .list_favorites(user_id)
            .await?
            .into_iter()
            .find(|f| f.parking.id == parking_id))
    }

    async fn delete(&self, favorite: Favorite) -> Result<(), GatewayError> {
        if !self.store.delete_favorite(favorite.id).await? {
            return Err(GatewayError::FavoriteNotFound(favorite.id));
        }
        let _ = self.event_bus.publish(ParkingEvent::FavoriteRemoved {
            parking_id: favorite.parking.id.clone(),
            user_id: favorite.user_id,
            timestamp: self.clock.now(),
        });
        tracing::info!(favorite_id = %favorite.id, parking_id = %favorite.parking.id, "favorite removed");
        Ok(())
    }

    /// Records that the user looked at `parking`.
    ///
    /// A parking already in the history only gets its `searched_at`
    /// bumped; otherwise a new entry is created.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] or
    /// [`GatewayError::RemoteWrite`] on store failures.
    pub async fn record_visit(
        &self,
        user_id: &UserId,
        parking: &Parking,
    ) -> Result<HistoryEntry, GatewayError> {
        let now = self.clock.now();
        let existing = self
            .list_history(user_id)
            .await?
            .into_iter()
            .find(|h| h.parking.id == parking.id);

        let mut touched = None;
        if let Some(mut entry) = existing
            && self.store.touch_history(entry.id, now).await?
        {
            entry.searched_at = now;
            touched = Some(entry);
        }

        let entry = match touched {
            Some(entry) => entry,
            None => {
                let entry = HistoryEntry {
                    id: uuid::Uuid::new_v4(),
                    user_id: user_id.clone(),
                    parking: ParkingSnapshot::from(parking),
                    searched_at: now,
                };
                self.store.insert_history(&entry).await?;
                entry
            }
        };

        let _ = self.event_bus.publish(ParkingEvent::HistoryRecorded {
            parking_id: parking.id.clone(),
            user_id: user_id.clone(),
            timestamp: now,
        });
        tracing::debug!(history_id = %entry.id, parking_id = %parking.id, "visit recorded");
        Ok(entry)
    }

    /// Returns the user's history, most recent visit first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the store is unreachable.
    pub async fn list_history(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, GatewayError> {
        self.store
            .history_for_user(user_id)
            .await
            .map_err(GatewayError::from_read)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::{City, FixedClock, ParkingStatus, Position};
    use crate::persistence::MemoryStore;

    fn parking(id: &str) -> Parking {
        Parking {
            id: id.to_string(),
            name: format!("Parking {id}"),
            city: City::Toulouse,
            position: Position::new(43.6, 1.44),
            address: None,
            available_places: Some(20),
            total_capacity: Some(40),
            status: ParkingStatus::Open,
        }
    }

    fn service_at(store: Arc<MemoryStore>, minutes: i64) -> LibraryService {
        let Some(base) = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single() else {
            panic!("valid instant");
        };
        LibraryService::new(
            store,
            EventBus::new(16),
            Arc::new(FixedClock(base + Duration::minutes(minutes))),
        )
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_at(store, 0);
        let user = UserId::new("u1");

        let Ok(first) = svc.toggle_favorite(&user, &parking("p1")).await else {
            panic!("toggle should succeed");
        };
        assert!(first.is_favorite());

        let Ok(second) = svc.toggle_favorite(&user, &parking("p1")).await else {
            panic!("toggle should succeed");
        };
        assert!(!second.is_favorite());

        let Ok(list) = svc.list_favorites(&user).await else {
            panic!("listing should succeed");
        };
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn adding_twice_keeps_one_favorite() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_at(store, 0);
        let user = UserId::new("u1");

        let Ok(a) = svc.add_favorite(&user, &parking("p1")).await else {
            panic!("add should succeed");
        };
        let Ok(b) = svc.add_favorite(&user, &parking("p1")).await else {
            panic!("add should succeed");
        };
        assert_eq!(a.id, b.id);
        let Ok(list) = svc.list_favorites(&user).await else {
            panic!("listing should succeed");
        };
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn only_the_owner_removes_a_favorite() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_at(store, 0);
        let owner = UserId::new("owner");

        let Ok(fav) = svc.add_favorite(&owner, &parking("p1")).await else {
            panic!("add should succeed");
        };
        let denied = svc.remove_favorite(&UserId::new("intruder"), fav.id).await;
        assert!(matches!(denied, Err(GatewayError::Forbidden)));
        assert!(svc.remove_favorite(&owner, fav.id).await.is_ok());

        let gone = svc.remove_favorite(&owner, fav.id).await;
        assert!(matches!(gone, Err(GatewayError::FavoriteNotFound(_))));
    }

    #[tokio::test]
    async fn revisits_bump_the_existing_history_entry() {
        let store = Arc::new(MemoryStore::new());
        let user = UserId::new("u1");

        let Ok(first) = service_at(store.clone(), 0).record_visit(&user, &parking("p1")).await
        else {
            panic!("visit should be recorded");
        };
        let Ok(_) = service_at(store.clone(), 5).record_visit(&user, &parking("p2")).await else {
            panic!("visit should be recorded");
        };
        let later = service_at(store.clone(), 10);
        let Ok(again) = later.record_visit(&user, &parking("p1")).await else {
            panic!("visit should be recorded");
        };
        assert_eq!(again.id, first.id);
        assert!(again.searched_at > first.searched_at);

        let Ok(history) = later.list_history(&user).await else {
            panic!("listing should succeed");
        };
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].parking.id, "p1");
        assert_eq!(history[1].parking.id, "p2");
    }
}
