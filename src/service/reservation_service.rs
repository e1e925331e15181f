//! Reservation service: booking, cancellation and per-user listings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::validation::{ValidatedBooking, validate};
use crate::domain::{
    Clock, EventBus, Parking, ParkingEvent, ParkingSnapshot, ParkingStock, Reservation,
    ReservationForm, ReservationId, ReservationStatus, UserId,
};
use crate::error::GatewayError;
use crate::persistence::DocumentStore;

/// What cancelling a reservation does to the parking's stock counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// The counter is left untouched.
    #[default]
    KeepStock,
    /// The counter gets its place back (`+1`).
    RestoreStock,
}

/// Outcome of a committed cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cancellation {
    /// Reservation as stored after the cancellation.
    pub reservation: Reservation,
    /// New stock counter value, when the policy restored a place.
    pub restored_stock: Option<i64>,
}

/// Booking orchestration over the document store.
///
/// Every booking runs the conflict check, the reservation insert and the
/// stock decrement inside one store transaction. A transaction aborted by
/// a concurrent writer is retried from scratch, up to `max_attempts`
/// times in total.
///
/// Form dates and times are wall-clock values in `timezone`.
#[derive(Debug, Clone)]
pub struct ReservationService {
    store: Arc<dyn DocumentStore>,
    event_bus: EventBus,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    cancel_policy: CancelPolicy,
    max_attempts: u32,
}

impl ReservationService {
    /// Creates a new `ReservationService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        event_bus: EventBus,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        cancel_policy: CancelPolicy,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            event_bus,
            clock,
            timezone,
            cancel_policy,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns the configured cancellation policy.
    #[must_use]
    pub const fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    /// Books `parking` for `user_id` from the submitted form.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] when the form is rejected; nothing
    ///   is written.
    /// - [`GatewayError::Conflict`] when the same plate already holds an
    ///   active booking over an overlapping period; nothing is written.
    /// - [`GatewayError::Contention`] when every attempt lost a race.
    /// - [`GatewayError::RemoteWrite`] on any other store failure.
    pub async fn create_reservation(
        &self,
        user_id: &UserId,
        parking: &Parking,
        form: &ReservationForm,
    ) -> Result<Reservation, GatewayError> {
        let now = self.clock.now();
        let booking = validate(form, now.with_timezone(&self.timezone).naive_local())?;
        let snapshot = ParkingSnapshot::from(parking);

        let mut attempt = 1;
        let (reservation, stock_after) = loop {
            match self.try_create(user_id, &snapshot, &booking, now).await {
                Err(GatewayError::Contention) if attempt < self.max_attempts => {
                    tracing::warn!(user_id = %user_id, parking_id = %snapshot.id, attempt, "booking contended, retrying");
                    attempt += 1;
                }
                other => break other?,
            }
        };

        let _ = self.event_bus.publish(ParkingEvent::ReservationCreated {
            parking_id: snapshot.id.clone(),
            reservation_id: reservation.id,
            user_id: user_id.clone(),
            starts_at: reservation.full_start_time,
            ends_at: reservation.full_end_time,
            timestamp: now,
        });
        let _ = self.event_bus.publish(ParkingEvent::StockChanged {
            parking_id: snapshot.id.clone(),
            available_places: stock_after,
            timestamp: now,
        });

        tracing::info!(
            reservation_id = %reservation.id,
            parking_id = %snapshot.id,
            plate = %reservation.license_plate,
            available_places = stock_after,
            "reservation created"
        );
        Ok(reservation)
    }

    async fn try_create(
        &self,
        user_id: &UserId,
        snapshot: &ParkingSnapshot,
        booking: &ValidatedBooking,
        now: DateTime<Utc>,
    ) -> Result<(Reservation, i64), GatewayError> {
        let mut tx = self.store.begin().await?;

        let active = tx.active_reservations(user_id).await?;
        if let Some(existing) = active
            .iter()
            .find(|r| r.license_plate == booking.plate && r.time_range().overlaps(&booking.range))
        {
            return Err(GatewayError::Conflict {
                plate: booking.plate.to_string(),
                existing: existing.id,
            });
        }

        let reservation = Reservation {
            id: ReservationId::new(),
            user_id: user_id.clone(),
            parking: snapshot.clone(),
            license_plate: booking.plate.clone(),
            arrival_date: booking.arrival_date,
            arrival: booking.arrival,
            departure_date: booking.departure_date,
            departure: booking.departure,
            full_start_time: booking.range.start,
            full_end_time: booking.range.end,
            status: ReservationStatus::Active,
            created_at: now,
            cancelled_at: None,
        };
        tx.insert_reservation(&reservation).await?;

        let stock_after = match tx.adjust_stock(&snapshot.id, -1, now).await? {
            Some(available) => available,
            None => {
                let seeded = ParkingStock::seed_from(snapshot, now);
                tx.insert_stock(&seeded).await?;
                seeded.available_places
            }
        };

        tx.commit().await?;
        Ok((reservation, stock_after))
    }

    /// Cancels one of the caller's reservations.
    ///
    /// The reservation is kept with status `cancelled`. The stock counter
    /// is adjusted according to the configured [`CancelPolicy`] in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ReservationNotFound`] for an unknown id.
    /// - [`GatewayError::Forbidden`] when another user owns it.
    /// - [`GatewayError::AlreadyCancelled`] when it was cancelled before.
    /// - [`GatewayError::Contention`] / [`GatewayError::RemoteWrite`] on
    ///   store failures.
    pub async fn cancel_reservation(
        &self,
        user_id: &UserId,
        id: ReservationId,
    ) -> Result<Cancellation, GatewayError> {
        let now = self.clock.now();

        let mut attempt = 1;
        let cancellation = loop {
            match self.try_cancel(user_id, id, now).await {
                Err(GatewayError::Contention) if attempt < self.max_attempts => {
                    tracing::warn!(reservation_id = %id, attempt, "cancellation contended, retrying");
                    attempt += 1;
                }
                other => break other?,
            }
        };

        let parking_id = cancellation.reservation.parking.id.clone();
        let _ = self.event_bus.publish(ParkingEvent::ReservationCancelled {
            parking_id: parking_id.clone(),
            reservation_id: id,
            stock_restored: cancellation.restored_stock.is_some(),
            timestamp: now,
        });
        if let Some(available_places) = cancellation.restored_stock {
            let _ = self.event_bus.publish(ParkingEvent::StockChanged {
                parking_id: parking_id.clone(),
                available_places,
                timestamp: now,
            });
        }

        tracing::info!(reservation_id = %id, %parking_id, policy = ?self.cancel_policy, "reservation cancelled");
        Ok(cancellation)
    }

    async fn try_cancel(
        &self,
        user_id: &UserId,
        id: ReservationId,
        now: DateTime<Utc>,
    ) -> Result<Cancellation, GatewayError> {
        let mut tx = self.store.begin().await?;

        let Some(mut reservation) = tx.reservation(id).await? else {
            return Err(GatewayError::ReservationNotFound(id));
        };
        if reservation.user_id != *user_id {
            return Err(GatewayError::Forbidden);
        }
        if !reservation.is_active() {
            return Err(GatewayError::AlreadyCancelled(id));
        }

        tx.mark_cancelled(id, now).await?;
        let restored_stock = match self.cancel_policy {
            CancelPolicy::KeepStock => None,
            CancelPolicy::RestoreStock => tx.adjust_stock(&reservation.parking.id, 1, now).await?,
        };
        tx.commit().await?;

        reservation.status = ReservationStatus::Cancelled;
        reservation.cancelled_at = Some(now);
        Ok(Cancellation {
            reservation,
            restored_stock,
        })
    }

    /// Returns every reservation of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteRead`] when the store is unreachable.
    pub async fn list_reservations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Reservation>, GatewayError> {
        self.store
            .reservations_for_user(user_id)
            .await
            .map_err(GatewayError::from_read)
    }

    /// Returns one of the caller's reservations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ReservationNotFound`] for an unknown id and
    /// [`GatewayError::Forbidden`] when another user owns it.
    pub async fn get_reservation(
        &self,
        user_id: &UserId,
        id: ReservationId,
    ) -> Result<Reservation, GatewayError> {
        let reservation = self
            .store
            .reservation(id)
            .await
            .map_err(GatewayError::from_read)?
            .ok_or(GatewayError::ReservationNotFound(id))?;
        if reservation.user_id != *user_id {
            return Err(GatewayError::Forbidden);
        }
        Ok(reservation)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{City, Favorite, FixedClock, HistoryEntry, ParkingStatus, Position};
    use crate::persistence::{MemoryStore, StoreError, StoreTransaction};

    fn now() -> DateTime<Utc> {
        let Some(at) = Utc.with_ymd_and_hms(2024, 1, 19, 8, 0, 0).single() else {
            panic!("valid instant");
        };
        at
    }

    fn parking(id: &str, available: Option<i64>) -> Parking {
        Parking {
            id: id.to_string(),
            name: "Parking Kléber".to_string(),
            city: City::Strasbourg,
            position: Position::new(48.58, 7.74),
            address: Some("Place Kléber".to_string()),
            available_places: available,
            total_capacity: Some(120),
            status: ParkingStatus::Open,
        }
    }

    fn form(arrival: &str, departure: &str, plate: &str) -> ReservationForm {
        let (ad, at) = arrival.split_once(' ').unwrap_or_default();
        let (dd, dt) = departure.split_once(' ').unwrap_or_default();
        ReservationForm {
            arrival_date: ad.to_string(),
            arrival: at.to_string(),
            departure_date: dd.to_string(),
            departure: dt.to_string(),
            plate: plate.to_string(),
        }
    }

    fn service_with(store: Arc<dyn DocumentStore>, policy: CancelPolicy) -> ReservationService {
        service_in(store, Tz::Europe__Paris, policy)
    }

    fn service_in(store: Arc<dyn DocumentStore>, tz: Tz, policy: CancelPolicy) -> ReservationService {
        ReservationService::new(
            store,
            EventBus::new(64),
            Arc::new(FixedClock(now())),
            tz,
            policy,
            3,
        )
    }

    fn user() -> UserId {
        UserId::new("user-1")
    }

    #[tokio::test]
    async fn first_booking_seeds_stock_from_feed() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);

        let result = svc
            .create_reservation(
                &user(),
                &parking("p1", Some(10)),
                &form("2024-01-20 10:00", "2024-01-20 12:00", "ab-123-cd"),
            )
            .await;
        let Ok(reservation) = result else {
            panic!("booking should succeed");
        };
        assert_eq!(reservation.license_plate.as_str(), "AB-123-CD");
        assert_eq!(reservation.status, ReservationStatus::Active);

        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, 9);
    }

    #[tokio::test]
    async fn later_bookings_decrement_existing_stock() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", Some(10));

        for (arrival, departure) in [
            ("2024-01-20 10:00", "2024-01-20 12:00"),
            ("2024-01-21 10:00", "2024-01-21 12:00"),
        ] {
            let Ok(_) = svc
                .create_reservation(&user(), &p, &form(arrival, departure, "AB-123-CD"))
                .await
            else {
                panic!("non-overlapping bookings should succeed");
            };
        }

        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, 8);
    }

    #[tokio::test]
    async fn overlapping_booking_for_same_plate_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", Some(10));

        let Ok(first) = svc
            .create_reservation(&user(), &p, &form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD"))
            .await
        else {
            panic!("first booking should succeed");
        };

        let second = svc
            .create_reservation(&user(), &p, &form("2024-01-20 11:00", "2024-01-20 13:00", "ab-123-cd"))
            .await;
        let Err(GatewayError::Conflict { existing, .. }) = second else {
            panic!("expected conflict, got {second:?}");
        };
        assert_eq!(existing, first.id);
        assert_eq!(store.reservation_count().await, 1);

        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, 9);
    }

    #[tokio::test]
    async fn touching_ranges_and_other_plates_do_not_conflict() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", Some(10));

        let bookings = [
            form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD"),
            form("2024-01-20 12:00", "2024-01-20 14:00", "AB-123-CD"),
            form("2024-01-20 10:30", "2024-01-20 11:30", "XY-987-ZT"),
        ];
        for booking in &bookings {
            let result = svc.create_reservation(&user(), &p, booking).await;
            assert!(result.is_ok(), "unexpected failure: {result:?}");
        }
        assert_eq!(store.reservation_count().await, 3);
    }

    #[tokio::test]
    async fn invalid_form_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);

        let cases = [
            form("2024-01-20 10:00", "2024-01-20 12:00", "AB123CD"),
            form("2024-01-18 10:00", "2024-01-18 12:00", "AB-123-CD"),
            form("2024-01-20 12:00", "2024-01-20 12:00", "AB-123-CD"),
            form("2024-01-20 10:00", "2024-01-20 12:00", ""),
        ];
        for case in &cases {
            let result = svc.create_reservation(&user(), &parking("p1", Some(10)), case).await;
            assert!(matches!(result, Err(GatewayError::Validation(_))));
        }
        assert_eq!(store.reservation_count().await, 0);
        assert!(matches!(store.stock("p1").await, Ok(None)));
    }

    #[tokio::test]
    async fn cancelled_bookings_free_the_slot() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", Some(10));
        let booking = form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD");

        let Ok(first) = svc.create_reservation(&user(), &p, &booking).await else {
            panic!("booking should succeed");
        };
        let Ok(cancellation) = svc.cancel_reservation(&user(), first.id).await else {
            panic!("cancel should succeed");
        };
        assert_eq!(cancellation.reservation.status, ReservationStatus::Cancelled);
        assert_eq!(cancellation.reservation.cancelled_at, Some(now()));
        assert_eq!(cancellation.restored_stock, None);

        let rebooked = svc.create_reservation(&user(), &p, &booking).await;
        assert!(rebooked.is_ok());

        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, 8);
    }

    #[tokio::test]
    async fn restore_policy_gives_the_place_back() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::RestoreStock);
        let Ok(reservation) = svc
            .create_reservation(
                &user(),
                &parking("p1", Some(4)),
                &form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD"),
            )
            .await
        else {
            panic!("booking should succeed");
        };

        let mut events = svc.event_bus.subscribe();
        let Ok(cancellation) = svc.cancel_reservation(&user(), reservation.id).await else {
            panic!("cancel should succeed");
        };
        assert_eq!(cancellation.restored_stock, Some(4));

        let Ok(ParkingEvent::ReservationCancelled { stock_restored, .. }) = events.recv().await
        else {
            panic!("expected cancellation event");
        };
        assert!(stock_restored);
        let Ok(ParkingEvent::StockChanged { available_places, .. }) = events.recv().await else {
            panic!("expected stock event");
        };
        assert_eq!(available_places, 4);
    }

    #[tokio::test]
    async fn cancel_checks_owner_and_state() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store, CancelPolicy::KeepStock);
        let Ok(reservation) = svc
            .create_reservation(
                &user(),
                &parking("p1", None),
                &form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD"),
            )
            .await
        else {
            panic!("booking should succeed");
        };

        let stranger = svc
            .cancel_reservation(&UserId::new("someone-else"), reservation.id)
            .await;
        assert!(matches!(stranger, Err(GatewayError::Forbidden)));

        assert!(svc.cancel_reservation(&user(), reservation.id).await.is_ok());
        let again = svc.cancel_reservation(&user(), reservation.id).await;
        assert!(matches!(again, Err(GatewayError::AlreadyCancelled(_))));

        let unknown = svc.cancel_reservation(&user(), ReservationId::new()).await;
        assert!(matches!(unknown, Err(GatewayError::ReservationNotFound(_))));
    }

    #[tokio::test]
    async fn unreported_capacity_seeds_below_zero() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", None);

        for (arrival, departure) in [
            ("2024-01-20 10:00", "2024-01-20 12:00"),
            ("2024-01-22 10:00", "2024-01-22 12:00"),
        ] {
            let result = svc
                .create_reservation(&user(), &p, &form(arrival, departure, "AB-123-CD"))
                .await;
            assert!(result.is_ok());
        }
        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, -2);
    }

    #[tokio::test]
    async fn get_reservation_is_owner_scoped() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store, CancelPolicy::KeepStock);
        let Ok(created) = svc
            .create_reservation(
                &user(),
                &parking("p1", Some(3)),
                &form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD"),
            )
            .await
        else {
            panic!("booking should succeed");
        };

        let Ok(fetched) = svc.get_reservation(&user(), created.id).await else {
            panic!("owner should read the reservation");
        };
        assert_eq!(fetched, created);
        assert!(matches!(
            svc.get_reservation(&UserId::new("other"), created.id).await,
            Err(GatewayError::Forbidden)
        ));

        let Ok(list) = svc.list_reservations(&user()).await else {
            panic!("listing should succeed");
        };
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, created.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_bookings_admit_exactly_one() {
        const ATTEMPTS: usize = 16;
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone(), CancelPolicy::KeepStock);
        let p = parking("p1", Some(10));

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|i| {
                let svc = svc.clone();
                let p = p.clone();
                let departure = format!("2024-01-20 12:{i:02}");
                tokio::spawn(async move {
                    svc.create_reservation(&user(), &p, &form("2024-01-20 10:00", &departure, "AB-123-CD"))
                        .await
                })
            })
            .collect();

        let mut booked = 0;
        let mut conflicts = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("booking task panicked");
            };
            match result {
                Ok(_) => booked += 1,
                Err(GatewayError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(booked, 1);
        assert_eq!(conflicts, ATTEMPTS - 1);

        let Ok(active) = svc.list_reservations(&user()).await else {
            panic!("listing should succeed");
        };
        assert_eq!(active.len(), 1);
        let Ok(Some(stock)) = store.stock("p1").await else {
            panic!("stock record should exist");
        };
        assert_eq!(stock.available_places, 9);
    }

    #[tokio::test]
    async fn form_times_are_read_in_the_booking_timezone() {
        // 08:00 UTC is 09:00 in Paris on the fixed clock's date.
        let early = form("2024-01-19 08:30", "2024-01-19 10:00", "AB-123-CD");

        let paris = service_in(Arc::new(MemoryStore::new()), Tz::Europe__Paris, CancelPolicy::KeepStock);
        let rejected = paris.create_reservation(&user(), &parking("p1", Some(3)), &early).await;
        assert!(matches!(rejected, Err(GatewayError::Validation(_))));

        let Ok(_) = paris
            .create_reservation(
                &user(),
                &parking("p1", Some(3)),
                &form("2024-01-19 09:30", "2024-01-19 11:00", "AB-123-CD"),
            )
            .await
        else {
            panic!("booking after local now should succeed");
        };

        let utc = service_in(Arc::new(MemoryStore::new()), Tz::UTC, CancelPolicy::KeepStock);
        assert!(utc.create_reservation(&user(), &parking("p1", Some(3)), &early).await.is_ok());
    }

    /// Store that aborts the first `failures` transactions.
    #[derive(Debug)]
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicU32,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(StoreError::Contention);
            }
            self.inner.begin().await
        }

        async fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
            self.inner.reservation(id).await
        }

        async fn reservations_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<Reservation>, StoreError> {
            self.inner.reservations_for_user(user_id).await
        }

        async fn stock(&self, parking_id: &str) -> Result<Option<ParkingStock>, StoreError> {
            self.inner.stock(parking_id).await
        }

        async fn stocks(&self, parking_ids: &[String]) -> Result<Vec<ParkingStock>, StoreError> {
            self.inner.stocks(parking_ids).await
        }

        async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), StoreError> {
            self.inner.insert_favorite(favorite).await
        }

        async fn favorite(&self, id: uuid::Uuid) -> Result<Option<Favorite>, StoreError> {
            self.inner.favorite(id).await
        }

        async fn favorites_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<Favorite>, StoreError> {
            self.inner.favorites_for_user(user_id).await
        }

        async fn delete_favorite(&self, id: uuid::Uuid) -> Result<bool, StoreError> {
            self.inner.delete_favorite(id).await
        }

        async fn insert_history(
            &self,
            entry: &HistoryEntry,
        ) -> Result<(), StoreError> {
            self.inner.insert_history(entry).await
        }

        async fn history_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<HistoryEntry>, StoreError> {
            self.inner.history_for_user(user_id).await
        }

        async fn touch_history(&self, id: uuid::Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
            self.inner.touch_history(id, at).await
        }
    }

    #[tokio::test]
    async fn contention_is_retried_up_to_the_limit() {
        let flaky = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            failures: AtomicU32::new(2),
        });
        let svc = service_with(flaky.clone(), CancelPolicy::KeepStock);
        let booking = form("2024-01-20 10:00", "2024-01-20 12:00", "AB-123-CD");

        let result = svc.create_reservation(&user(), &parking("p1", Some(5)), &booking).await;
        assert!(result.is_ok(), "two aborts fit in three attempts");

        flaky.failures.store(3, Ordering::SeqCst);
        let exhausted = svc
            .create_reservation(
                &user(),
                &parking("p1", Some(5)),
                &form("2024-01-21 10:00", "2024-01-21 12:00", "AB-123-CD"),
            )
            .await;
        assert!(matches!(exhausted, Err(GatewayError::Contention)));
        assert_eq!(flaky.inner.reservation_count().await, 1);
    }
}
