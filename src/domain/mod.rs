//! Domain layer: parking records, reservations, stock and events.
//!
//! Types here carry no I/O. The feed normalizer produces [`Parking`]
//! values, the reservation service turns them into [`ParkingSnapshot`]s
//! inside [`Reservation`]s, and every committed change is announced on
//! the [`EventBus`].

pub mod clock;
pub mod event_bus;
pub mod ids;
pub mod library;
pub mod parking;
pub mod parking_event;
pub mod reservation;
pub mod stock;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use event_bus::EventBus;
pub use ids::{ReservationId, UserId};
pub use library::{Favorite, HistoryEntry};
pub use parking::{City, Parking, ParkingStatus, Position};
pub use parking_event::ParkingEvent;
pub use reservation::{
    LicensePlate, ParkingSnapshot, Reservation, ReservationStatus, TimeRange,
};
pub use stock::{ParkingStock, StockSource};
pub use validation::{ReservationForm, ValidatedBooking, ValidationError};
