//! Service layer: business logic orchestration.
//!
//! [`ReservationService`] owns booking and cancellation, [`ParkingService`]
//! serves the feed-backed parking search, and [`LibraryService`] keeps
//! favorites and history. Mutations are announced through the
//! [`super::domain::EventBus`].

pub mod library_service;
pub mod parking_service;
pub mod reservation_service;

pub use library_service::{FavoriteToggle, LibraryService};
pub use parking_service::ParkingService;
pub use reservation_service::{CancelPolicy, Cancellation, ReservationService};
