//! # parkfinder-gateway
//!
//! REST API and WebSocket gateway for finding and booking parkings in
//! Paris, Strasbourg and Toulouse.
//!
//! Parking data comes live from each city's open-data feed and is
//! normalized into one [`domain::Parking`] shape. Bookings, per-parking
//! stock counters, favorites and history live in a document store
//! behind [`persistence::DocumentStore`].
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ParkingService / ReservationService / LibraryService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Feed client, normalizer, geocoder (feed/)
//!     │
//!     └── Document store: PostgreSQL or in-memory (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod persistence;
pub mod service;
pub mod ws;
