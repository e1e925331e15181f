//! WebSocket layer: connection handling, commands, subscriptions.
//!
//! Clients connect to `/ws`, subscribe to parking ids, and receive the
//! matching [`crate::domain::ParkingEvent`]s as they are committed.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
