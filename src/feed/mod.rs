//! Upstream feeds: fetching, normalization, stock overlay and geocoding.
//!
//! [`normalize`] and [`apply_stock_overrides`] are pure. [`FeedClient`]
//! and [`GeocodingClient`] are thin `reqwest` wrappers around the external
//! HTTP APIs.

pub mod client;
pub mod geocoding;
pub mod merge;
pub mod normalize;

pub use client::{FeedClient, FeedEndpoints};
pub use geocoding::{AddressSuggestion, GeocodingClient};
pub use merge::apply_stock_overrides;
pub use normalize::normalize;
