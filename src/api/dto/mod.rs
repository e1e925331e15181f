//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types that already carry `serde` and `utoipa` derives are
//! returned as-is; the types here wrap them into list envelopes or shape
//! request bodies.

pub mod common_dto;
pub mod geocode_dto;
pub mod library_dto;
pub mod parking_dto;
pub mod reservation_dto;

pub use common_dto::*;
pub use geocode_dto::*;
pub use library_dto::*;
pub use parking_dto::*;
pub use reservation_dto::*;
