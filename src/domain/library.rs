//! Per-user favorites and consultation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ParkingSnapshot, UserId};

/// A parking the user bookmarked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    /// Favorite identifier.
    pub id: uuid::Uuid,
    /// Owner.
    pub user_id: UserId,
    /// Parking as it was when bookmarked.
    pub parking: ParkingSnapshot,
    /// Bookmark time.
    pub created_at: DateTime<Utc>,
}

/// A parking the user looked at on the map.
///
/// One entry per user and parking id; revisits only bump `searched_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owner.
    pub user_id: UserId,
    /// Parking as it was when first visited.
    pub parking: ParkingSnapshot,
    /// Most recent visit.
    pub searched_at: DateTime<Utc>,
}
