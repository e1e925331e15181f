//! Favorites and history DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Favorite, HistoryEntry};
use crate::service::FavoriteToggle;

/// Response body for `GET /favorites`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteListResponse {
    /// Number of favorites.
    pub count: usize,
    /// Favorites, newest first.
    pub data: Vec<Favorite>,
}

/// Response body for `POST /favorites/toggle`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteToggleResponse {
    /// Whether the parking is a favorite after the call.
    pub favorited: bool,
    /// The new bookmark, when one was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorite>,
    /// Id of the bookmark that was removed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_id: Option<uuid::Uuid>,
}

impl From<FavoriteToggle> for FavoriteToggleResponse {
    fn from(toggle: FavoriteToggle) -> Self {
        match toggle {
            FavoriteToggle::Added(favorite) => Self {
                favorited: true,
                favorite: Some(favorite),
                removed_id: None,
            },
            FavoriteToggle::Removed(id) => Self {
                favorited: false,
                favorite: None,
                removed_id: Some(id),
            },
        }
    }
}

/// Response body for `GET /history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryListResponse {
    /// Number of entries.
    pub count: usize,
    /// Entries, most recent visit first.
    pub data: Vec<HistoryEntry>,
}
