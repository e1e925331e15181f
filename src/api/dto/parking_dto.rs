//! Parking search DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{City, Parking};
use crate::error::GatewayError;

/// Query string of `GET /parkings`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParkingListQuery {
    /// `paris`, `strasbourg`, `toulouse`, or `all`. Omitted means all.
    #[serde(default)]
    pub city: Option<String>,
}

impl ParkingListQuery {
    /// Resolves the city filter; `None` selects every city.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidCity`] for an unsupported value.
    pub fn city_filter(&self) -> Result<Option<City>, GatewayError> {
        match self.city.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// Response body of `GET /parkings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParkingListResponse {
    /// Applied filter, `all` when none.
    pub city: String,
    /// Number of parkings returned.
    pub count: usize,
    /// Normalized parkings with local availability applied.
    pub data: Vec<Parking>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn query(city: Option<&str>) -> ParkingListQuery {
        ParkingListQuery {
            city: city.map(str::to_string),
        }
    }

    #[test]
    fn all_and_missing_select_every_city() {
        assert!(matches!(query(None).city_filter(), Ok(None)));
        assert!(matches!(query(Some("ALL")).city_filter(), Ok(None)));
        assert!(matches!(query(Some(" ")).city_filter(), Ok(None)));
    }

    #[test]
    fn known_and_unknown_cities() {
        let Ok(Some(city)) = query(Some("toulouse")).city_filter() else {
            panic!("toulouse is supported");
        };
        assert_eq!(city, City::Toulouse);
        assert!(matches!(
            query(Some("lyon")).city_filter(),
            Err(GatewayError::InvalidCity(_))
        ));
    }
}
