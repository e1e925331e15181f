//! Overlay of locally tracked stock onto freshly fetched parkings.

use std::collections::HashMap;

use crate::domain::{Parking, ParkingStatus, ParkingStock};

/// Applies local stock records to upstream parkings, matching by id.
///
/// When a record exists, its `available_places` replaces the upstream
/// value and the status becomes [`ParkingStatus::Full`] if it is exactly
/// zero; otherwise the upstream status is kept. Parkings without a local
/// record pass through unchanged.
#[must_use]
pub fn apply_stock_overrides(
    parkings: Vec<Parking>,
    stocks: &HashMap<String, ParkingStock>,
) -> Vec<Parking> {
    parkings
        .into_iter()
        .map(|parking| match stocks.get(&parking.id) {
            Some(stock) => overlay(parking, stock),
            None => parking,
        })
        .collect()
}

fn overlay(mut parking: Parking, stock: &ParkingStock) -> Parking {
    parking.available_places = Some(stock.available_places);
    if stock.available_places == 0 {
        parking.status = ParkingStatus::Full;
    }
    parking
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{City, Position, StockSource};
    use chrono::Utc;

    fn parking(id: &str, available: Option<i64>, status: ParkingStatus) -> Parking {
        Parking {
            id: id.to_string(),
            name: format!("Parking {id}"),
            city: City::Toulouse,
            position: Position::default(),
            address: None,
            available_places: available,
            total_capacity: Some(50),
            status,
        }
    }

    fn stocks(entries: &[(&str, i64)]) -> HashMap<String, ParkingStock> {
        entries
            .iter()
            .map(|(id, available)| {
                (
                    (*id).to_string(),
                    ParkingStock {
                        parking_id: (*id).to_string(),
                        available_places: *available,
                        source: StockSource::ApiImport,
                        last_updated: Utc::now(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn local_availability_wins() {
        let merged = apply_stock_overrides(
            vec![parking("a", Some(30), ParkingStatus::Open)],
            &stocks(&[("a", 12)]),
        );
        assert_eq!(merged[0].available_places, Some(12));
        assert_eq!(merged[0].status, ParkingStatus::Open);
    }

    #[test]
    fn zero_local_stock_marks_full() {
        let merged = apply_stock_overrides(
            vec![parking("a", Some(30), ParkingStatus::Unknown)],
            &stocks(&[("a", 0)]),
        );
        assert_eq!(merged[0].status, ParkingStatus::Full);
        assert_eq!(merged[0].available_places, Some(0));
    }

    #[test]
    fn parkings_without_local_stock_pass_through() {
        let original = parking("b", None, ParkingStatus::Closed);
        let merged = apply_stock_overrides(vec![original.clone()], &stocks(&[("a", 0)]));
        assert_eq!(merged, vec![original]);
    }
}
