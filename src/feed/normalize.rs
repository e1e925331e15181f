//! Per-city mapping of raw open-data payloads onto [`Parking`].
//!
//! The three feeds share nothing but a top-level `results` array. Field
//! names, nesting and the meaning of "available" differ per city, so each
//! has its own mapper. Mapping is total: a record with odd or missing
//! fields still yields a [`Parking`], and a payload without `results`
//! yields an empty list.

use serde_json::Value;

use crate::domain::{City, Parking, ParkingStatus, Position};

/// Postal suffix appended to every Strasbourg address.
const STRASBOURG_POSTAL_SUFFIX: &str = "67000 Strasbourg";

/// Maps a raw feed payload for `city` onto canonical parking records.
///
/// Output order and length follow the payload's `results` array.
#[must_use]
pub fn normalize(city: City, payload: &Value) -> Vec<Parking> {
    let Some(records) = payload.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| match city {
            City::Paris => map_paris(index, record),
            City::Strasbourg => map_strasbourg(index, record),
            City::Toulouse => map_toulouse(index, record),
        })
        .collect()
}

fn map_paris(index: usize, r: &Value) -> Parking {
    let id = field(r, "id_old")
        .and_then(as_text)
        .unwrap_or_else(|| format!("paris-{index}"));

    let label = field(r, "locsta").and_then(as_text).unwrap_or_default();
    let name = format!("Stationnement {label}").trim().to_string();

    let address = join_truthy(&[field(r, "numvoie"), field(r, "typevoie"), field(r, "nomvoie")]);

    let total_capacity = field(r, "placal").and_then(as_integer);
    let status = match total_capacity {
        Some(capacity) if capacity > 0 => ParkingStatus::Open,
        _ => ParkingStatus::Unknown,
    };

    Parking {
        id,
        name,
        city: City::Paris,
        position: nested_position(r, "geo_point_2d", "lat", "lon"),
        address: (!address.is_empty()).then_some(address),
        available_places: field(r, "plarel").and_then(as_integer),
        total_capacity,
        status,
    }
}

fn map_strasbourg(index: usize, r: &Value) -> Parking {
    let id = field(r, "ident")
        .and_then(as_text)
        .unwrap_or_else(|| format!("strasbourg-{index}"));
    let name = field(r, "nom_parking").and_then(as_text).unwrap_or_default();

    let suffix = Value::String(STRASBOURG_POSTAL_SUFFIX.to_string());
    let address = join_truthy(&[field(r, "idsurfs"), field(r, "nom_parking"), Some(&suffix)]);

    let open = field(r, "etat_descriptif")
        .and_then(Value::as_str)
        .is_some_and(|state| state.to_lowercase() == "ouvert");

    Parking {
        id,
        name,
        city: City::Strasbourg,
        position: nested_position(r, "position", "lat", "lon"),
        address: Some(address),
        available_places: field(r, "libre").and_then(as_integer),
        total_capacity: field(r, "total").and_then(as_integer),
        status: if open {
            ParkingStatus::Open
        } else {
            ParkingStatus::Closed
        },
    }
}

fn map_toulouse(index: usize, r: &Value) -> Parking {
    let id = field(r, "id")
        .and_then(as_text)
        .unwrap_or_else(|| format!("toulouse-{index}"));
    let name = field(r, "nom").and_then(as_text).unwrap_or_default();

    let geo = nested_position(r, "geo_point_2d", "lat", "lon");
    let position = Position {
        lat: geo.lat.or_else(|| field(r, "ylat").and_then(as_float)),
        lon: geo.lon.or_else(|| field(r, "xlong").and_then(as_float)),
    };

    let places = field(r, "nb_places").and_then(as_integer);
    let vehicles = field(r, "nb_voitures").and_then(as_integer);
    let available_places = match (places, vehicles) {
        (Some(p), Some(v)) if p != 0 && v != 0 => p.checked_sub(v),
        _ => None,
    };

    Parking {
        id,
        name,
        city: City::Toulouse,
        position,
        address: field(r, "adresse").and_then(as_text),
        available_places,
        total_capacity: places,
        status: ParkingStatus::Unknown,
    }
}

/// Returns a field unless it is missing or JSON `null`.
fn field<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn nested_position(record: &Value, key: &str, lat: &str, lon: &str) -> Position {
    let point = field(record, key);
    Position {
        lat: point.and_then(|p| field(p, lat)).and_then(as_float),
        lon: point.and_then(|p| field(p, lon)).and_then(as_float),
    }
}

/// Renders scalars as text; objects and arrays have no text form.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a whole number from a JSON number or a numeric string.
#[allow(clippy::cast_possible_truncation)]
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Space-joins the truthy parts, skipping the rest.
fn join_truthy(parts: &[Option<&Value>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|v| is_truthy(v))
        .filter_map(|v| as_text(v))
        .collect::<Vec<_>>()
        .join(" ")
}
