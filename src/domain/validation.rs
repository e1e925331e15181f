//! Booking form validation.
//!
//! Checks run fail-fast in a fixed order: required fields, plate format,
//! date/time syntax, arrival not in the past, departure after arrival.
//! Nothing here touches the store, so a rejected form never causes a
//! write.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reservation::{LicensePlate, TimeRange};

/// Raw booking form as entered by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReservationForm {
    /// Arrival day, `YYYY-MM-DD`.
    #[serde(default)]
    pub arrival_date: String,
    /// Arrival time, `HH:MM` or `HH:MM:SS`.
    #[serde(default)]
    pub arrival: String,
    /// Departure day, `YYYY-MM-DD`.
    #[serde(default)]
    pub departure_date: String,
    /// Departure time, `HH:MM` or `HH:MM:SS`.
    #[serde(default)]
    pub departure: String,
    /// Vehicle plate, any case.
    #[serde(default)]
    pub plate: String,
}

/// Reasons a booking form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields are blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Plate does not match `AB-123-CD` after upper-casing.
    #[error("invalid license plate: {0}")]
    InvalidPlate(String),

    /// A date field could not be parsed.
    #[error("invalid date in {field}: {value}")]
    InvalidDate {
        /// Offending form field.
        field: &'static str,
        /// Value as submitted.
        value: String,
    },

    /// A time field could not be parsed.
    #[error("invalid time in {field}: {value}")]
    InvalidTime {
        /// Offending form field.
        field: &'static str,
        /// Value as submitted.
        value: String,
    },

    /// Arrival lies before the current time.
    #[error("arrival {start} is in the past")]
    StartInPast {
        /// Requested arrival.
        start: NaiveDateTime,
    },

    /// Departure is not strictly after arrival.
    #[error("departure {end} must be after arrival {start}")]
    EndNotAfterStart {
        /// Requested arrival.
        start: NaiveDateTime,
        /// Requested departure.
        end: NaiveDateTime,
    },
}

/// Form that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    /// Normalized plate.
    pub plate: LicensePlate,
    /// Arrival day.
    pub arrival_date: NaiveDate,
    /// Arrival time of day.
    pub arrival: NaiveTime,
    /// Departure day.
    pub departure_date: NaiveDate,
    /// Departure time of day.
    pub departure: NaiveTime,
    /// Combined interval.
    pub range: TimeRange,
}

/// Validates `form` against the wall-clock instant `now`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(
    form: &ReservationForm,
    now: NaiveDateTime,
) -> Result<ValidatedBooking, ValidationError> {
    let missing: Vec<&'static str> = [
        ("arrival_date", &form.arrival_date),
        ("arrival", &form.arrival),
        ("departure_date", &form.departure_date),
        ("departure", &form.departure),
        ("plate", &form.plate),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let plate = LicensePlate::parse(&form.plate)?;

    let arrival_date = parse_date("arrival_date", &form.arrival_date)?;
    let arrival = parse_time("arrival", &form.arrival)?;
    let departure_date = parse_date("departure_date", &form.departure_date)?;
    let departure = parse_time("departure", &form.departure)?;

    let start = arrival_date.and_time(arrival);
    let end = departure_date.and_time(departure);

    if start < now {
        return Err(ValidationError::StartInPast { start });
    }
    if end <= start {
        return Err(ValidationError::EndNotAfterStart { start, end });
    }

    Ok(ValidatedBooking {
        plate,
        arrival_date,
        arrival,
        departure_date,
        departure,
        range: TimeRange { start, end },
    })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        let Ok(dt) = NaiveDateTime::parse_from_str("2024-01-19T08:00", "%Y-%m-%dT%H:%M") else {
            panic!("bad fixture");
        };
        dt
    }

    fn form(arrival: &str, departure: &str, plate: &str) -> ReservationForm {
        let (arrival_date, arrival) = arrival.split_once('T').unwrap_or_default();
        let (departure_date, departure) = departure.split_once('T').unwrap_or_default();
        ReservationForm {
            arrival_date: arrival_date.to_string(),
            arrival: arrival.to_string(),
            departure_date: departure_date.to_string(),
            departure: departure.to_string(),
            plate: plate.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_booking() {
        let Ok(booking) = validate(&form("2024-01-20T10:00", "2024-01-20T12:00", "ab-123-cd"), now())
        else {
            panic!("expected valid booking");
        };
        assert_eq!(booking.plate.as_str(), "AB-123-CD");
        assert_eq!(booking.range.start.to_string(), "2024-01-20 10:00:00");
        assert_eq!(booking.range.end.to_string(), "2024-01-20 12:00:00");
    }

    #[test]
    fn lists_every_missing_field() {
        let result = validate(&ReservationForm::default(), now());
        let Err(ValidationError::MissingFields(fields)) = result else {
            panic!("expected missing fields, got {result:?}");
        };
        assert_eq!(
            fields,
            vec!["arrival_date", "arrival", "departure_date", "departure", "plate"]
        );
    }

    #[test]
    fn blank_plate_counts_as_missing() {
        let result = validate(&form("2024-01-20T10:00", "2024-01-20T12:00", "   "), now());
        assert_eq!(result, Err(ValidationError::MissingFields(vec!["plate"])));
    }

    #[test]
    fn plate_is_checked_before_dates() {
        let mut f = form("2024-01-20T10:00", "2024-01-20T12:00", "AB123CD");
        f.arrival_date = "garbage".to_string();
        let result = validate(&f, now());
        assert!(matches!(result, Err(ValidationError::InvalidPlate(_))));
    }

    #[test]
    fn rejects_unparseable_time() {
        let mut f = form("2024-01-20T10:00", "2024-01-20T12:00", "AB-123-CD");
        f.arrival = "25:99".to_string();
        let result = validate(&f, now());
        assert!(matches!(
            result,
            Err(ValidationError::InvalidTime {
                field: "arrival",
                ..
            })
        ));
    }

    #[test]
    fn accepts_seconds_in_time_fields() {
        let mut f = form("2024-01-20T10:00", "2024-01-20T12:00", "AB-123-CD");
        f.departure = "12:00:30".to_string();
        assert!(validate(&f, now()).is_ok());
    }

    #[test]
    fn rejects_arrival_in_the_past() {
        let result = validate(&form("2024-01-18T10:00", "2024-01-20T12:00", "AB-123-CD"), now());
        assert!(matches!(result, Err(ValidationError::StartInPast { .. })));
    }

    #[test]
    fn rejects_departure_equal_to_arrival() {
        let result = validate(&form("2024-01-20T10:00", "2024-01-20T10:00", "AB-123-CD"), now());
        assert!(matches!(result, Err(ValidationError::EndNotAfterStart { .. })));
    }

    #[test]
    fn rejects_departure_before_arrival_across_days() {
        let result = validate(&form("2024-01-21T09:00", "2024-01-20T23:00", "AB-123-CD"), now());
        assert!(matches!(result, Err(ValidationError::EndNotAfterStart { .. })));
    }
}
