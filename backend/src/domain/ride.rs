//! Ride offers published by drivers.
//!
//! A ride carries a fixed seat capacity chosen at publication time. Its
//! `seats_available` counter only moves through the booking engine, which
//! keeps `seats_available + confirmed seats == seat_capacity`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::user::{Avatar, PhoneNumber, UserId, UserName};

/// Largest number of seats a ride may offer or a booking may request.
pub const MAX_SEATS: u32 = 16;
/// Maximum length of free-text ride fields.
pub const RIDE_TEXT_MAX: usize = 500;
/// Storage format for departure dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for departure times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Stable ride identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RideId(i64);

impl RideId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for RideId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a ride. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RideStatus {
    Active,
    Cancelled,
}

impl RideStatus {
    /// Value persisted in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a persisted status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RideStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Seat quantity between 1 and [`MAX_SEATS`].
///
/// # Examples
/// ```
/// use rideshare::domain::SeatCount;
///
/// assert_eq!(SeatCount::new(3).unwrap().get(), 3);
/// assert!(SeatCount::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatCount(u32);

impl SeatCount {
    /// A single seat, the default booking size.
    pub const ONE: Self = Self(1);

    pub fn new(value: u32) -> Result<Self, RideValidationError> {
        if value == 0 || value > MAX_SEATS {
            return Err(RideValidationError::SeatsOutOfRange { max: MAX_SEATS });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Validation failures raised while building a [`RideDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RideValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("departure date must use YYYY-MM-DD")]
    InvalidDate,
    #[error("departure time must use HH:MM")]
    InvalidTime,
    #[error("seats must be between 1 and {max}")]
    SeatsOutOfRange { max: u32 },
    #[error("price must be a positive amount")]
    InvalidPrice,
}

impl RideValidationError {
    /// Name of the request field the failure relates to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::TooLong { field, .. } => *field,
            Self::InvalidDate => "departureDate",
            Self::InvalidTime => "departureTime",
            Self::SeatsOutOfRange { .. } => "seats",
            Self::InvalidPrice => "price",
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_departure_date(raw: &str) -> Result<NaiveDate, RideValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| RideValidationError::InvalidDate)
}

/// Parse an `HH:MM` time.
pub fn parse_departure_time(raw: &str) -> Result<NaiveTime, RideValidationError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|_| RideValidationError::InvalidTime)
}

/// Unvalidated ride fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideDraftInput<'a> {
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub departure_date: Option<&'a str>,
    pub departure_time: Option<&'a str>,
    pub seats: Option<u32>,
    pub price: Option<f64>,
    pub car_model: Option<&'a str>,
    pub car_color: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Validated ride offer ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RideDraft {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub seats: SeatCount,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, RideValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(RideValidationError::MissingField { field });
    }
    bounded(trimmed, field)
}

fn optional_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<String>, RideValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded(text, field).map(Some),
    }
}

fn bounded(text: &str, field: &'static str) -> Result<String, RideValidationError> {
    if text.chars().count() > RIDE_TEXT_MAX {
        return Err(RideValidationError::TooLong {
            field,
            max: RIDE_TEXT_MAX,
        });
    }
    Ok(text.to_owned())
}

impl RideDraft {
    /// Validate raw input; the first failing field is reported.
    ///
    /// # Examples
    /// ```
    /// use rideshare::domain::{RideDraft, RideDraftInput};
    ///
    /// let draft = RideDraft::try_from_input(RideDraftInput {
    ///     origin: Some("New York"),
    ///     destination: Some("Boston"),
    ///     departure_date: Some("2026-03-05"),
    ///     departure_time: Some("08:00"),
    ///     seats: Some(3),
    ///     price: Some(35.0),
    ///     ..RideDraftInput::default()
    /// })
    /// .unwrap();
    /// assert_eq!(draft.seats.get(), 3);
    /// ```
    pub fn try_from_input(input: RideDraftInput<'_>) -> Result<Self, RideValidationError> {
        let origin = required_text(input.origin, "origin")?;
        let destination = required_text(input.destination, "destination")?;
        let departure_date = parse_departure_date(
            input
                .departure_date
                .filter(|raw| !raw.trim().is_empty())
                .ok_or(RideValidationError::MissingField {
                    field: "departureDate",
                })?,
        )?;
        let departure_time = parse_departure_time(
            input
                .departure_time
                .filter(|raw| !raw.trim().is_empty())
                .ok_or(RideValidationError::MissingField {
                    field: "departureTime",
                })?,
        )?;
        let seats = SeatCount::new(
            input
                .seats
                .ok_or(RideValidationError::MissingField { field: "seats" })?,
        )?;
        let price = input
            .price
            .ok_or(RideValidationError::MissingField { field: "price" })?;
        if !price.is_finite() || price <= 0.0 {
            return Err(RideValidationError::InvalidPrice);
        }
        Ok(Self {
            origin,
            destination,
            departure_date,
            departure_time,
            seats,
            price,
            car_model: optional_text(input.car_model, "carModel")?,
            car_color: optional_text(input.car_color, "carColor")?,
            description: optional_text(input.description, "description")?,
        })
    }
}

/// A stored ride.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub id: RideId,
    pub driver_id: UserId,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub seats_available: u32,
    pub seat_capacity: u32,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub description: Option<String>,
    pub status: RideStatus,
    pub created_at: NaiveDateTime,
}

/// Driver fields shown alongside a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSummary {
    pub name: UserName,
    pub avatar: Avatar,
    pub rating: f64,
    pub trips_count: u32,
    /// Only disclosed on the ride detail view.
    pub phone: Option<PhoneNumber>,
}

/// A ride joined with its driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RideListing {
    pub ride: Ride,
    pub driver: DriverSummary,
}

/// A confirmed passenger on a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RidePassenger {
    pub passenger_id: UserId,
    pub name: UserName,
    pub avatar: Avatar,
    pub seats_booked: u32,
}

/// Detail view of a ride with its confirmed passengers.
#[derive(Debug, Clone, PartialEq)]
pub struct RideDetails {
    pub listing: RideListing,
    pub passengers: Vec<RidePassenger>,
}

/// A ride as seen by its driver, with the seats booked so far.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferedRide {
    pub ride: Ride,
    pub booked_seats: u32,
}

/// Search filters. Text filters match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

impl RideSearch {
    /// Build filters from raw query parameters, ignoring blank values.
    pub fn try_from_parts(
        origin: Option<&str>,
        destination: Option<&str>,
        date: Option<&str>,
    ) -> Result<Self, RideValidationError> {
        let text = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };
        let date = match date.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_departure_date(raw)?),
        };
        Ok(Self {
            origin: text(origin),
            destination: text(destination),
            date,
        })
    }
}

#[cfg(test)]
#[path = "ride_tests.rs"]
mod tests;
