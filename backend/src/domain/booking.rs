//! Seat bookings and the rules that guard them.
//!
//! Persistence adapters load a snapshot of the affected rows inside a
//! transaction, ask the functions in this module whether the change is
//! allowed, and only then write. Every rule violation is therefore reported
//! before anything is mutated.
//!
//! Seat invariant: for every ride,
//! `seats_available + Σ seats_booked(confirmed) == seat_capacity`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::error::{Error, ErrorCode};
use super::ride::{RideId, RideStatus, SeatCount, UnknownStatus};
use super::user::{Avatar, PhoneNumber, UserId, UserName};

/// Stable booking identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingId(i64);

impl BookingId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookingId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a booking. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Value persisted in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub ride_id: RideId,
    pub passenger_id: UserId,
    pub seats_booked: u32,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

/// Request to reserve seats on a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub ride_id: RideId,
    pub passenger_id: UserId,
    pub seats: SeatCount,
}

impl BookingRequest {
    /// Request a single seat.
    #[must_use]
    pub const fn single_seat(ride_id: RideId, passenger_id: UserId) -> Self {
        Self {
            ride_id,
            passenger_id,
            seats: SeatCount::ONE,
        }
    }
}

/// Seat-related state of a ride, read inside the booking transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RideSeats {
    pub ride_id: RideId,
    pub driver_id: UserId,
    pub status: RideStatus,
    pub seats_available: u32,
}

/// Booking state read inside the cancellation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSeats {
    pub booking_id: BookingId,
    pub ride_id: RideId,
    pub passenger_id: UserId,
    pub seats_booked: u32,
    pub status: BookingStatus,
}

/// Outcome of a booking cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledBooking {
    pub booking_id: BookingId,
    pub ride_id: RideId,
    pub seats_restored: u32,
}

/// Outcome of a ride cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledRide {
    pub ride_id: RideId,
    pub bookings_cancelled: u32,
    pub seats_restored: u32,
}

/// A booking joined with its ride and driver, as listed for the passenger.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerBooking {
    pub booking: Booking,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub price: f64,
    pub car_model: Option<String>,
    pub car_color: Option<String>,
    pub ride_status: RideStatus,
    pub driver_name: UserName,
    pub driver_avatar: Avatar,
    pub driver_rating: f64,
    pub driver_phone: Option<PhoneNumber>,
}

/// Reasons a booking engine operation is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingRejection {
    #[error("Ride not found or no longer active.")]
    RideUnavailable,
    #[error("You can't book your own ride.")]
    OwnRide,
    #[error("You already have a booking for this ride.")]
    AlreadyBooked,
    #[error("Not enough seats available.")]
    NotEnoughSeats { requested: u32, available: u32 },
    #[error("Booking not found.")]
    BookingNotFound,
    #[error("Booking is already cancelled.")]
    BookingAlreadyCancelled,
    #[error("Ride not found or unauthorized.")]
    RideNotOwned,
    #[error("Ride is already cancelled.")]
    RideAlreadyCancelled,
}

impl BookingRejection {
    /// Error category reported to callers.
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::OwnRide | Self::AlreadyBooked | Self::NotEnoughSeats { .. } => {
                ErrorCode::InvalidRequest
            }
            Self::RideUnavailable
            | Self::BookingNotFound
            | Self::BookingAlreadyCancelled
            | Self::RideNotOwned
            | Self::RideAlreadyCancelled => ErrorCode::NotFound,
        }
    }
}

impl From<BookingRejection> for Error {
    fn from(value: BookingRejection) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

/// Decide whether `request` may be applied to `ride`.
///
/// Checks run in a fixed order: availability of the ride, self-booking,
/// duplicate booking, then seat count.
///
/// # Examples
/// ```
/// use rideshare::domain::{
///     BookingRejection, BookingRequest, RideId, RideSeats, RideStatus, UserId, authorise_booking,
/// };
///
/// let ride = RideSeats {
///     ride_id: RideId::new(1),
///     driver_id: UserId::new(1),
///     status: RideStatus::Active,
///     seats_available: 0,
/// };
/// let request = BookingRequest::single_seat(RideId::new(1), UserId::new(2));
/// assert_eq!(
///     authorise_booking(Some(&ride), &request, false),
///     Err(BookingRejection::NotEnoughSeats { requested: 1, available: 0 })
/// );
/// ```
pub fn authorise_booking(
    ride: Option<&RideSeats>,
    request: &BookingRequest,
    has_confirmed_booking: bool,
) -> Result<(), BookingRejection> {
    let ride = ride
        .filter(|ride| ride.status == RideStatus::Active)
        .ok_or(BookingRejection::RideUnavailable)?;
    if ride.driver_id == request.passenger_id {
        return Err(BookingRejection::OwnRide);
    }
    if has_confirmed_booking {
        return Err(BookingRejection::AlreadyBooked);
    }
    let requested = request.seats.get();
    if ride.seats_available < requested {
        return Err(BookingRejection::NotEnoughSeats {
            requested,
            available: ride.seats_available,
        });
    }
    Ok(())
}

/// Decide whether `requester` may cancel `booking`; returns the seats to restore.
///
/// Bookings owned by someone else are reported as missing.
pub fn authorise_booking_cancellation(
    booking: Option<&BookingSeats>,
    requester: UserId,
) -> Result<u32, BookingRejection> {
    let booking = booking
        .filter(|booking| booking.passenger_id == requester)
        .ok_or(BookingRejection::BookingNotFound)?;
    match booking.status {
        BookingStatus::Confirmed => Ok(booking.seats_booked),
        BookingStatus::Cancelled => Err(BookingRejection::BookingAlreadyCancelled),
    }
}

/// Decide whether `requester` may cancel `ride`.
pub fn authorise_ride_cancellation(
    ride: Option<&RideSeats>,
    requester: UserId,
) -> Result<(), BookingRejection> {
    let ride = ride
        .filter(|ride| ride.driver_id == requester)
        .ok_or(BookingRejection::RideNotOwned)?;
    match ride.status {
        RideStatus::Active => Ok(()),
        RideStatus::Cancelled => Err(BookingRejection::RideAlreadyCancelled),
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
