//! Booking engine service.
//!
//! Implements the booking driving ports on top of a transactional
//! [`BookingRepository`]. The repository applies each operation atomically;
//! this service translates its outcomes into domain errors and logs them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{BookingCommand, BookingQuery, BookingRepository, BookingRepositoryError};
use crate::domain::{
    Booking, BookingId, BookingRequest, CancelledBooking, CancelledRide, Error, PassengerBooking,
    RideId, UserId,
};

fn map_repository_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Rejected { reason } => Error::from(reason),
        BookingRepositoryError::Connection { message } => {
            warn!(%message, "booking store unavailable");
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking store error: {message}"))
        }
    }
}

/// Booking engine backed by a transactional repository.
#[derive(Clone)]
pub struct BookingService<R> {
    bookings: Arc<R>,
}

impl<R> BookingService<R> {
    /// Create the service over a booking repository.
    #[must_use]
    pub const fn new(bookings: Arc<R>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl<R> BookingCommand for BookingService<R>
where
    R: BookingRepository,
{
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking, Error> {
        let booking = self
            .bookings
            .create_booking(&request)
            .await
            .map_err(map_repository_error)?;
        info!(
            booking_id = %booking.id,
            ride_id = %booking.ride_id,
            passenger_id = %booking.passenger_id,
            seats = booking.seats_booked,
            "booking confirmed"
        );
        Ok(booking)
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<CancelledBooking, Error> {
        let cancelled = self
            .bookings
            .cancel_booking(booking_id, requester)
            .await
            .map_err(map_repository_error)?;
        info!(
            booking_id = %cancelled.booking_id,
            ride_id = %cancelled.ride_id,
            seats_restored = cancelled.seats_restored,
            "booking cancelled"
        );
        Ok(cancelled)
    }

    async fn cancel_ride(&self, ride_id: RideId, requester: UserId) -> Result<CancelledRide, Error> {
        let cancelled = self
            .bookings
            .cancel_ride(ride_id, requester)
            .await
            .map_err(map_repository_error)?;
        info!(
            ride_id = %cancelled.ride_id,
            bookings_cancelled = cancelled.bookings_cancelled,
            "ride cancelled"
        );
        Ok(cancelled)
    }
}

#[async_trait]
impl<R> BookingQuery for BookingService<R>
where
    R: BookingRepository,
{
    async fn bookings_for_passenger(
        &self,
        passenger_id: UserId,
    ) -> Result<Vec<PassengerBooking>, Error> {
        self.bookings
            .list_for_passenger(passenger_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
