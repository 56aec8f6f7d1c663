//! Driving port for the booking engine.

use async_trait::async_trait;

use crate::domain::{
    Booking, BookingId, BookingRequest, CancelledBooking, CancelledRide, Error, RideId, UserId,
};

/// Seat reservation and cancellation use-cases.
///
/// Every method either applies all of its effects or none of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve seats on a ride for the requesting passenger.
    async fn create_booking(&self, request: BookingRequest) -> Result<Booking, Error>;

    /// Cancel one of the requester's confirmed bookings.
    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<CancelledBooking, Error>;

    /// Cancel one of the requester's rides and every booking on it.
    async fn cancel_ride(&self, ride_id: RideId, requester: UserId) -> Result<CancelledRide, Error>;
}
