//! Port for the transactional booking store.
//!
//! Each mutating method is one transaction: adapters read the affected rows,
//! consult the rules in [`crate::domain::booking`], and either apply every
//! write or none. Rule violations come back as `Rejected`.

use async_trait::async_trait;

use crate::domain::{
    Booking, BookingId, BookingRejection, BookingRequest, CancelledBooking, CancelledRide,
    PassengerBooking, RideId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established or the store is busy.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// A booking rule refused the operation; nothing was written.
        Rejected { reason: BookingRejection } => "booking rejected: {reason}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Reserve seats: insert the booking, take the seats, bump both trip counters.
    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, BookingRepositoryError>;

    /// Cancel a confirmed booking owned by `requester` and give its seats back.
    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<CancelledBooking, BookingRepositoryError>;

    /// Cancel a ride owned by `requester` together with all of its bookings.
    async fn cancel_ride(
        &self,
        ride_id: RideId,
        requester: UserId,
    ) -> Result<CancelledRide, BookingRepositoryError>;

    /// All bookings made by `passenger_id`, latest departure first.
    async fn list_for_passenger(
        &self,
        passenger_id: UserId,
    ) -> Result<Vec<PassengerBooking>, BookingRepositoryError>;
}
