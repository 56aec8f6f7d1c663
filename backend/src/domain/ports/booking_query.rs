//! Driving port for reading a passenger's bookings.

use async_trait::async_trait;

use crate::domain::{Error, PassengerBooking, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Bookings made by `passenger_id`, latest departure first.
    async fn bookings_for_passenger(
        &self,
        passenger_id: UserId,
    ) -> Result<Vec<PassengerBooking>, Error>;
}
