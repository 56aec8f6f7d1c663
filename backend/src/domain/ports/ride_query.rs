//! Driving port for ride discovery.

use async_trait::async_trait;

use crate::domain::{Error, OfferedRide, RideDetails, RideId, RideListing, RideSearch, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideQuery: Send + Sync {
    /// Newest bookable rides.
    async fn list_active(&self) -> Result<Vec<RideListing>, Error>;

    /// Bookable rides matching the filters.
    async fn search(&self, search: RideSearch) -> Result<Vec<RideListing>, Error>;

    /// One ride with driver contact and confirmed passengers.
    async fn details(&self, ride_id: RideId) -> Result<RideDetails, Error>;

    /// Rides published by the caller.
    async fn offered_by(&self, driver_id: UserId) -> Result<Vec<OfferedRide>, Error>;
}
