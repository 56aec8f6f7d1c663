//! Port for publishing rides and reading ride listings.

use async_trait::async_trait;

use crate::domain::{OfferedRide, Ride, RideDetails, RideDraft, RideId, RideListing, RideSearch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ride repository adapters.
    pub enum RideRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ride repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ride repository query failed: {message}",
    }
}

/// Read and write access to rides.
///
/// Listing methods only return active rides that still have free seats.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideRepository: Send + Sync {
    /// Store a new active ride with `seats_available == seat_capacity`.
    async fn insert(&self, driver_id: UserId, draft: &RideDraft) -> Result<Ride, RideRepositoryError>;

    /// Most recently published bookable rides.
    async fn list_active(&self, limit: u32) -> Result<Vec<RideListing>, RideRepositoryError>;

    /// Bookable rides matching `search`, ordered by departure.
    async fn search(&self, search: &RideSearch) -> Result<Vec<RideListing>, RideRepositoryError>;

    /// A ride in any status with its driver and confirmed passengers.
    async fn find_details(&self, ride_id: RideId) -> Result<Option<RideDetails>, RideRepositoryError>;

    /// Rides published by `driver_id`, newest first.
    async fn list_offered_by(&self, driver_id: UserId) -> Result<Vec<OfferedRide>, RideRepositoryError>;
}
