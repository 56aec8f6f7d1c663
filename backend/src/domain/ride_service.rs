//! Ride publication and discovery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{RideCommand, RideQuery, RideRepository, RideRepositoryError};
use crate::domain::{
    Error, OfferedRide, Ride, RideDetails, RideDraft, RideId, RideListing, RideSearch, UserId,
};

/// Maximum number of rides returned by the public listing.
pub const RIDE_LISTING_LIMIT: u32 = 50;

fn map_repository_error(error: RideRepositoryError) -> Error {
    match error {
        RideRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ride store unavailable: {message}"))
        }
        RideRepositoryError::Query { message } => {
            Error::internal(format!("ride store error: {message}"))
        }
    }
}

/// Ride use-cases backed by a [`RideRepository`].
#[derive(Clone)]
pub struct RideService<R> {
    rides: Arc<R>,
}

impl<R> RideService<R> {
    /// Create the service.
    pub fn new(rides: Arc<R>) -> Self {
        Self { rides }
    }
}

#[async_trait]
impl<R> RideCommand for RideService<R>
where
    R: RideRepository,
{
    async fn publish(&self, driver_id: UserId, draft: RideDraft) -> Result<Ride, Error> {
        let ride = self
            .rides
            .insert(driver_id, &draft)
            .await
            .map_err(map_repository_error)?;
        info!(
            ride_id = %ride.id,
            driver_id = %driver_id,
            seats = ride.seat_capacity,
            "ride published"
        );
        Ok(ride)
    }
}

#[async_trait]
impl<R> RideQuery for RideService<R>
where
    R: RideRepository,
{
    async fn list_active(&self) -> Result<Vec<RideListing>, Error> {
        self.rides
            .list_active(RIDE_LISTING_LIMIT)
            .await
            .map_err(map_repository_error)
    }

    async fn search(&self, search: RideSearch) -> Result<Vec<RideListing>, Error> {
        self.rides
            .search(&search)
            .await
            .map_err(map_repository_error)
    }

    async fn details(&self, ride_id: RideId) -> Result<RideDetails, Error> {
        self.rides
            .find_details(ride_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Ride not found."))
    }

    async fn offered_by(&self, driver_id: UserId) -> Result<Vec<OfferedRide>, Error> {
        self.rides
            .list_offered_by(driver_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockRideRepository;
    use crate::domain::{ErrorCode, RideDraftInput};
    use rstest::rstest;

    fn draft() -> RideDraft {
        RideDraft::try_from_input(RideDraftInput {
            origin: Some("New York"),
            destination: Some("Boston"),
            departure_date: Some("2026-03-05"),
            departure_time: Some("08:00"),
            seats: Some(3),
            price: Some(35.0),
            ..RideDraftInput::default()
        })
        .expect("valid draft")
    }

    #[tokio::test]
    async fn listing_is_capped() {
        let mut repo = MockRideRepository::new();
        repo.expect_list_active()
            .withf(|limit| *limit == RIDE_LISTING_LIMIT)
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let rides = RideService::new(Arc::new(repo))
            .list_active()
            .await
            .expect("listing succeeds");
        assert!(rides.is_empty());
    }

    #[tokio::test]
    async fn missing_ride_details_are_not_found() {
        let mut repo = MockRideRepository::new();
        repo.expect_find_details().times(1).return_once(|_| Ok(None));

        let error = RideService::new(Arc::new(repo))
            .details(RideId::new(404))
            .await
            .expect_err("missing ride");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Ride not found.");
    }

    #[rstest]
    #[case(RideRepositoryError::connection("database is locked"), ErrorCode::ServiceUnavailable)]
    #[case(RideRepositoryError::query("no such table: rides"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn publish_maps_store_failures(
        #[case] failure: RideRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockRideRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(move |_, _| Err(failure));

        let error = RideService::new(Arc::new(repo))
            .publish(UserId::new(1), draft())
            .await
            .expect_err("store failure");
        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn search_forwards_filters() {
        let search = RideSearch::try_from_parts(Some("New"), None, Some("2026-03-05"))
            .expect("valid search");
        let expected = search.clone();
        let mut repo = MockRideRepository::new();
        repo.expect_search()
            .withf(move |candidate| *candidate == expected)
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        RideService::new(Arc::new(repo))
            .search(search)
            .await
            .expect("search succeeds");
    }
}
