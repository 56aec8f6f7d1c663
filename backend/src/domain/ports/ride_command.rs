//! Driving port for publishing rides.

use async_trait::async_trait;

use crate::domain::{Error, Ride, RideDraft, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideCommand: Send + Sync {
    /// Publish `draft` with `driver_id` as its driver.
    async fn publish(&self, driver_id: UserId, draft: RideDraft) -> Result<Ride, Error>;
}
