//! Review submission.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ReviewCommand, ReviewRepository, ReviewRepositoryError};
use crate::domain::{Error, Review, ReviewDraft};

fn map_repository_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::MissingReference => Error::not_found("User or ride not found."),
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review store error: {message}"))
        }
    }
}

/// Appends reviews through a [`ReviewRepository`].
#[derive(Clone)]
pub struct ReviewService<R> {
    reviews: Arc<R>,
}

impl<R> ReviewService<R> {
    /// Create the service.
    #[must_use]
    pub const fn new(reviews: Arc<R>) -> Self {
        Self { reviews }
    }
}

#[async_trait]
impl<R> ReviewCommand for ReviewService<R>
where
    R: ReviewRepository,
{
    async fn submit(&self, draft: ReviewDraft) -> Result<Review, Error> {
        let review = self
            .reviews
            .append(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(
            review_id = review.id.as_i64(),
            ride_id = %review.ride_id,
            reviewee_id = %review.reviewee_id,
            "review recorded"
        );
        Ok(review)
    }
}
