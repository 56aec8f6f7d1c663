//! Driving port for submitting reviews.

use async_trait::async_trait;

use crate::domain::{Error, Review, ReviewDraft};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Append a review written by `draft.reviewer_id`.
    async fn submit(&self, draft: ReviewDraft) -> Result<Review, Error>;
}
