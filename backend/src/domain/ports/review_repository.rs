//! Port for appending reviews.

use async_trait::async_trait;

use crate::domain::{Review, ReviewDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The reviewee or ride does not exist.
        MissingReference => "review references an unknown user or ride",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Append a review.
    async fn append(&self, draft: &ReviewDraft) -> Result<Review, ReviewRepositoryError>;
}
