//! SQLite-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{Review, ReviewDraft};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::review_from_row;
use super::schema::reviews;

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, |message| ReviewRepositoryError::connection(message))
}

/// Foreign key failures mean the reviewee or the ride does not exist.
fn map_diesel_error(error: DieselError) -> ReviewRepositoryError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ReviewRepositoryError::missing_reference()
        }
        other => map_basic_diesel_error(
            other,
            ReviewRepositoryError::query,
            ReviewRepositoryError::connection,
        ),
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn append(&self, draft: &ReviewDraft) -> Result<Review, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                reviewer_id: draft.reviewer_id.as_i64(),
                reviewee_id: draft.reviewee_id.as_i64(),
                ride_id: draft.ride_id.as_i64(),
                rating: i32::from(draft.rating.get()),
                comment: draft.comment.as_deref(),
            })
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        review_from_row(row).map_err(|err| ReviewRepositoryError::query(err.to_string()))
    }
}
