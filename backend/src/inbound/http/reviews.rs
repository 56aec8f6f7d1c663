//! Review submission handler.

use actix_web::{HttpResponse, post, web};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, Review, ReviewDraft, ReviewValidationError, RideId, UserId};

use super::ApiResult;
use super::auth::AuthenticatedUser;
use super::error::REQUIRED_FIELDS_MESSAGE;
use super::schemas::ErrorSchema;
use super::state::HttpState;

/// Body of `POST /api/v1/reviews`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub reviewee_id: Option<i64>,
    pub ride_id: Option<i64>,
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub ride_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
    #[schema(value_type = String, example = "2026-03-01T08:30:00")]
    pub created_at: NaiveDateTime,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.as_i64(),
            reviewer_id: review.reviewer_id.as_i64(),
            reviewee_id: review.reviewee_id.as_i64(),
            ride_id: review.ride_id.as_i64(),
            rating: review.rating.get(),
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

fn missing(field: &str) -> Error {
    Error::invalid_request(REQUIRED_FIELDS_MESSAGE).with_details(json!({ "field": field }))
}

fn review_draft(caller: AuthenticatedUser, body: CreateReviewRequest) -> Result<ReviewDraft, Error> {
    let reviewee_id = body.reviewee_id.ok_or_else(|| missing("revieweeId"))?;
    let ride_id = body.ride_id.ok_or_else(|| missing("rideId"))?;
    let rating = body.rating.ok_or_else(|| missing("rating"))?;
    let rating = u8::try_from(rating).unwrap_or(0);
    ReviewDraft::try_new(
        caller.id(),
        UserId::new(reviewee_id),
        RideId::new(ride_id),
        rating,
        body.comment.as_deref(),
    )
    .map_err(|err| {
        let field = match err {
            ReviewValidationError::RatingOutOfRange => "rating",
            ReviewValidationError::SelfReview => "revieweeId",
            ReviewValidationError::CommentTooLong { .. } => "comment",
        };
        Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
    })
}

/// Review another rider after a shared trip.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ReviewResponse),
        (status = 400, description = "Invalid rating, comment or self review", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "User or ride not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let draft = review_draft(caller, payload.into_inner())?;
    let review = state.reviews.submit(draft).await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}
