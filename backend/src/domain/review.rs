//! Reviews left by riders about each other. Append-only.

use chrono::NaiveDateTime;

use super::ride::RideId;
use super::user::UserId;

/// Maximum length of a review comment.
pub const COMMENT_MAX: usize = 1000;

/// Stable review identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewId(i64);

impl ReviewId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

/// Validation failures for review submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("You can't review yourself.")]
    SelfReview,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, ReviewValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReviewValidationError::RatingOutOfRange)
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Validated review ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub ride_id: RideId,
    pub rating: Rating,
    pub comment: Option<String>,
}

impl ReviewDraft {
    /// Validate a submission. Users cannot review themselves.
    pub fn try_new(
        reviewer_id: UserId,
        reviewee_id: UserId,
        ride_id: RideId,
        rating: u8,
        comment: Option<&str>,
    ) -> Result<Self, ReviewValidationError> {
        if reviewer_id == reviewee_id {
            return Err(ReviewValidationError::SelfReview);
        }
        let rating = Rating::new(rating)?;
        let comment = match comment.map(str::trim) {
            None | Some("") => None,
            Some(text) if text.chars().count() > COMMENT_MAX => {
                return Err(ReviewValidationError::CommentTooLong { max: COMMENT_MAX });
            }
            Some(text) => Some(text.to_owned()),
        };
        Ok(Self {
            reviewer_id,
            reviewee_id,
            ride_id,
            rating,
            comment,
        })
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub ride_id: RideId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn rating_outside_range_is_rejected(#[case] value: u8) {
        assert_eq!(Rating::new(value), Err(ReviewValidationError::RatingOutOfRange));
    }

    #[rstest]
    fn self_review_is_rejected() {
        let result = ReviewDraft::try_new(UserId::new(1), UserId::new(1), RideId::new(1), 5, None);
        assert_eq!(result, Err(ReviewValidationError::SelfReview));
    }

    #[rstest]
    fn blank_comment_is_dropped() {
        let draft = ReviewDraft::try_new(UserId::new(1), UserId::new(2), RideId::new(1), 4, Some("  "))
            .expect("valid review");
        assert!(draft.comment.is_none());
        assert_eq!(draft.rating.get(), 4);
    }
}
