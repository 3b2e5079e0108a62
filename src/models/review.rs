//! A rated, written review of a movie.

use super::entity::{Resource, TimestampedEntity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

/// Maximum review length, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating {0} is outside 1..=10")]
    RatingOutOfRange(i64),
    #[error("review content must not be empty")]
    EmptyContent,
    #[error("review content is {0} characters long, at most 1000 allowed")]
    ContentTooLong(usize),
}

/// A single user's review of a movie.
///
/// Construct through [`Review::create`] so that rating and content are
/// validated and the content is stored trimmed.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Review {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entity: TimestampedEntity,

    /// Reviewed movie.
    pub movie_id: Uuid,

    /// Author of the review.
    pub user_id: Uuid,

    /// Score in `MIN_RATING..=MAX_RATING`.
    pub rating: i64,

    /// Review body, trimmed, 1 to `MAX_CONTENT_CHARS` characters.
    pub content: String,
}

impl Review {
    pub fn create(
        user_id: Uuid,
        movie_id: Uuid,
        rating: i64,
        content: &str,
    ) -> Result<Self, ReviewError> {
        Ok(Self {
            entity: TimestampedEntity::new(),
            movie_id,
            user_id,
            rating: check_rating(rating)?,
            content: normalize_content(content)?,
        })
    }

    pub fn set_rating(&mut self, rating: i64) -> Result<(), ReviewError> {
        self.rating = check_rating(rating)?;
        Ok(())
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), ReviewError> {
        self.content = normalize_content(content)?;
        Ok(())
    }
}

impl Resource for Review {
    const KIND: &'static str = "review";

    fn entity(&self) -> &TimestampedEntity {
        &self.entity
    }

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn movie_id(&self) -> Uuid {
        self.movie_id
    }
}

fn check_rating(rating: i64) -> Result<i64, ReviewError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(ReviewError::RatingOutOfRange(rating))
    }
}

/// Trim surrounding whitespace and enforce the length bounds on what remains.
fn normalize_content(content: &str) -> Result<String, ReviewError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ReviewError::EmptyContent);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(ReviewError::ContentTooLong(chars));
    }
    Ok(trimmed.to_string())
}
