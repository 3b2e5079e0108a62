//! `/api/v1/review` handlers.
//!
//! Writes and owner lookups require an authenticated caller; the per-movie
//! listing and statistics are public.

use super::{MovieCount, PageQuery};
use crate::{
    auth::CurrentUser,
    errors::AppError,
    models::Review,
    services::ReviewUpdate,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub movie_id: Uuid,
    #[validate(range(min = 1, max = 10))]
    pub rating: i64,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

/// Partial update: omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 10))]
    pub rating: Option<i64>,
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
}

impl From<UpdateReviewRequest> for ReviewUpdate {
    fn from(req: UpdateReviewRequest) -> Self {
        ReviewUpdate {
            rating: req.rating,
            content: req.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieAverage {
    /// `null` when the movie has no reviews.
    pub average: Option<f64>,
    pub movie_id: Uuid,
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    body.validate()?;
    let review = state
        .reviews
        .create(user.sub, body.movie_id, body.rating, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Review>>, AppError> {
    let page = query.page()?;
    Ok(Json(state.reviews.list_by_user(user.sub, page).await?))
}

pub async fn get_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.reviews.get_by_id(&id, user.sub).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    body.validate()?;
    let review = state.reviews.update(&id, user.sub, body.into()).await?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.reviews.delete(&id, user.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /review/movies/{movie_id}`
pub async fn list_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Review>>, AppError> {
    let page = query.page()?;
    Ok(Json(state.reviews.list_by_movie(movie_id, page).await?))
}

pub async fn count_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
) -> Result<Json<MovieCount>, AppError> {
    let count = state.reviews.count_by_movie(movie_id).await?;
    Ok(Json(MovieCount { count, movie_id }))
}

/// `GET /review/movies/{movie_id}/average`: mean rating to one decimal place.
pub async fn average_movie_rating(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
) -> Result<Json<MovieAverage>, AppError> {
    let average = state.reviews.average_by_movie(movie_id).await?;
    Ok(Json(MovieAverage { average, movie_id }))
}
