//! `/api/v1/like` handlers.

use super::{MovieCount, MovieRequest, PageQuery};
use crate::{auth::CurrentUser, errors::AppError, models::Like, state::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn create_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<MovieRequest>,
) -> Result<(StatusCode, Json<Like>), AppError> {
    let like = state.likes.create(user.sub, body.movie_id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn list_likes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Like>>, AppError> {
    let page = query.page()?;
    Ok(Json(state.likes.list_by_user(user.sub, page).await?))
}

pub async fn get_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Like>, AppError> {
    Ok(Json(state.likes.get_by_id(&id, user.sub).await?))
}

pub async fn delete_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.likes.delete(&id, user.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /like/movies/{movie_id}`: public like counter.
pub async fn count_movie_likes(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
) -> Result<Json<MovieCount>, AppError> {
    let count = state.likes.count_by_movie(movie_id).await?;
    Ok(Json(MovieCount { count, movie_id }))
}
