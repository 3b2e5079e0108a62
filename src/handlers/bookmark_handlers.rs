//! `/api/v1/bookmark` handlers. Every route requires an authenticated caller.

use super::{MovieRequest, PageQuery};
use crate::{auth::CurrentUser, errors::AppError, models::Bookmark, state::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// `POST /bookmark`
pub async fn create_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<MovieRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let bookmark = state.bookmarks.create(user.sub, body.movie_id).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// `GET /bookmark`: the caller's own bookmarks.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let page = query.page()?;
    Ok(Json(state.bookmarks.list_by_user(user.sub, page).await?))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, AppError> {
    Ok(Json(state.bookmarks.get_by_id(&id, user.sub).await?))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.bookmarks.delete(&id, user.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}
