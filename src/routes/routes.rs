//! Defines routes for bookmarks, likes and reviews.
//!
//! ## Structure
//! - **Health** (root): `GET /healthz`, `GET /readyz`
//! - **Bookmarks** (`/api/v1/bookmark`)
//!   - `POST /`, `GET /` (caller's own), `GET /{id}`, `DELETE /{id}`
//! - **Likes** (`/api/v1/like`)
//!   - same as bookmarks, plus public `GET /movies/{movie_id}` (count)
//! - **Reviews** (`/api/v1/review`)
//!   - `POST /`, `GET /`, `GET|PATCH|DELETE /{id}`
//!   - public `GET /movies/{movie_id}`, `/movies/{movie_id}/count`,
//!     `/movies/{movie_id}/average`

use crate::{
    handlers::{
        bookmark_handlers::{create_bookmark, delete_bookmark, get_bookmark, list_bookmarks},
        health_handlers::{healthz, readyz},
        like_handlers::{count_movie_likes, create_like, delete_like, get_like, list_likes},
        review_handlers::{
            average_movie_rating, count_movie_reviews, create_review, delete_review, get_review,
            list_movie_reviews, list_reviews, update_review,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the router for every endpoint, without state attached.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/v1", api_v1())
}

/// The full application with `state` attached, ready to serve.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

fn api_v1() -> Router<AppState> {
    Router::new()
        .route("/bookmark", post(create_bookmark).get(list_bookmarks))
        .route("/bookmark/{id}", get(get_bookmark).delete(delete_bookmark))
        .route("/like", post(create_like).get(list_likes))
        .route("/like/{id}", get(get_like).delete(delete_like))
        .route("/like/movies/{movie_id}", get(count_movie_likes))
        .route("/review", post(create_review).get(list_reviews))
        .route(
            "/review/{id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .route("/review/movies/{movie_id}", get(list_movie_reviews))
        .route("/review/movies/{movie_id}/count", get(count_movie_reviews))
        .route(
            "/review/movies/{movie_id}/average",
            get(average_movie_rating),
        )
}
