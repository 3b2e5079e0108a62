//! Shared per-process state handed to every handler.

use crate::{
    auth::AuthClient,
    models::{Bookmark, Like, Review},
    repositories::SqlRepository,
    services::{BookmarkService, LikeService, ReviewService},
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Cheap to clone: the pool and the HTTP client are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, also used directly by the readiness probe.
    pub db: SqlitePool,
    pub auth: Arc<AuthClient>,
    pub bookmarks: BookmarkService,
    pub likes: LikeService,
    pub reviews: ReviewService,
}

impl AppState {
    /// Wire one repository and service per resource over `db`.
    pub fn new(db: SqlitePool, auth: AuthClient) -> Self {
        Self {
            bookmarks: BookmarkService::new(Arc::new(SqlRepository::<Bookmark>::new(db.clone()))),
            likes: LikeService::new(Arc::new(SqlRepository::<Like>::new(db.clone()))),
            reviews: ReviewService::new(Arc::new(SqlRepository::<Review>::new(db.clone()))),
            auth: Arc::new(auth),
            db,
        }
    }
}
