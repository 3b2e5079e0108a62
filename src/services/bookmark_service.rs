//! BookmarkService: one bookmark per (user, movie), visible only to its owner.

use super::{ServiceError, ServiceResult, check_page, create_unique, fetch_owned, remove_owned};
use crate::{
    models::{Bookmark, Resource},
    repositories::{BookmarkRepository, Page},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct BookmarkService {
    repository: Arc<dyn BookmarkRepository>,
}

impl BookmarkService {
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user_id: Uuid, movie_id: Uuid) -> ServiceResult<Bookmark> {
        let bookmark = create_unique(&*self.repository, Bookmark::new(user_id, movie_id)).await?;
        info!(id = ?bookmark.entity.id, %user_id, %movie_id, "bookmark created");
        Ok(bookmark)
    }

    pub async fn get_by_id(&self, id: &str, caller: Uuid) -> ServiceResult<Bookmark> {
        fetch_owned(&*self.repository, id, caller).await
    }

    /// Bookmarks of `user_id`. The caller is expected to pass its own identity.
    pub async fn list_by_user(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<Bookmark>> {
        let page = check_page(page)?;
        self.repository
            .get_by_user_id(user_id, page)
            .await
            .map_err(|err| ServiceError::from_repository(Bookmark::KIND, err))
    }

    pub async fn delete(&self, id: &str, caller: Uuid) -> ServiceResult<Bookmark> {
        let removed = remove_owned(&*self.repository, id, caller).await?;
        info!(%id, %caller, "bookmark deleted");
        Ok(removed)
    }
}
