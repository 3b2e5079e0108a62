//! LikeService: one like per (user, movie), plus per-movie counts.

use super::{ServiceError, ServiceResult, check_page, create_unique, fetch_owned, remove_owned};
use crate::{
    models::{Like, Resource},
    repositories::{LikeRepository, Page},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct LikeService {
    repository: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(repository: Arc<dyn LikeRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user_id: Uuid, movie_id: Uuid) -> ServiceResult<Like> {
        let like = create_unique(&*self.repository, Like::new(user_id, movie_id)).await?;
        info!(id = ?like.entity.id, %user_id, %movie_id, "like created");
        Ok(like)
    }

    pub async fn get_by_id(&self, id: &str, caller: Uuid) -> ServiceResult<Like> {
        fetch_owned(&*self.repository, id, caller).await
    }

    pub async fn list_by_user(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<Like>> {
        let page = check_page(page)?;
        self.repository
            .get_by_user_id(user_id, page)
            .await
            .map_err(|err| ServiceError::from_repository(Like::KIND, err))
    }

    pub async fn delete(&self, id: &str, caller: Uuid) -> ServiceResult<Like> {
        let removed = remove_owned(&*self.repository, id, caller).await?;
        info!(%id, %caller, "like deleted");
        Ok(removed)
    }

    pub async fn count_by_movie(&self, movie_id: Uuid) -> ServiceResult<u64> {
        self.repository
            .count_by_movie(movie_id)
            .await
            .map_err(|err| ServiceError::from_repository(Like::KIND, err))
    }
}
