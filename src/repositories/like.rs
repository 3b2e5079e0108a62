use super::{Document, Repository, RepositoryResult, SqlRepository};
use crate::models::Like;
use async_trait::async_trait;
use uuid::Uuid;

impl Document for Like {
    const COLLECTION: &'static str = "likes";
}

#[async_trait]
pub trait LikeRepository: Repository<Like> {
    /// Total likes for a movie.
    async fn count_by_movie(&self, movie_id: Uuid) -> RepositoryResult<u64>;
}

#[async_trait]
impl LikeRepository for SqlRepository<Like> {
    async fn count_by_movie(&self, movie_id: Uuid) -> RepositoryResult<u64> {
        self.count_by_movie_id(movie_id).await
    }
}
