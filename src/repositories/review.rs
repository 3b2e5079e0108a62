use super::{Document, Page, Repository, RepositoryResult, SqlRepository, Value};
use crate::models::Review;
use async_trait::async_trait;
use uuid::Uuid;

impl Document for Review {
    const COLLECTION: &'static str = "reviews";
    const EXTRA_COLUMNS: &'static [&'static str] = &["rating", "content"];

    fn extra_values(&self) -> Vec<Value> {
        vec![Value::Int(self.rating), Value::Text(self.content.clone())]
    }
}

#[async_trait]
pub trait ReviewRepository: Repository<Review> {
    async fn get_by_movie_id(&self, movie_id: Uuid, page: Page) -> RepositoryResult<Vec<Review>>;

    async fn count_by_movie(&self, movie_id: Uuid) -> RepositoryResult<u64>;

    /// Mean rating across all reviews of a movie, `None` when it has none.
    async fn average_rating_by_movie(&self, movie_id: Uuid) -> RepositoryResult<Option<f64>>;
}

#[async_trait]
impl ReviewRepository for SqlRepository<Review> {
    async fn get_by_movie_id(&self, movie_id: Uuid, page: Page) -> RepositoryResult<Vec<Review>> {
        self.list_by_movie_id(movie_id, page).await
    }

    async fn count_by_movie(&self, movie_id: Uuid) -> RepositoryResult<u64> {
        self.count_by_movie_id(movie_id).await
    }

    async fn average_rating_by_movie(&self, movie_id: Uuid) -> RepositoryResult<Option<f64>> {
        // AVG over zero rows is NULL.
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE movie_id = ?")
                .bind(movie_id)
                .fetch_one(self.pool())
                .await?;
        Ok(average)
    }
}
