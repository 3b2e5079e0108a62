//! ReviewService: one review per (user, movie), owner-only edits, and
//! per-movie listing and statistics.

use super::{ServiceError, ServiceResult, check_page, create_unique, fetch_owned, remove_owned};
use crate::{
    models::{Resource, Review, ReviewError},
    repositories::{Page, ReviewRepository},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Partial update of a review. Absent fields are left as stored.
#[derive(Clone, Debug, Default)]
pub struct ReviewUpdate {
    pub rating: Option<i64>,
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct ReviewService {
    repository: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn ReviewRepository>) -> Self {
        Self { repository }
    }

    /// Validate, trim and store a new review.
    pub async fn create(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        rating: i64,
        content: &str,
    ) -> ServiceResult<Review> {
        let review = Review::create(user_id, movie_id, rating, content).map_err(invalid)?;
        let review = create_unique(&*self.repository, review).await?;
        info!(id = ?review.entity.id, %user_id, %movie_id, rating, "review created");
        Ok(review)
    }

    pub async fn get_by_id(&self, id: &str, caller: Uuid) -> ServiceResult<Review> {
        fetch_owned(&*self.repository, id, caller).await
    }

    pub async fn list_by_user(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<Review>> {
        let page = check_page(page)?;
        self.repository
            .get_by_user_id(user_id, page)
            .await
            .map_err(storage)
    }

    pub async fn list_by_movie(&self, movie_id: Uuid, page: Page) -> ServiceResult<Vec<Review>> {
        let page = check_page(page)?;
        self.repository
            .get_by_movie_id(movie_id, page)
            .await
            .map_err(storage)
    }

    /// Apply `changes` to a review owned by `caller` and refresh `updated_at`.
    pub async fn update(
        &self,
        id: &str,
        caller: Uuid,
        changes: ReviewUpdate,
    ) -> ServiceResult<Review> {
        let mut review: Review = fetch_owned(&*self.repository, id, caller).await?;

        if let Some(rating) = changes.rating {
            review.set_rating(rating).map_err(invalid)?;
        }
        if let Some(content) = changes.content.as_deref() {
            review.set_content(content).map_err(invalid)?;
        }
        review.entity.touch();

        let updated = self
            .repository
            .update(review)
            .await
            .map_err(storage)?
            .ok_or_else(|| ServiceError::NotFound {
                kind: Review::KIND,
                id: id.to_string(),
            })?;
        info!(%id, %caller, "review updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str, caller: Uuid) -> ServiceResult<Review> {
        let removed = remove_owned(&*self.repository, id, caller).await?;
        info!(%id, %caller, "review deleted");
        Ok(removed)
    }

    pub async fn count_by_movie(&self, movie_id: Uuid) -> ServiceResult<u64> {
        self.repository
            .count_by_movie(movie_id)
            .await
            .map_err(storage)
    }

    /// Mean rating rounded to one decimal place, `None` for an unreviewed movie.
    pub async fn average_by_movie(&self, movie_id: Uuid) -> ServiceResult<Option<f64>> {
        let average = self
            .repository
            .average_rating_by_movie(movie_id)
            .await
            .map_err(storage)?;
        Ok(average.map(round_to_tenth))
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn invalid(err: ReviewError) -> ServiceError {
    ServiceError::ValidationFailed(err.to_string())
}

fn storage(err: crate::repositories::RepositoryError) -> ServiceError {
    ServiceError::from_repository(Review::KIND, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, repositories::SqlRepository};
    use std::time::Duration;

    async fn service() -> ReviewService {
        let pool = db::connect_in_memory().await.unwrap();
        ReviewService::new(Arc::new(SqlRepository::<Review>::new(pool)))
    }

    #[tokio::test]
    async fn create_stores_trimmed_content() {
        let service = service().await;
        let review = service
            .create(Uuid::new_v4(), Uuid::new_v4(), 8, "  good movie  ")
            .await
            .unwrap();
        assert_eq!(review.content, "good movie");

        let id = review.entity.id.clone().unwrap();
        let stored = service.get_by_id(&id, review.user_id).await.unwrap();
        assert_eq!(stored.content, "good movie");
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_storage() {
        let service = service().await;
        let user = Uuid::new_v4();
        let movie = Uuid::new_v4();

        for (rating, content) in [
            (0, "fine".to_string()),
            (11, "fine".to_string()),
            (5, String::new()),
            (5, "    ".to_string()),
            (5, "x".repeat(1001)),
        ] {
            let err = service
                .create(user, movie, rating, &content)
                .await
                .unwrap_err();
            assert!(
                matches!(err, ServiceError::ValidationFailed(_)),
                "rating={rating} len={}",
                content.len()
            );
        }
        assert_eq!(service.count_by_movie(movie).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_review_of_same_movie_is_duplicate() {
        let service = service().await;
        let user = Uuid::new_v4();
        let movie = Uuid::new_v4();
        service.create(user, movie, 6, "ok").await.unwrap();
        assert!(matches!(
            service.create(user, movie, 9, "changed my mind").await.unwrap_err(),
            ServiceError::DuplicateRecord { kind: "review" }
        ));
    }

    #[tokio::test]
    async fn average_is_rounded_to_one_decimal() {
        let service = service().await;
        let movie = Uuid::new_v4();
        for rating in [7, 9, 8] {
            service
                .create(Uuid::new_v4(), movie, rating, "seen")
                .await
                .unwrap();
        }
        assert_eq!(service.average_by_movie(movie).await.unwrap(), Some(8.0));

        let uneven = Uuid::new_v4();
        for rating in [7, 7, 8] {
            service
                .create(Uuid::new_v4(), uneven, rating, "seen")
                .await
                .unwrap();
        }
        assert_eq!(service.average_by_movie(uneven).await.unwrap(), Some(7.3));
    }

    #[tokio::test]
    async fn unreviewed_movie_has_no_average_and_zero_count() {
        let service = service().await;
        let movie = Uuid::new_v4();
        assert_eq!(service.average_by_movie(movie).await.unwrap(), None);
        assert_eq!(service.count_by_movie(movie).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_applies_given_fields_and_refreshes_timestamp() {
        let service = service().await;
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, Uuid::new_v4(), 4, "meh")
            .await
            .unwrap();
        let id = created.entity.id.clone().unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let updated = service
            .update(
                &id,
                owner,
                ReviewUpdate {
                    rating: None,
                    content: Some("  actually great  ".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 4);
        assert_eq!(updated.content, "actually great");
        assert_eq!(updated.entity.created_at, created.entity.created_at);
        assert!(updated.entity.updated_at > created.entity.updated_at);

        let rated = service
            .update(
                &id,
                owner,
                ReviewUpdate {
                    rating: Some(9),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(rated.rating, 9);
        assert_eq!(rated.content, "actually great");
    }

    #[tokio::test]
    async fn update_checks_existence_ownership_and_input() {
        let service = service().await;
        let owner = Uuid::new_v4();
        let created = service
            .create(owner, Uuid::new_v4(), 4, "meh")
            .await
            .unwrap();
        let id = created.entity.id.clone().unwrap();

        assert!(matches!(
            service
                .update(&id, Uuid::new_v4(), ReviewUpdate::default())
                .await
                .unwrap_err(),
            ServiceError::Forbidden { .. }
        ));
        assert!(matches!(
            service
                .update("missing", owner, ReviewUpdate::default())
                .await
                .unwrap_err(),
            ServiceError::NotFound { .. }
        ));
        assert!(matches!(
            service
                .update(
                    &id,
                    owner,
                    ReviewUpdate {
                        rating: Some(0),
                        content: None
                    }
                )
                .await
                .unwrap_err(),
            ServiceError::ValidationFailed(_)
        ));

        let unchanged = service.get_by_id(&id, owner).await.unwrap();
        assert_eq!(unchanged.rating, 4);
    }

    #[tokio::test]
    async fn missing_review_is_not_found() {
        let service = service().await;
        let caller = Uuid::new_v4();
        assert!(matches!(
            service.get_by_id("missing", caller).await.unwrap_err(),
            ServiceError::NotFound { kind: "review", .. }
        ));
        assert!(matches!(
            service.delete("missing", caller).await.unwrap_err(),
            ServiceError::NotFound { kind: "review", .. }
        ));
    }

    #[tokio::test]
    async fn listings_reject_out_of_range_pages() {
        let service = service().await;
        let id = Uuid::new_v4();
        for page in [Page::new(-1, 0), Page::new(101, 0), Page::new(10, -5)] {
            assert!(matches!(
                service.list_by_movie(id, page).await.unwrap_err(),
                ServiceError::ValidationFailed(_)
            ));
            assert!(matches!(
                service.list_by_user(id, page).await.unwrap_err(),
                ServiceError::ValidationFailed(_)
            ));
        }
    }

    #[tokio::test]
    async fn list_by_movie_includes_every_author() {
        let service = service().await;
        let movie = Uuid::new_v4();
        let authors: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for author in &authors {
            service.create(*author, movie, 5, "hm").await.unwrap();
        }

        let listed = service.list_by_movie(movie, Page::default()).await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            authors
        );
    }
}
