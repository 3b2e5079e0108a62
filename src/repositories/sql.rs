//! SqlRepository: the generic SQLite-backed base shared by every resource.
//!
//! Each resource kind lives in its own table (its "collection"). Rows carry
//! the resource fields plus a store-assigned string id and two timestamps.
//! Queries are assembled with `QueryBuilder` from the column layout that the
//! record's [`Document`] impl declares.

use super::{Document, Page, Repository, RepositoryError, RepositoryResult, Value};
use async_trait::async_trait;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

const BASE_COLUMNS: [&str; 5] = ["id", "user_id", "movie_id", "created_at", "updated_at"];

/// Generic repository over one collection of `T`.
pub struct SqlRepository<T> {
    db: SqlitePool,
    /// Comma-separated column list, base columns first.
    columns: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for SqlRepository<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            columns: self.columns.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Document> SqlRepository<T> {
    pub fn new(db: SqlitePool) -> Self {
        let columns = BASE_COLUMNS
            .iter()
            .chain(T::EXTRA_COLUMNS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            db,
            columns,
            _record: PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.db
    }

    fn select(&self) -> String {
        format!("SELECT {} FROM {}", self.columns, T::COLLECTION)
    }

    /// Number of records referring to `movie_id`. Zero when there are none.
    pub(crate) async fn count_by_movie_id(&self, movie_id: Uuid) -> RepositoryResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE movie_id = ?", T::COLLECTION);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(movie_id)
            .fetch_one(&self.db)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    pub(crate) async fn list_by_movie_id(
        &self,
        movie_id: Uuid,
        page: Page,
    ) -> RepositoryResult<Vec<T>> {
        let sql = format!(
            "{} WHERE movie_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
            self.select()
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(movie_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl<T: Document> Repository<T> for SqlRepository<T> {
    async fn add(&self, item: T) -> RepositoryResult<T> {
        let id = Uuid::new_v4().to_string();
        let entity = item.entity();

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            T::COLLECTION,
            self.columns
        ));
        {
            let mut values = builder.separated(", ");
            values
                .push_bind(id.clone())
                .push_bind(item.user_id())
                .push_bind(item.movie_id())
                .push_bind(entity.created_at)
                .push_bind(entity.updated_at);
            for value in item.extra_values() {
                match value {
                    Value::Int(v) => values.push_bind(v),
                    Value::Text(v) => values.push_bind(v),
                };
            }
        }
        builder.push(") RETURNING ").push(&self.columns);

        let stored = builder
            .build_query_as::<T>()
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)?;
        debug!(collection = T::COLLECTION, %id, "inserted record");
        Ok(stored)
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        let sql = format!("{} WHERE id = ?", self.select());
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn get_by_user_id(&self, user_id: Uuid, page: Page) -> RepositoryResult<Vec<T>> {
        let sql = format!(
            "{} WHERE user_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
            self.select()
        );
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_by_user_and_movie(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> RepositoryResult<Option<T>> {
        let sql = format!("{} WHERE user_id = ? AND movie_id = ?", self.select());
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn update(&self, item: T) -> RepositoryResult<Option<T>> {
        let Some(id) = item.entity().id.clone() else {
            return Ok(None);
        };
        let entity = item.entity();

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", T::COLLECTION));
        {
            let mut assignments = builder.separated(", ");
            assignments
                .push("user_id = ")
                .push_bind_unseparated(item.user_id());
            assignments
                .push("movie_id = ")
                .push_bind_unseparated(item.movie_id());
            assignments
                .push("created_at = ")
                .push_bind_unseparated(entity.created_at);
            assignments
                .push("updated_at = ")
                .push_bind_unseparated(entity.updated_at);
            for (column, value) in T::EXTRA_COLUMNS.iter().zip(item.extra_values()) {
                assignments.push(format!("{column} = "));
                match value {
                    Value::Int(v) => assignments.push_bind_unseparated(v),
                    Value::Text(v) => assignments.push_bind_unseparated(v),
                };
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(&self.columns);

        let row = builder
            .build_query_as::<T>()
            .fetch_optional(&self.db)
            .await
            .map_err(map_write_error)?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<Option<T>> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ? RETURNING {}",
            T::COLLECTION,
            self.columns
        );
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        if row.is_some() {
            debug!(collection = T::COLLECTION, %id, "deleted record");
        }
        Ok(row)
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err.is_unique_violation()
                || db_err.message().to_ascii_lowercase().contains("unique")
    )
}

fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::Duplicate
    } else {
        RepositoryError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db,
        models::{Bookmark, Review},
    };

    async fn bookmarks() -> SqlRepository<Bookmark> {
        SqlRepository::new(db::connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn add_assigns_id_and_get_by_id_reads_it_back() {
        let repo = bookmarks().await;
        let user = Uuid::new_v4();
        let movie = Uuid::new_v4();

        let stored = repo.add(Bookmark::new(user, movie)).await.unwrap();
        let id = stored.entity.id.clone().expect("store assigns an id");

        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(fetched.user_id, user);
        assert_eq!(fetched.movie_id, movie);
    }

    #[tokio::test]
    async fn missing_id_is_none_not_error() {
        let repo = bookmarks().await;
        assert!(repo.get_by_id("no-such-id").await.unwrap().is_none());
        assert!(repo.delete("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owner_listing_paginates_in_insertion_order() {
        let repo = bookmarks().await;
        let user = Uuid::new_v4();
        let mut movies = Vec::new();
        for _ in 0..15 {
            let movie = Uuid::new_v4();
            movies.push(movie);
            repo.add(Bookmark::new(user, movie)).await.unwrap();
        }
        repo.add(Bookmark::new(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        let first = repo.get_by_user_id(user, Page::new(10, 0)).await.unwrap();
        let rest = repo.get_by_user_id(user, Page::new(10, 10)).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(rest.len(), 5);

        let listed: Vec<Uuid> = first.iter().chain(&rest).map(|b| b.movie_id).collect();
        assert_eq!(listed, movies);
    }

    #[tokio::test]
    async fn lookup_by_user_and_movie() {
        let repo = bookmarks().await;
        let user = Uuid::new_v4();
        let movie = Uuid::new_v4();
        repo.add(Bookmark::new(user, movie)).await.unwrap();

        assert!(
            repo.get_by_user_and_movie(user, movie)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.get_by_user_and_movie(user, Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.get_by_user_and_movie(Uuid::new_v4(), movie)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn store_rejects_second_record_for_same_pair() {
        let repo = bookmarks().await;
        let user = Uuid::new_v4();
        let movie = Uuid::new_v4();
        repo.add(Bookmark::new(user, movie)).await.unwrap();

        let err = repo.add(Bookmark::new(user, movie)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate));
    }

    #[tokio::test]
    async fn delete_returns_prior_value_and_removes_row() {
        let repo = bookmarks().await;
        let stored = repo
            .add(Bookmark::new(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();
        let id = stored.entity.id.clone().unwrap();

        let removed = repo.delete(&id).await.unwrap();
        assert_eq!(removed, Some(stored));
        assert!(repo.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_extra_columns() {
        let repo = SqlRepository::<Review>::new(db::connect_in_memory().await.unwrap());
        let mut review = repo
            .add(Review::create(Uuid::new_v4(), Uuid::new_v4(), 4, "meh").unwrap())
            .await
            .unwrap();

        review.set_rating(9).unwrap();
        review.set_content("grew on me").unwrap();
        review.entity.touch();
        let updated = repo.update(review.clone()).await.unwrap().unwrap();
        assert_eq!(updated, review);

        let id = review.entity.id.clone().unwrap();
        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.rating, 9);
        assert_eq!(fetched.content, "grew on me");
    }

    #[tokio::test]
    async fn update_of_vanished_or_unsaved_record_is_none() {
        let repo = bookmarks().await;
        let unsaved = Bookmark::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(repo.update(unsaved).await.unwrap().is_none());

        let stored = repo
            .add(Bookmark::new(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();
        repo.delete(stored.entity.id.as_deref().unwrap())
            .await
            .unwrap();
        assert!(repo.update(stored).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_by_movie_is_zero_for_unknown_movie() {
        let repo = bookmarks().await;
        assert_eq!(repo.count_by_movie_id(Uuid::new_v4()).await.unwrap(), 0);
    }
}
