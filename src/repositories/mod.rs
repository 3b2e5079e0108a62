//! Data access for user-activity records.
//!
//! [`Repository`] is the capability every resource store offers. One generic
//! SQL-backed base, [`SqlRepository`], implements it for any [`Document`];
//! per-resource traits add the movie-level aggregates on top.

pub mod bookmark;
pub mod like;
pub mod review;
pub mod sql;

use crate::models::Resource;
use async_trait::async_trait;
use sqlx::{FromRow, sqlite::SqliteRow};
use thiserror::Error;
use uuid::Uuid;

pub use bookmark::BookmarkRepository;
pub use like::LikeRepository;
pub use review::ReviewRepository;
pub use sql::SqlRepository;

/// Default page size for owner listings.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size accepted at the API boundary.
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store rejected the write because the (user, movie) pair already exists.
    #[error("record already exists for this user and movie")]
    Duplicate,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Limit/offset pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// Uniform CRUD over one collection of records.
///
/// Absence is never an error: lookups return `Ok(None)`. Only store failures
/// (and store-level uniqueness violations on write) surface as `Err`.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Persist `item` and return it with its store-assigned id.
    async fn add(&self, item: T) -> RepositoryResult<T>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<T>>;

    /// Records owned by `user_id`, in insertion order.
    async fn get_by_user_id(&self, user_id: Uuid, page: Page) -> RepositoryResult<Vec<T>>;

    async fn get_by_user_and_movie(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> RepositoryResult<Option<T>>;

    /// Replace the stored record with the same id. `None` if it no longer exists.
    async fn update(&self, item: T) -> RepositoryResult<Option<T>>;

    /// Remove a record, returning its last stored value.
    async fn delete(&self, id: &str) -> RepositoryResult<Option<T>>;
}

/// A value bound into a resource-specific column.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
}

/// Describes how a [`Resource`] is laid out in its collection.
///
/// Every collection has `id, user_id, movie_id, created_at, updated_at`;
/// `EXTRA_COLUMNS` lists the resource-specific ones, in the same order as
/// [`Document::extra_values`].
pub trait Document:
    Resource + for<'r> FromRow<'r, SqliteRow> + Clone + Send + Sync + Unpin + 'static
{
    /// Table holding this resource.
    const COLLECTION: &'static str;

    const EXTRA_COLUMNS: &'static [&'static str] = &[];

    fn extra_values(&self) -> Vec<Value> {
        Vec::new()
    }
}
