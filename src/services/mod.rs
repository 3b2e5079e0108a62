//! Business rules on top of the repositories.
//!
//! Services enforce what the store does not: one record per (user, movie),
//! existence and ownership checks, and input normalization. Store failures
//! surface as [`ServiceError::ServiceUnavailable`]; nothing is retried.

pub mod bookmark_service;
pub mod like_service;
pub mod review_service;

use crate::{
    models::Resource,
    repositories::{MAX_LIMIT, Page, Repository, RepositoryError},
};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

pub use bookmark_service::BookmarkService;
pub use like_service::LikeService;
pub use review_service::{ReviewService, ReviewUpdate};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{kind} already exists for this movie")]
    DuplicateRecord { kind: &'static str },
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} `{id}` belongs to another user")]
    Forbidden { kind: &'static str, id: String },
    #[error("{0}")]
    ServiceUnavailable(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub(crate) fn from_repository(kind: &'static str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate => Self::DuplicateRecord { kind },
            RepositoryError::Storage(err) => {
                error!(kind, error = %err, "storage operation failed");
                Self::ServiceUnavailable(format!("{kind} storage is unavailable"))
            }
        }
    }

    fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Reject a pagination window outside `limit` 1..=`MAX_LIMIT`, `offset` >= 0.
pub(crate) fn check_page(page: Page) -> ServiceResult<Page> {
    if !(1..=MAX_LIMIT).contains(&page.limit) {
        return Err(ServiceError::ValidationFailed(format!(
            "limit {} is outside 1..={MAX_LIMIT}",
            page.limit
        )));
    }
    if page.offset < 0 {
        return Err(ServiceError::ValidationFailed(format!(
            "offset {} must not be negative",
            page.offset
        )));
    }
    Ok(page)
}

/// Insert `item` unless its owner already has a record for the same movie.
///
/// The existence check and the insert are not atomic; a concurrent insert
/// that slips between them is caught by the store's unique index and reported
/// the same way.
pub(crate) async fn create_unique<T, R>(repository: &R, item: T) -> ServiceResult<T>
where
    T: Resource + Send,
    R: Repository<T> + ?Sized,
{
    let existing = repository
        .get_by_user_and_movie(item.user_id(), item.movie_id())
        .await
        .map_err(|err| ServiceError::from_repository(T::KIND, err))?;
    if existing.is_some() {
        debug!(kind = T::KIND, user_id = %item.user_id(), movie_id = %item.movie_id(), "rejecting duplicate");
        return Err(ServiceError::DuplicateRecord { kind: T::KIND });
    }

    repository
        .add(item)
        .await
        .map_err(|err| ServiceError::from_repository(T::KIND, err))
}

/// Fetch a record and check that `caller` owns it.
pub(crate) async fn fetch_owned<T, R>(repository: &R, id: &str, caller: Uuid) -> ServiceResult<T>
where
    T: Resource + Send,
    R: Repository<T> + ?Sized,
{
    let record = repository
        .get_by_id(id)
        .await
        .map_err(|err| ServiceError::from_repository(T::KIND, err))?
        .ok_or_else(|| ServiceError::not_found(T::KIND, id))?;

    if !record.is_owned_by(caller) {
        debug!(kind = T::KIND, %id, %caller, "rejecting access by non-owner");
        return Err(ServiceError::Forbidden {
            kind: T::KIND,
            id: id.to_string(),
        });
    }
    Ok(record)
}

/// Ownership-checked physical delete. Returns the removed record.
pub(crate) async fn remove_owned<T, R>(repository: &R, id: &str, caller: Uuid) -> ServiceResult<T>
where
    T: Resource + Send,
    R: Repository<T> + ?Sized,
{
    fetch_owned::<T, R>(repository, id, caller).await?;
    repository
        .delete(id)
        .await
        .map_err(|err| ServiceError::from_repository(T::KIND, err))?
        .ok_or_else(|| ServiceError::not_found(T::KIND, id))
}
