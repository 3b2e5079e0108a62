//! Identity and timestamps shared by every stored resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Store identity plus creation/modification timestamps.
///
/// `id` is `None` until the record has been persisted; the repository assigns it.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct TimestampedEntity {
    /// Opaque store-assigned identifier.
    pub id: Option<String>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified. Never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl TimestampedEntity {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

impl Default for TimestampedEntity {
    fn default() -> Self {
        Self::new()
    }
}

/// A user-scoped, movie-scoped record: a bookmark, a like or a review.
pub trait Resource {
    /// Human-readable resource name used in errors and logs.
    const KIND: &'static str;

    fn entity(&self) -> &TimestampedEntity;

    fn user_id(&self) -> Uuid;

    fn movie_id(&self) -> Uuid;

    fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id() == user_id
    }
}
