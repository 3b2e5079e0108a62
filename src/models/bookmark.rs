//! A movie saved by a user for later.

use super::entity::{Resource, TimestampedEntity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Bookmark {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entity: TimestampedEntity,

    /// Bookmarked movie.
    pub movie_id: Uuid,

    /// Owner of the bookmark.
    pub user_id: Uuid,
}

impl Bookmark {
    pub fn new(user_id: Uuid, movie_id: Uuid) -> Self {
        Self {
            entity: TimestampedEntity::new(),
            movie_id,
            user_id,
        }
    }
}

impl Resource for Bookmark {
    const KIND: &'static str = "bookmark";

    fn entity(&self) -> &TimestampedEntity {
        &self.entity
    }

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn movie_id(&self) -> Uuid {
        self.movie_id
    }
}
